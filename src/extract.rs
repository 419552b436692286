/*!
 * Claims extractor
 *
 * Responsibility:
 * - 検証済み Claims を handler 引数として受け取るための extractor
 * - middleware が Claims を request.extensions() に insert 済みである前提
 * - 見つからない場合は 401（認証必須 handler 向け。細かい判定は guard を使う）
 */
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Claims;

pub struct ClaimsExtractor(pub Claims);

impl<S> FromRequestParts<S> for ClaimsExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(ClaimsExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
