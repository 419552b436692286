//! Bearer JWT 検証 → Claims を extensions に入れる middleware
//!
//! Responsibility:
//! - `Authorization: Bearer <jwt>` を検証し、claims を request extensions に載せる
//! - ヘッダが無い / Bearer でない場合はそのまま通す（拒否は guard 側の仕事）
//! - 提示されたトークンが検証に失敗した場合だけ、ここで固定の 401 を返して打ち切る

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::auth::{Claims, JwtPayload, JwtVerifier};

/// Fixed body returned when a presented token fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "The authorization token provided was invalid.";

/// Apply the verification middleware to a router.
///
/// 例：
/// ```ignore
/// let verifier = JwtVerifier::new(&config.jwt_secret);
/// let app = middleware::jwt::apply(routes(), verifier);
/// ```
pub fn apply<S>(router: Router<S>, verifier: JwtVerifier) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に verifier を渡す
    router.layer(middleware::from_fn_with_state(verifier, jwt_middleware))
}

async fn jwt_middleware(
    State(verifier): State<JwtVerifier>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    // No bearer credential: an anonymous request. Whether that is acceptable
    // is the guards' decision, not this layer's.
    let Some(token) = bearer else {
        return next.run(req).await;
    };

    // A presented token that does not verify is rejected here. Malformed and
    // mis-signed tokens are not distinguished to the client.
    let payload = match verifier.verify(token) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(error = %err, "bearer token verification failed");
            return (StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE).into_response();
        }
    };

    let claims = Claims::new(payload.clone());

    // middleware → handler/guard への受け渡し
    req.extensions_mut().insert(JwtPayload(payload));
    req.extensions_mut().insert(claims);

    next.run(req).await
}
