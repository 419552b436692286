/*
 * Responsibility
 * - guard が返す型付き denial (AccessError) の定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - code は安定値。クライアントはこれで分岐する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Denial returned by the authorization guards.
///
/// These are ordinary values, not faults: a handler surfaces one to the RPC
/// error channel and keeps serving. The messages are part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The request carries no verified claims.
    #[error("No auth token given")]
    Unauthenticated,
    /// Claims are present but fail an identity or role constraint.
    #[error("You cannot perform this action")]
    PermissionDenied,
}

impl AccessError {
    /// Stable wire code for client-side branching.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "unauthenticated",
            AccessError::PermissionDenied => "permission_denied",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}
