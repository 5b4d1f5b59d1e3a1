/*
 * Responsibility
 * - 認証・認可フィルタ共通の AuthError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - TokenError (検証結果) からの変換
 *
 * Notes
 * - 401 の body は失敗種別によらず同一。種別はログにのみ残す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::TokenError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    ExpiredToken,
    #[error("token has no subject")]
    EmptySubject,
    #[error("insufficient role")]
    InsufficientRole,
    #[error("unexpected authentication failure")]
    UnexpectedFailure,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader => StatusCode::BAD_REQUEST,
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::EmptySubject
            | AuthError::UnexpectedFailure => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AuthError::MissingHeader => ("BAD_REQUEST", self.to_string()),
            AuthError::InsufficientRole => ("FORBIDDEN", self.to_string()),
            _ => ("UNAUTHORIZED", "unauthorized".to_string()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed => AuthError::MalformedToken,
            TokenError::InvalidSignature => AuthError::InvalidSignature,
            TokenError::Expired => AuthError::ExpiredToken,
            // Fail-closed: answered exactly like a malformed token
            TokenError::Other => AuthError::UnexpectedFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: AuthError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_header_is_bad_request() {
        let (status, body) = body_json(AuthError::MissingHeader).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn authentication_failures_share_one_response() {
        let kinds = [
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::ExpiredToken,
            AuthError::EmptySubject,
            AuthError::UnexpectedFailure,
        ];

        for kind in kinds {
            let (status, body) = body_json(kind).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{kind:?}");
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
            assert_eq!(body["error"]["message"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn insufficient_role_carries_reason() {
        let (status, body) = body_json(AuthError::InsufficientRole).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "insufficient role");
    }

    #[test]
    fn token_errors_keep_their_kind() {
        assert_eq!(AuthError::from(TokenError::Expired), AuthError::ExpiredToken);
        assert_eq!(
            AuthError::from(TokenError::InvalidSignature),
            AuthError::InvalidSignature
        );
        assert_eq!(AuthError::from(TokenError::Malformed), AuthError::MalformedToken);
        assert_eq!(AuthError::from(TokenError::Other), AuthError::UnexpectedFailure);
    }
}
