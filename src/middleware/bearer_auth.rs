/*
 * Responsibility
 * - Bearer トークンの検証 (ヘッダ抽出 → 検証 → 拒否)
 * - IdentityFilter / RoleGateFilter の共通ステップ。パース処理はここ一箇所だけ
 * - 認可 (role) は role_gate 側の責務
 */
use axum::http::{HeaderMap, header};

use crate::error::AuthError;
use crate::services::auth::{Claims, TokenValidator};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the raw token from the `Authorization` header.
///
/// The `Bearer ` prefix is optional; without it the whole value is the token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    // Present but not visible ASCII: a broken credential, not a missing one.
    let value = value.to_str().map_err(|_| AuthError::MalformedToken)?;

    Ok(value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim())
}

/// Header check + token verification shared by every auth filter.
pub fn authenticate(validator: &TokenValidator, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let token = bearer_token(headers)?;
    Ok(validator.verify(token)?)
}
