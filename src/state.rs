/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - 起動時に一度だけ作る read-only な設定 (validator, 必要ロール)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::TokenValidator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub validator: Arc<TokenValidator>,
    pub admin_required_role: Arc<str>,
}

impl AppState {
    pub fn new(validator: Arc<TokenValidator>, admin_required_role: impl Into<Arc<str>>) -> Self {
        Self {
            validator,
            admin_required_role: admin_required_role.into(),
        }
    }
}
