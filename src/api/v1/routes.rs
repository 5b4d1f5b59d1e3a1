/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - ルートごとに掛けるフィルタ (identity / role gate) をここで決める
 *   - /health: なし
 *   - /me: IdentityFilter
 *   - /admin/me: IdentityFilter → RoleGateFilter
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, whoami::whoami};
use crate::middleware::auth::{RouteFilters, chain};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let open = Router::new().route("/health", get(health));

    let authenticated = chain::protect(
        Router::new().route("/me", get(whoami)),
        &state.validator,
        &RouteFilters::authenticated(),
    );

    let admin = chain::protect(
        Router::new().route("/admin/me", get(whoami)),
        &state.validator,
        &RouteFilters::authenticated().with_role(state.admin_required_role.to_string()),
    );

    open.merge(authenticated).merge(admin)
}
