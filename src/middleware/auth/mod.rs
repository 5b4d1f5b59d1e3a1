/*!
 * Gateway auth filters
 *
 * Responsibility:
 * - IdentityFilter: 認証して検証済み subject を下流へ渡す
 * - RoleGateFilter: authority claim を必要ロールと比較する
 * - chain: ルートごとにどのフィルタをどの順で掛けるか
 */
use axum::http::HeaderName;

pub mod chain;
pub mod identity;
pub mod role_gate;

pub use chain::RouteFilters;
pub use identity::IdentityFilter;
pub use role_gate::RoleGateFilter;

/// Header carrying the verified subject to the backend (`userId` on the wire).
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("userid");
