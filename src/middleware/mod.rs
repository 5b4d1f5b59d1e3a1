/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: IdentityFilter / RoleGateFilter とルート単位のチェーン組み立て
 * - bearer_auth: 両フィルタ共通のヘッダ抽出 + トークン検証
 * - http: request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod bearer_auth;
pub mod http;
