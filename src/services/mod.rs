/*
 * Responsibility
 * - HTTP に依存しないドメインサービス
 * - auth: access token の署名・有効期限検証 (TokenValidator)
 */
pub mod auth;
