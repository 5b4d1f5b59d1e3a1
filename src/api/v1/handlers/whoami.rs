/*
 * Responsibility
 * - GET /me, GET /admin/me
 * - 本来のバックエンド転送の代わりに、フィルタチェーン通過後の userId ヘッダをそのまま返す
 */
use axum::{Json, http::HeaderMap};

use crate::api::v1::dto::identity::IdentityResponse;
use crate::middleware::auth::USER_ID_HEADER;

pub async fn whoami(headers: HeaderMap) -> Json<IdentityResponse> {
    // subject は UTF-8 (obs-text) のまま転送されるので to_str() は使わない
    let user_id = headers
        .get(USER_ID_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    Json(IdentityResponse { user_id })
}
