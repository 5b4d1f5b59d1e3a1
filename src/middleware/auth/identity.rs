//! access token 検証 → 検証済み subject を `userId` ヘッダとして下流に渡す
//!
//! - `Authorization` ヘッダ無し: 400
//! - トークン不正 / 期限切れ / subject 空: 401
//! - 成功: caller が付けた `userId` は上書き (append しない)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::middleware::bearer_auth;
use crate::services::auth::TokenValidator;

use super::USER_ID_HEADER;

#[derive(Clone, Debug)]
pub struct IdentityFilter {
    validator: Arc<TokenValidator>,
}

impl IdentityFilter {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }
}

/// Attach the identity filter to every route registered so far on `router`.
pub fn apply<S>(router: Router<S>, filter: IdentityFilter) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(filter, identity_middleware))
}

async fn identity_middleware(
    State(filter): State<IdentityFilter>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = bearer_auth::authenticate(&filter.validator, req.headers()).inspect_err(|err| {
        tracing::warn!(kind = ?err, "identity filter rejected request");
    })?;

    let subject = claims.subject();
    if subject.trim().is_empty() {
        tracing::warn!(kind = ?AuthError::EmptySubject, "identity filter rejected request");
        return Err(AuthError::EmptySubject);
    }

    // A subject that cannot be carried in a header is no usable identity either.
    let user_id = HeaderValue::from_str(subject).map_err(|_| {
        tracing::warn!(kind = ?AuthError::MalformedToken, "subject is not a valid header value");
        AuthError::MalformedToken
    })?;

    tracing::debug!(
        user_id = %subject,
        expires_at = ?claims.expires_at(),
        "identity verified"
    );

    // insert は同名ヘッダを全て置き換える
    req.headers_mut().insert(USER_ID_HEADER, user_id);
    // 後段のフィルタ (role gate) が再検証しなくて済むように
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
