//! 必要ロールのチェック (authority claim == required role)
//!
//! - 前段の IdentityFilter が検証済み Claims を extensions に入れていればそれを使う
//! - 無ければ bearer_auth で検証する (400/401 は IdentityFilter と同じ)
//! - 一致しなければ 403 + JSON body。一致すれば request はそのまま後段へ

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::middleware::bearer_auth;
use crate::services::auth::{Claims, TokenValidator};

#[derive(Clone, Debug)]
pub struct RoleGateFilter {
    validator: Arc<TokenValidator>,
    required_role: Arc<str>,
}

impl RoleGateFilter {
    pub fn new(validator: Arc<TokenValidator>, required_role: impl Into<Arc<str>>) -> Self {
        Self {
            validator,
            required_role: required_role.into(),
        }
    }

    pub fn required_role(&self) -> &str {
        &self.required_role
    }

    /// Exact, case-sensitive, single-value comparison. No hierarchy, no wildcard.
    fn permits(&self, claims: &Claims) -> bool {
        claims.authority() == Some(self.required_role())
    }
}

/// Attach the role gate to every route registered so far on `router`.
pub fn apply<S>(router: Router<S>, filter: RoleGateFilter) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(filter, role_gate_middleware))
}

async fn role_gate_middleware(
    State(filter): State<RoleGateFilter>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let verified = req.extensions().get::<Claims>().cloned();
    let claims = match verified {
        Some(claims) => claims,
        None => bearer_auth::authenticate(&filter.validator, req.headers()).inspect_err(|err| {
            tracing::warn!(kind = ?err, "role gate rejected request");
        })?,
    };

    if !filter.permits(&claims) {
        tracing::warn!(
            kind = ?AuthError::InsufficientRole,
            required = %filter.required_role(),
            presented = ?claims.authority(),
            "role gate rejected request"
        );
        return Err(AuthError::InsufficientRole);
    }

    tracing::info!(
        role = %filter.required_role(),
        subject = %claims.subject(),
        "role gate permitted request"
    );

    Ok(next.run(req).await)
}
