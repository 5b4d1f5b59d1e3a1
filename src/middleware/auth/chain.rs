//! Per-route filter chain.
//!
//! Order on the way in is always IdentityFilter → RoleGateFilter → handler.
//! A filter that rejects answers the request itself; nothing after it runs.

use std::sync::Arc;

use axum::Router;

use crate::services::auth::TokenValidator;

use super::{IdentityFilter, RoleGateFilter, identity, role_gate};

/// Which filters a route applies. `Default` is an open route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilters {
    pub identity: bool,
    pub required_role: Option<String>,
}

impl RouteFilters {
    pub fn authenticated() -> Self {
        Self {
            identity: true,
            required_role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }
}

/// Layer the configured filters onto the routes already registered on `router`.
pub fn protect<S>(router: Router<S>, validator: &Arc<TokenValidator>, filters: &RouteFilters) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // route_layer wraps outside-in: the layer added last sees the request first.
    let router = match filters.required_role.as_deref() {
        Some(role) => role_gate::apply(router, RoleGateFilter::new(Arc::clone(validator), role)),
        None => router,
    };

    if filters.identity {
        identity::apply(router, IdentityFilter::new(Arc::clone(validator)))
    } else {
        router
    }
}
