/*
 * Responsibility
 * - Config読み込み → 依存生成 (TokenValidator) → Router 組み立て
 * - Middleware の適用 (request-id/trace/limit/timeout、ルート単位の auth filter)
 * - axum::serve() で起動、Ctrl-C で graceful shutdown
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::config::Config;
use crate::middleware::http::{self, HttpLimits};
use crate::services::auth::build_token_validator;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,gateway_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr may be hidden depending on how the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let validator = build_token_validator(&config).context("failed to build token validator")?;
    let state = AppState::new(validator, config.admin_required_role.as_str());
    let app = build_router(state, HttpLimits::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    http::apply(router, limits)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{expired_token, get, mint, response_json, validator};

    fn app() -> Router {
        let state = AppState::new(Arc::new(validator()), "ROLE_ADMIN");
        build_router(
            state,
            HttpLimits {
                timeout: Duration::from_secs(5),
                body_limit_bytes: 1024,
            },
        )
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn health_is_open() {
        let res = app().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app().oneshot(get("/api/v1/health", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn no_header_is_400() {
        let res = app().oneshot(get("/api/v1/me", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let res = app()
            .oneshot(get("/api/v1/me", Some(&bearer(&expired_token("user123")))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_backend_with_user_id() {
        let res = app()
            .oneshot(get("/api/v1/me", Some(&bearer(&mint("user123", None)))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(response_json(res).await["userId"], "user123");
    }

    #[tokio::test]
    async fn user_role_on_admin_route_is_403() {
        let res = app()
            .oneshot(get(
                "/api/v1/admin/me",
                Some(&bearer(&mint("user123", Some("ROLE_USER")))),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body = response_json(res).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "insufficient role");
    }

    #[tokio::test]
    async fn admin_role_on_admin_route_is_forwarded() {
        let res = app()
            .oneshot(get(
                "/api/v1/admin/me",
                Some(&bearer(&mint("admin1", Some("ROLE_ADMIN")))),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(response_json(res).await["userId"], "admin1");
    }
}
