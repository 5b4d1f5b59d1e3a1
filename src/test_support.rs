//! Shared helpers for the filter tests: token minting and an echo backend.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, Request, header},
    response::Response,
    routing::get as get_route,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value, json};

use crate::middleware::auth::USER_ID_HEADER;
use crate::services::auth::{SecretEncoding, TokenValidator};

pub const SECRET: &str = "gateway-test-secret";

pub fn validator() -> TokenValidator {
    TokenValidator::new(SECRET, SecretEncoding::Raw, 0).unwrap()
}

pub fn mint_with_secret(secret: &str, claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Valid for ten minutes, signed with [`SECRET`].
pub fn mint(subject: &str, authority: Option<&str>) -> String {
    let mut claims = json!({
        "sub": subject,
        "exp": Utc::now().timestamp() + 600,
    });
    if let Some(auth) = authority {
        claims["auth"] = json!(auth);
    }
    mint_with_secret(SECRET, claims)
}

/// Correctly signed admin token that expired ten minutes ago.
pub fn expired_token(subject: &str) -> String {
    mint_with_secret(
        SECRET,
        json!({
            "sub": subject,
            "auth": "ROLE_ADMIN",
            "exp": Utc::now().timestamp() - 600,
        }),
    )
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn response_json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Stand-in for the rest of the chain: counts calls and echoes what it received.
#[derive(Clone, Default)]
pub struct Backend {
    hits: Arc<AtomicUsize>,
}

impl Backend {
    pub fn calls(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// `GET /backend` answered by [`Backend`].
///
/// Body: every header as `name: value`, plus `userId` as the list of all its values.
pub fn backend_router(backend: &Backend) -> Router {
    Router::new()
        .route("/backend", get_route(echo))
        .with_state(backend.clone())
}

async fn echo(State(backend): State<Backend>, headers: HeaderMap) -> Json<Value> {
    backend.hits.fetch_add(1, Ordering::SeqCst);

    let mut body = Map::new();
    for (name, value) in headers.iter() {
        if *name == USER_ID_HEADER {
            continue;
        }
        body.insert(
            name.as_str().to_string(),
            json!(String::from_utf8_lossy(value.as_bytes())),
        );
    }

    let user_ids: Vec<String> = headers
        .get_all(USER_ID_HEADER)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    body.insert("userId".to_string(), json!(user_ids));

    Json(Value::Object(body))
}
