use serde::Serialize;

/// What the stand-in backend sees of the caller after the filter chain.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}
