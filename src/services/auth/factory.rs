/// Factory: build `TokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenValidator, token_validator::ValidatorConfigError};

pub fn build_token_validator(config: &Config) -> Result<Arc<TokenValidator>, ValidatorConfigError> {
    let validator = TokenValidator::new(
        config.access_token_secret.expose(),
        config.access_token_secret_encoding,
        config.access_token_leeway_seconds,
    )
    .inspect_err(|e| tracing::error!(error = %e, "failed to build access token validator"))?;

    tracing::debug!(validator = ?validator, "access token validator ready");

    Ok(Arc::new(validator))
}
