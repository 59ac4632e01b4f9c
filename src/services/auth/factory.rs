/// Factory: build the token issuer and validator from application `Config`.
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::services::auth::{JwtSecret, TokenIssuer, TokenValidator};
use crate::services::metrics::SecurityMetrics;

pub fn build_token_services(
    config: &Config,
    metrics: Arc<dyn SecurityMetrics>,
) -> Result<(Arc<TokenIssuer>, Arc<TokenValidator>)> {
    let secret = JwtSecret::from_base64(&config.jwt_base64_secret)
        .context("invalid JWT_BASE64_SECRET")?;

    let issuer = TokenIssuer::new(
        &secret,
        config.token_validity_seconds,
        config.token_validity_remember_me_seconds,
    )?;
    let validator = TokenValidator::new(&secret, config.token_leeway_seconds, metrics);

    Ok((Arc::new(issuer), Arc::new(validator)))
}
