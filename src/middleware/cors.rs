//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: any origin, WITHOUT credentials.
//! - Production: allowlist from `CORS_ALLOWED_ORIGINS`; an empty list allows none.
//! - Token and alert/pagination headers are exposed so the browser client can read them.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::headers::{AlertHeaders, TOTAL_COUNT};
use crate::config::Config;

pub fn apply(router: Router, config: &Config, alerts: &AlertHeaders) -> Router {
    let cors = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .expose_headers([
        header::AUTHORIZATION,
        header::LOCATION,
        HeaderName::from_static(TOTAL_COUNT),
        alerts.alert_name().clone(),
        alerts.params_name().clone(),
    ])
    .max_age(Duration::from_secs(60 * 30));

    router.layer(cors)
}
