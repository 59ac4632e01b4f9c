/*
 * Responsibility
 * - alert headers on mutations (`X-{app}-alert` / `X-{app}-params`)
 * - `X-Total-Count` on list responses
 */
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName};
use url::form_urlencoded;

pub const TOTAL_COUNT: &str = "x-total-count";

/// Header names and message prefix derived from the application name.
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    app_name: String,
    alert: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(app_name: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            app_name: app_name.to_string(),
            alert: HeaderName::try_from(format!("x-{app_name}-alert"))?,
            params: HeaderName::try_from(format!("x-{app_name}-params"))?,
        })
    }

    pub fn alert_name(&self) -> &HeaderName {
        &self.alert
    }

    pub fn params_name(&self) -> &HeaderName {
        &self.params
    }

    /// `{app}.{entity}.created` with the new id as param.
    pub fn entity_created(&self, entity: &str, param: &str) -> HeaderMap {
        self.alert(&format!("{}.{entity}.created", self.app_name), param)
    }

    pub fn entity_updated(&self, entity: &str, param: &str) -> HeaderMap {
        self.alert(&format!("{}.{entity}.updated", self.app_name), param)
    }

    pub fn entity_deleted(&self, entity: &str, param: &str) -> HeaderMap {
        self.alert(&format!("{}.{entity}.deleted", self.app_name), param)
    }

    /// Alert with a message key that is not derived from an entity name,
    /// e.g. `userManagement.created`.
    pub fn alert(&self, message: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(message) {
            headers.insert(self.alert.clone(), value);
        }
        if let Ok(value) = HeaderValue::from_str(&url_encode(param)) {
            headers.insert(self.params.clone(), value);
        }
        headers
    }
}

pub fn total_count(total: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(TOTAL_COUNT), HeaderValue::from(total));
    headers
}

fn url_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_follow_the_app_name() {
        let alerts = AlertHeaders::new("examApp").unwrap();
        assert_eq!(alerts.alert_name().as_str(), "x-examapp-alert");
        assert_eq!(alerts.params_name().as_str(), "x-examapp-params");
    }

    #[test]
    fn entity_alerts_carry_message_and_encoded_param() {
        let alerts = AlertHeaders::new("examApp").unwrap();
        let headers = alerts.entity_created("produit", "a b/c");
        assert_eq!(headers["x-examapp-alert"], "examApp.produit.created");
        assert_eq!(headers["x-examapp-params"], "a+b%2Fc");

        let headers = alerts.alert("userManagement.deleted", "john");
        assert_eq!(headers["x-examapp-alert"], "userManagement.deleted");
        assert_eq!(headers["x-examapp-params"], "john");
    }

    #[test]
    fn invalid_app_names_are_rejected() {
        assert!(AlertHeaders::new("bad name").is_err());
    }

    #[test]
    fn total_count_header() {
        assert_eq!(total_count(42)[TOTAL_COUNT], "42");
    }
}
