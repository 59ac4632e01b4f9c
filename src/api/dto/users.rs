/*
 * Responsibility
 * - user DTOs for admin management and the public listing
 * - validate() for the admin form (lengths, login pattern)
 */
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::User;
use crate::services::UserDraft;

pub const LOGIN_MAX_LEN: usize = 50;
const NAME_MAX_LEN: usize = 50;
const EMAIL_MIN_LEN: usize = 5;
const EMAIL_MAX_LEN: usize = 254;
const IMAGE_URL_MAX_LEN: usize = 256;
const LANG_KEY_MIN_LEN: usize = 2;
const LANG_KEY_MAX_LEN: usize = 10;

/// Full user view, used by `/api/admin/users` and `/api/account`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUserDto {
    pub id: Option<String>,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub activated: bool,
    pub lang_key: Option<String>,
    pub created_by: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub authorities: BTreeSet<String>,
}

impl AdminUserDto {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_login(&self.login) {
            return Err("login must be 1..=50 chars of letters, digits or _.@-");
        }
        if let Some(name) = &self.first_name
            && name.chars().count() > NAME_MAX_LEN
        {
            return Err("firstName must be <= 50 chars");
        }
        if let Some(name) = &self.last_name
            && name.chars().count() > NAME_MAX_LEN
        {
            return Err("lastName must be <= 50 chars");
        }
        if let Some(email) = &self.email
            && !is_valid_email(email)
        {
            return Err("email must be a well-formed address of 5..=254 chars");
        }
        if let Some(url) = &self.image_url
            && url.len() > IMAGE_URL_MAX_LEN
        {
            return Err("imageUrl must be <= 256 chars");
        }
        if let Some(lang) = &self.lang_key
            && !(LANG_KEY_MIN_LEN..=LANG_KEY_MAX_LEN).contains(&lang.len())
        {
            return Err("langKey must be 2..=10 chars");
        }
        Ok(())
    }
}

impl From<User> for AdminUserDto {
    fn from(u: User) -> Self {
        Self {
            id: Some(u.id),
            login: u.login,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            image_url: u.image_url,
            activated: u.activated,
            lang_key: u.lang_key,
            created_by: Some(u.created_by),
            created_date: Some(u.created_date),
            last_modified_by: u.last_modified_by,
            last_modified_date: u.last_modified_date,
            authorities: u.authorities,
        }
    }
}

impl From<AdminUserDto> for UserDraft {
    fn from(dto: AdminUserDto) -> Self {
        Self {
            id: dto.id,
            login: dto.login,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            image_url: dto.image_url,
            activated: dto.activated,
            lang_key: dto.lang_key,
            authorities: dto.authorities,
        }
    }
}

/// Public view: id and login only.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub login: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            login: u.login,
        }
    }
}

/// Either a plain login (`[_.@A-Za-z0-9-]+`) or an email-shaped one.
pub fn is_valid_login(login: &str) -> bool {
    if login.is_empty() || login.chars().count() > LOGIN_MAX_LEN {
        return false;
    }
    let plain = login
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    plain || is_email_shaped(login)
}

fn is_valid_email(email: &str) -> bool {
    (EMAIL_MIN_LEN..=EMAIL_MAX_LEN).contains(&email.len()) && is_email_shaped(email)
}

fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!$&*+=?^_`{|}~.-".contains(c));
    let domain_ok = domain
        .split('.')
        .all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    local_ok && domain_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(login: &str) -> AdminUserDto {
        AdminUserDto {
            login: login.to_string(),
            ..AdminUserDto::default()
        }
    }

    #[test]
    fn login_pattern() {
        assert!(is_valid_login("john.doe"));
        assert!(is_valid_login("john_doe-1@example.com"));
        assert!(is_valid_login("j+tag@example.com"));
        assert!(!is_valid_login(""));
        assert!(!is_valid_login("john doe"));
        assert!(!is_valid_login("j+tag"));
        assert!(!is_valid_login(&"a".repeat(51)));
    }

    #[test]
    fn admin_form_limits() {
        assert!(dto("john").validate().is_ok());

        let mut user = dto("john");
        user.email = Some("not-an-email".into());
        assert!(user.validate().is_err());

        let mut user = dto("john");
        user.email = Some("john@localhost".into());
        user.lang_key = Some("e".into());
        assert!(user.validate().is_err());

        let mut user = dto("john");
        user.first_name = Some("x".repeat(51));
        assert!(user.validate().is_err());
    }

    #[test]
    fn json_is_camel_case() {
        let parsed: AdminUserDto = serde_json::from_str(
            r#"{"login":"john","firstName":"John","langKey":"fr","authorities":["ROLE_USER"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_name.as_deref(), Some("John"));
        assert_eq!(parsed.lang_key.as_deref(), Some("fr"));
        assert!(parsed.authorities.contains("ROLE_USER"));
        assert!(parsed.id.is_none());

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["firstName"], "John");
        assert!(value.get("first_name").is_none());
    }
}
