use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Claim carrying the granted authority names.
pub const AUTHORITIES_KEY: &str = "auth";

/// Claims carried by every access token.
///
/// NOTE:
/// - `auth` is written as a JSON array.
/// - On read it also accepts a single space-delimited string, which is what
///   older clients of this API put in the claim.
/// - `sub`/`exp` default on read; their presence is enforced by the
///   validator's required-claim check, `iat` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: String,
    #[serde(
        rename = "auth",
        default,
        deserialize_with = "deserialize_authorities"
    )]
    pub authorities: BTreeSet<String>,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
}

impl TokenClaims {
    /// `validity_seconds` must be positive so that `exp > iat`.
    pub fn new(
        subject: impl Into<String>,
        authorities: BTreeSet<String>,
        issued_at: i64,
        validity_seconds: i64,
    ) -> Option<Self> {
        if validity_seconds <= 0 {
            return None;
        }
        Some(Self {
            sub: subject.into(),
            authorities,
            iat: issued_at,
            exp: issued_at.checked_add(validity_seconds)?,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthoritiesClaim {
    List(Vec<String>),
    Delimited(String),
}

fn deserialize_authorities<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let claim = Option::<AuthoritiesClaim>::deserialize(deserializer)?;
    Ok(match claim {
        Some(AuthoritiesClaim::List(list)) => list.into_iter().collect(),
        Some(AuthoritiesClaim::Delimited(s)) => {
            s.split_whitespace().map(str::to_string).collect()
        }
        None => BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn authorities_serialize_as_array_under_auth() {
        let claims = TokenClaims::new(
            "admin",
            BTreeSet::from(["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()]),
            1_000,
            60,
        )
        .unwrap();

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value[AUTHORITIES_KEY], json!(["ROLE_ADMIN", "ROLE_USER"]));
        assert_eq!(
            value,
            json!({"sub": "admin", "auth": ["ROLE_ADMIN", "ROLE_USER"], "iat": 1000, "exp": 1060})
        );
    }

    #[test]
    fn delimited_authorities_are_split() {
        let claims: TokenClaims = serde_json::from_value(json!({
            "sub": "user",
            "auth": "ROLE_ADMIN ROLE_USER",
            "iat": 1,
            "exp": 2
        }))
        .unwrap();

        assert_eq!(
            claims.authorities,
            BTreeSet::from(["ROLE_ADMIN".to_string(), "ROLE_USER".to_string()])
        );
    }

    #[test]
    fn missing_or_null_authorities_are_empty() {
        let missing: TokenClaims =
            serde_json::from_value(json!({"sub": "u", "iat": 1, "exp": 2})).unwrap();
        let null: TokenClaims =
            serde_json::from_value(json!({"sub": "u", "auth": null, "iat": 1, "exp": 2}))
                .unwrap();

        assert!(missing.authorities.is_empty());
        assert!(null.authorities.is_empty());
    }

    #[test]
    fn iat_is_optional_on_read() {
        let claims: TokenClaims =
            serde_json::from_value(json!({"sub": "u", "auth": ["ROLE_USER"], "exp": 2})).unwrap();
        assert_eq!(claims.iat, 0);
        assert_eq!(claims.exp, 2);
    }

    #[test]
    fn non_positive_validity_is_refused() {
        assert!(TokenClaims::new("u", BTreeSet::new(), 10, 0).is_none());
        assert!(TokenClaims::new("u", BTreeSet::new(), 10, -5).is_none());
    }
}
