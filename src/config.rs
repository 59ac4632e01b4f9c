/*
 * Responsibility
 * - load settings from the environment (.env via dotenvy)
 * - validate values up front (startup fails when something is missing)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Login/password seeded as an administrator at startup when absent.
#[derive(Clone)]
pub struct InitialAdmin {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for InitialAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitialAdmin")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub app_name: String,

    // None -> in-memory store
    pub database_url: Option<String>,

    pub cors_allowed_origins: Vec<String>,

    pub jwt_base64_secret: String,
    pub token_validity_seconds: i64,
    pub token_validity_remember_me_seconds: i64,
    pub token_leeway_seconds: u64,

    pub initial_admin: Option<InitialAdmin>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the secret or the database credentials
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("app_name", &self.app_name)
            .field("database", &self.database_url.is_some())
            .field("token_validity_seconds", &self.token_validity_seconds)
            .field(
                "token_validity_remember_me_seconds",
                &self.token_validity_remember_me_seconds,
            )
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("initial_admin", &self.initial_admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "examApp".to_string());
        if app_name.is_empty() || !app_name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Invalid("APP_NAME"));
        }

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_base64_secret = lookup("JWT_BASE64_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_BASE64_SECRET"))?;

        let token_validity_seconds = positive_seconds(
            &lookup,
            "TOKEN_VALIDITY_SECONDS",
            86_400, // 1 day
        )?;
        let token_validity_remember_me_seconds = positive_seconds(
            &lookup,
            "TOKEN_VALIDITY_REMEMBER_ME_SECONDS",
            2_592_000, // 30 days
        )?;

        let token_leeway_seconds = match lookup("TOKEN_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let admin_login = lookup("INITIAL_ADMIN_LOGIN");
        let admin_password = lookup("INITIAL_ADMIN_PASSWORD");
        let initial_admin = match (admin_login, admin_password) {
            (Some(login), Some(password)) if !login.trim().is_empty() => Some(InitialAdmin {
                login: login.trim().to_lowercase(),
                password,
            }),
            (Some(_), None) => return Err(ConfigError::Missing("INITIAL_ADMIN_PASSWORD")),
            _ => None,
        };

        Ok(Self {
            addr,
            app_env,
            app_name,
            database_url,
            cors_allowed_origins,
            jwt_base64_secret,
            token_validity_seconds,
            token_validity_remember_me_seconds,
            token_leeway_seconds,
            initial_admin,
        })
    }
}

fn positive_seconds<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => match v.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid(key)),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_BASE64_SECRET", "c2VjcmV0")]))
            .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.app_name, "examApp");
        assert!(config.database_url.is_none());
        assert_eq!(config.token_validity_seconds, 86_400);
        assert_eq!(config.token_validity_remember_me_seconds, 2_592_000);
        assert_eq!(config.token_leeway_seconds, 0);
        assert!(config.initial_admin.is_none());
    }

    #[test]
    fn missing_secret_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_BASE64_SECRET")));
    }

    #[test]
    fn non_positive_validity_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_BASE64_SECRET", "c2VjcmV0"),
            ("TOKEN_VALIDITY_SECONDS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TOKEN_VALIDITY_SECONDS")));
    }

    #[test]
    fn initial_admin_login_is_lowercased() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_BASE64_SECRET", "c2VjcmV0"),
            ("INITIAL_ADMIN_LOGIN", "Admin"),
            ("INITIAL_ADMIN_PASSWORD", "admin"),
            ("APP_ENV", "prod"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.initial_admin.unwrap().login, "admin");
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_BASE64_SECRET", "c2VjcmV0")]))
            .unwrap();
        assert!(!format!("{config:?}").contains("c2VjcmV0"));
    }
}
