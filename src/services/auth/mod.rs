pub mod authorities;
pub mod claims;
pub mod factory;
pub mod password;
pub mod principal;
pub mod secret;
pub mod token_issuer;
pub mod token_validator;

pub use claims::{AUTHORITIES_KEY, TokenClaims};
pub use factory::build_token_services;
pub use principal::Principal;
pub use secret::{JWT_ALGORITHM, JwtSecret, SecretError};
pub use token_issuer::{IssueError, TokenIssuer};
pub use token_validator::{TokenError, TokenValidator};
