//! Built-in authority names.

pub const ADMIN: &str = "ROLE_ADMIN";
pub const USER: &str = "ROLE_USER";
