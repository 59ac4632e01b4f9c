pub mod auth;
pub mod produits;
pub mod users;
