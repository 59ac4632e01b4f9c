pub mod account;
pub mod health;
pub mod management;
pub mod produits;
pub mod users;
