pub mod auth;
pub mod metrics;
pub mod produit_service;
pub mod user_service;

pub use produit_service::ProduitService;
pub use user_service::{UserDraft, UserService, UserServiceError};
