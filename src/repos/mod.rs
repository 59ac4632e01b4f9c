/*
 * Responsibility
 * - persistence traits per entity + their backends (Postgres, in-memory)
 */
pub mod error;
pub mod memory;
pub mod produit_repo;
pub mod user_repo;

pub use error::{RepoError, RepoResult, UniqueField};
pub use produit_repo::{PgProduitRepo, Produit, ProduitRepo};
pub use user_repo::{PgUserRepo, User, UserRepo};

/// Identifier for a newly stored document.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
