/*
 * Responsibility
 * - Produit use-cases on top of ProduitRepo
 * - partial update only overwrites fields that are present
 */
use std::sync::Arc;

use tracing::debug;

use crate::repos::{Produit, ProduitRepo, RepoResult};

#[derive(Clone)]
pub struct ProduitService {
    repo: Arc<dyn ProduitRepo>,
}

impl ProduitService {
    pub fn new(repo: Arc<dyn ProduitRepo>) -> Self {
        Self { repo }
    }

    pub async fn save(&self, produit: Produit) -> RepoResult<Produit> {
        debug!(?produit, "Request to save Produit");
        self.repo.save(produit).await
    }

    pub async fn update(&self, produit: Produit) -> RepoResult<Produit> {
        debug!(?produit, "Request to update Produit");
        self.repo.save(produit).await
    }

    /// Returns `None` when no entity has `patch.id`.
    pub async fn partial_update(&self, patch: Produit) -> RepoResult<Option<Produit>> {
        debug!(?patch, "Request to partially update Produit");

        let Some(id) = patch.id.as_deref() else {
            return Ok(None);
        };
        let Some(mut existing) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(description) = patch.description {
            existing.description = Some(description);
        }
        if let Some(nom) = patch.nom {
            existing.nom = Some(nom);
        }
        if let Some(prix) = patch.prix {
            existing.prix = Some(prix);
        }

        self.repo.save(existing).await.map(Some)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Produit>> {
        debug!("Request to get all Produits");
        self.repo.find_all().await
    }

    pub async fn count_all(&self) -> RepoResult<u64> {
        self.repo.count().await
    }

    pub async fn find_one(&self, id: &str) -> RepoResult<Option<Produit>> {
        debug!(id, "Request to get Produit");
        self.repo.find_by_id(id).await
    }

    pub async fn exists(&self, id: &str) -> RepoResult<bool> {
        self.repo.exists_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        debug!(id, "Request to delete Produit");
        self.repo.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::MemoryProduitRepo;

    fn service() -> ProduitService {
        ProduitService::new(Arc::new(MemoryProduitRepo::new()))
    }

    fn produit(description: &str, nom: &str, prix: f64) -> Produit {
        Produit {
            id: None,
            description: Some(description.to_string()),
            nom: Some(nom.to_string()),
            prix: Some(prix),
        }
    }

    #[tokio::test]
    async fn partial_update_keeps_absent_fields() {
        let service = service();
        let saved = service.save(produit("AAAAAAAAAA", "AAAAAAAAAA", 1.0)).await.unwrap();

        let updated = service
            .partial_update(Produit {
                id: saved.id.clone(),
                description: None,
                nom: Some("BBBBBBBBBB".to_string()),
                prix: None,
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("AAAAAAAAAA"));
        assert_eq!(updated.nom.as_deref(), Some("BBBBBBBBBB"));
        assert_eq!(updated.prix, Some(1.0));
        assert_eq!(service.find_one(saved.id.as_deref().unwrap()).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn partial_update_of_unknown_id_is_none() {
        let service = service();
        let patch = Produit {
            id: Some("missing".to_string()),
            ..produit("x", "y", 3.0)
        };
        assert_eq!(service.partial_update(patch).await.unwrap(), None);
        assert_eq!(service.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let service = service();
        let saved = service.save(produit("a", "b", 1.0)).await.unwrap();

        let updated = service
            .update(Produit {
                id: saved.id.clone(),
                description: None,
                nom: Some("c".to_string()),
                prix: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.prix, None);
        assert_eq!(service.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_entity() {
        let service = service();
        let saved = service.save(produit("a", "b", 1.0)).await.unwrap();
        let id = saved.id.unwrap();

        assert!(service.exists(&id).await.unwrap());
        assert!(service.delete(&id).await.unwrap());
        assert!(!service.exists(&id).await.unwrap());
        assert!(service.find_all().await.unwrap().is_empty());
    }
}
