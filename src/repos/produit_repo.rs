/*
 * Responsibility
 * - Produit persistence (trait + SQLx backend)
 * - the store assigns an id when the entity has none
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;
use crate::repos::new_document_id;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Produit {
    pub id: Option<String>,
    pub description: Option<String>,
    pub nom: Option<String>,
    pub prix: Option<f64>,
}

#[async_trait]
pub trait ProduitRepo: Send + Sync + 'static {
    /// Insert, or replace the stored entity with the same id.
    async fn save(&self, produit: Produit) -> RepoResult<Produit>;

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Produit>>;

    /// All entities, ordered by id.
    async fn find_all(&self) -> RepoResult<Vec<Produit>>;

    async fn count(&self) -> RepoResult<u64>;

    async fn exists_by_id(&self, id: &str) -> RepoResult<bool>;

    // Returns whether something was deleted.
    async fn delete_by_id(&self, id: &str) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgProduitRepo {
    db: PgPool,
}

impl PgProduitRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProduitRepo for PgProduitRepo {
    async fn save(&self, produit: Produit) -> RepoResult<Produit> {
        let id = produit.id.unwrap_or_else(new_document_id);

        let row = sqlx::query_as::<_, Produit>(
            r#"
            INSERT INTO produit (id, description, nom, prix)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET
                description = EXCLUDED.description,
                nom = EXCLUDED.nom,
                prix = EXCLUDED.prix
            RETURNING id, description, nom, prix
            "#,
        )
        .bind(id)
        .bind(produit.description)
        .bind(produit.nom)
        .bind(produit.prix)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Produit>> {
        let row = sqlx::query_as::<_, Produit>(
            r#"
            SELECT id, description, nom, prix
            FROM produit
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> RepoResult<Vec<Produit>> {
        let rows = sqlx::query_as::<_, Produit>(
            r#"
            SELECT id, description, nom, prix
            FROM produit
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> RepoResult<u64> {
        let n: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM produit"#)
            .fetch_one(&self.db)
            .await?;

        Ok(u64::try_from(n).unwrap_or_default())
    }

    async fn exists_by_id(&self, id: &str) -> RepoResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM produit WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    async fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM produit
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
