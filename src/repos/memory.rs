//! In-memory backends, used when no `DATABASE_URL` is configured (and in tests).
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::{RepoError, RepoResult, UniqueField};
use crate::repos::new_document_id;
use crate::repos::produit_repo::{Produit, ProduitRepo};
use crate::repos::user_repo::{User, UserRepo};
use crate::services::auth::authorities;

#[derive(Clone, Debug, Default)]
pub struct MemoryProduitRepo {
    docs: Arc<RwLock<BTreeMap<String, Produit>>>,
}

impl MemoryProduitRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProduitRepo for MemoryProduitRepo {
    async fn save(&self, mut produit: Produit) -> RepoResult<Produit> {
        let id = produit.id.clone().unwrap_or_else(new_document_id);
        produit.id = Some(id.clone());
        self.docs.write().await.insert(id, produit.clone());
        Ok(produit)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Produit>> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Produit>> {
        Ok(self.docs.read().await.values().cloned().collect())
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.docs.read().await.len() as u64)
    }

    async fn exists_by_id(&self, id: &str) -> RepoResult<bool> {
        Ok(self.docs.read().await.contains_key(id))
    }

    async fn delete_by_id(&self, id: &str) -> RepoResult<bool> {
        Ok(self.docs.write().await.remove(id).is_some())
    }
}

/// Users keyed by id. Known authorities are fixed at construction.
#[derive(Clone, Debug)]
pub struct MemoryUserRepo {
    users: Arc<RwLock<BTreeMap<String, User>>>,
    authorities: Arc<BTreeSet<String>>,
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self {
            users: Arc::default(),
            authorities: Arc::new(BTreeSet::from([
                authorities::ADMIN.to_string(),
                authorities::USER.to_string(),
            ])),
        }
    }
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_first<P>(&self, predicate: P) -> Option<User>
    where
        P: Fn(&User) -> bool,
    {
        self.users
            .read()
            .await
            .values()
            .find(|u| predicate(*u))
            .cloned()
    }

    async fn sorted_by_login<P>(&self, predicate: P) -> Vec<User>
    where
        P: Fn(&User) -> bool,
    {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| predicate(*u))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));
        users
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_one_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        Ok(self.find_first(|u| u.login == login).await)
    }

    async fn find_one_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .find_first(|u| {
                u.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .await)
    }

    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.sorted_by_login(|_| true).await)
    }

    async fn find_all_activated(&self) -> RepoResult<Vec<User>> {
        Ok(self.sorted_by_login(|u| u.activated).await)
    }

    async fn count(&self) -> RepoResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    /// Login and email uniqueness are checked under the write lock.
    async fn save(&self, user: User) -> RepoResult<User> {
        let mut users = self.users.write().await;

        for other in users.values().filter(|u| u.id != user.id) {
            if other.login == user.login {
                return Err(RepoError::Duplicate(UniqueField::Login));
            }
            if let (Some(a), Some(b)) = (&other.email, &user.email)
                && a.eq_ignore_ascii_case(b)
            {
                return Err(RepoError::Duplicate(UniqueField::Email));
            }
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_by_login(&self, login: &str) -> RepoResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|_, u| u.login != login);
        Ok(users.len() < before)
    }

    async fn find_all_authorities(&self) -> RepoResult<Vec<String>> {
        Ok(self.authorities.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(id: &str, login: &str, activated: bool) -> User {
        User {
            id: id.to_string(),
            login: login.to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            email: Some(format!("{login}@localhost")),
            image_url: None,
            activated,
            lang_key: Some("en".to_string()),
            reset_key: None,
            reset_date: None,
            created_by: "system".to_string(),
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
            authorities: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn produit_save_assigns_an_id_and_replaces_by_id() {
        let repo = MemoryProduitRepo::new();
        let saved = repo
            .save(Produit {
                id: None,
                description: Some("d".into()),
                nom: Some("n".into()),
                prix: Some(1.0),
            })
            .await
            .unwrap();
        let id = saved.id.clone().unwrap();

        let replaced = repo
            .save(Produit {
                prix: Some(2.0),
                ..saved
            })
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_id(&id).await.unwrap(), Some(replaced));
        assert!(repo.delete_by_id(&id).await.unwrap());
        assert!(!repo.delete_by_id(&id).await.unwrap());
        assert!(!repo.exists_by_id(&id).await.unwrap());
    }

    #[tokio::test]
    async fn users_are_listed_by_login_and_filtered_by_activation() {
        let repo = MemoryUserRepo::new();
        repo.save(user("1", "zoe", true)).await.unwrap();
        repo.save(user("2", "adam", false)).await.unwrap();
        repo.save(user("3", "mia", true)).await.unwrap();

        let all: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.login)
            .collect();
        assert_eq!(all, vec!["adam", "mia", "zoe"]);

        let active: Vec<_> = repo
            .find_all_activated()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.login)
            .collect();
        assert_eq!(active, vec!["mia", "zoe"]);
    }

    #[tokio::test]
    async fn email_lookup_ignores_case_and_delete_by_login() {
        let repo = MemoryUserRepo::new();
        repo.save(user("1", "john", true)).await.unwrap();

        let found = repo.find_one_by_email("JOHN@localhost").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some("1".to_string()));

        assert!(repo.delete_by_login("john").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn save_rejects_duplicate_login_and_email() {
        let repo = MemoryUserRepo::new();
        let first = repo.save(user("1", "john", true)).await.unwrap();

        let err = repo.save(user("2", "john", true)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(UniqueField::Login)));

        let mut other = user("3", "jane", true);
        other.email = Some("JOHN@localhost".to_string());
        let err = repo.save(other).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(UniqueField::Email)));

        // re-saving the same id is an update
        repo.save(first).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn builtin_authorities_are_known() {
        let repo = MemoryUserRepo::new();
        assert_eq!(
            repo.find_all_authorities().await.unwrap(),
            vec!["ROLE_ADMIN", "ROLE_USER"]
        );
    }
}
