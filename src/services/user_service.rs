/*
 * Responsibility
 * - user management use-cases (admin create/update/delete, listings)
 * - credential check for /authenticate
 * - startup seeding of the initial administrator
 */
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::repos::{RepoError, UniqueField, User, UserRepo, new_document_id};
use crate::services::auth::authorities;
use crate::services::auth::password::{self, PasswordError};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const SYSTEM_ACCOUNT: &str = "system";

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("login name already used")]
    LoginAlreadyUsed,
    #[error("email is already in use")]
    EmailAlreadyUsed,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user {0} was not activated")]
    NotActivated(String),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for UserServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Duplicate(UniqueField::Login) => Self::LoginAlreadyUsed,
            RepoError::Duplicate(UniqueField::Email) => Self::EmailAlreadyUsed,
            other => Self::Repo(other),
        }
    }
}

pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Profile fields an administrator may set.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub id: Option<String>,
    pub login: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub activated: bool,
    pub lang_key: Option<String>,
    pub authorities: BTreeSet<String>,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepo>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, draft: UserDraft, actor: &str) -> UserServiceResult<User> {
        debug!(login = %draft.login, "Request to create User");

        let login = draft.login.to_lowercase();
        if self.repo.find_one_by_login(&login).await?.is_some() {
            return Err(UserServiceError::LoginAlreadyUsed);
        }
        if let Some(email) = draft.email.as_deref()
            && self.repo.find_one_by_email(email).await?.is_some()
        {
            return Err(UserServiceError::EmailAlreadyUsed);
        }

        let now = Utc::now();
        // The account gets an unusable random password until it is reset.
        let password_hash = password::hash_password(&new_document_id())?;
        let authorities = self.known_authorities(draft.authorities).await?;

        let user = User {
            id: new_document_id(),
            login,
            password_hash,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email.map(|e| e.to_lowercase()),
            image_url: draft.image_url,
            activated: true,
            lang_key: Some(
                draft
                    .lang_key
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            ),
            reset_key: Some(new_document_id()),
            reset_date: Some(now),
            created_by: actor.to_string(),
            created_date: now,
            last_modified_by: Some(actor.to_string()),
            last_modified_date: Some(now),
            authorities,
        };

        let user = self.repo.save(user).await?;
        info!(login = %user.login, "created user");
        Ok(user)
    }

    /// Returns `None` when no user has `draft.id`.
    pub async fn update_user(
        &self,
        draft: UserDraft,
        actor: &str,
    ) -> UserServiceResult<Option<User>> {
        debug!(login = %draft.login, "Request to update User");

        let Some(id) = draft.id.clone() else {
            return Ok(None);
        };
        let login = draft.login.to_lowercase();

        if let Some(email) = draft.email.as_deref()
            && let Some(other) = self.repo.find_one_by_email(email).await?
            && other.id != id
        {
            return Err(UserServiceError::EmailAlreadyUsed);
        }
        if let Some(other) = self.repo.find_one_by_login(&login).await?
            && other.id != id
        {
            return Err(UserServiceError::LoginAlreadyUsed);
        }

        let Some(mut user) = self.repo.find_by_id(&id).await? else {
            return Ok(None);
        };

        user.login = login;
        user.first_name = draft.first_name;
        user.last_name = draft.last_name;
        user.email = draft.email.map(|e| e.to_lowercase());
        user.image_url = draft.image_url;
        user.activated = draft.activated;
        user.lang_key = draft.lang_key;
        user.authorities = self.known_authorities(draft.authorities).await?;
        user.last_modified_by = Some(actor.to_string());
        user.last_modified_date = Some(Utc::now());

        let user = self.repo.save(user).await?;
        debug!(login = %user.login, "Changed Information for User");
        Ok(Some(user))
    }

    pub async fn delete_user(&self, login: &str) -> UserServiceResult<bool> {
        let deleted = self.repo.delete_by_login(login).await?;
        if deleted {
            debug!(login, "Deleted User");
        }
        Ok(deleted)
    }

    pub async fn get_user_with_authorities_by_login(
        &self,
        login: &str,
    ) -> UserServiceResult<Option<User>> {
        Ok(self.repo.find_one_by_login(&login.to_lowercase()).await?)
    }

    pub async fn get_all_managed_users(&self) -> UserServiceResult<Vec<User>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn count_managed_users(&self) -> UserServiceResult<u64> {
        Ok(self.repo.count().await?)
    }

    pub async fn get_all_public_users(&self) -> UserServiceResult<Vec<User>> {
        Ok(self.repo.find_all_activated().await?)
    }

    pub async fn get_authorities(&self) -> UserServiceResult<Vec<String>> {
        Ok(self.repo.find_all_authorities().await?)
    }

    /// Check a login/password pair.
    ///
    /// Unknown logins and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, login: &str, password: &str) -> UserServiceResult<User> {
        let login = login.to_lowercase();
        let Some(user) = self.repo.find_one_by_login(&login).await? else {
            return Err(UserServiceError::InvalidCredentials);
        };
        if !password::verify_password(password, &user.password_hash) {
            return Err(UserServiceError::InvalidCredentials);
        }
        if !user.activated {
            return Err(UserServiceError::NotActivated(user.login));
        }
        Ok(user)
    }

    /// Create an activated administrator unless `login` already exists.
    ///
    /// Returns whether a user was created.
    pub async fn ensure_initial_admin(
        &self,
        login: &str,
        password: &str,
    ) -> UserServiceResult<bool> {
        let login = login.to_lowercase();
        if self.repo.find_one_by_login(&login).await?.is_some() {
            info!(login = %login, "initial admin already exists, skipping seed");
            return Ok(false);
        }

        let now = Utc::now();
        let user = User {
            id: new_document_id(),
            login,
            password_hash: password::hash_password(password)?,
            first_name: None,
            last_name: None,
            email: None,
            image_url: None,
            activated: true,
            lang_key: Some(DEFAULT_LANGUAGE.to_string()),
            reset_key: None,
            reset_date: None,
            created_by: SYSTEM_ACCOUNT.to_string(),
            created_date: now,
            last_modified_by: None,
            last_modified_date: None,
            authorities: BTreeSet::from([
                authorities::ADMIN.to_string(),
                authorities::USER.to_string(),
            ]),
        };

        let user = self.repo.save(user).await?;
        info!(login = %user.login, "created initial admin");
        Ok(true)
    }

    // Unknown authority names are dropped.
    async fn known_authorities(
        &self,
        requested: BTreeSet<String>,
    ) -> UserServiceResult<BTreeSet<String>> {
        let known: BTreeSet<String> = self
            .repo
            .find_all_authorities()
            .await?
            .into_iter()
            .collect();
        Ok(requested.into_iter().filter(|a| known.contains(a)).collect())
    }
}
