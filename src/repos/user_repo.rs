/*
 * Responsibility
 * - user accounts + their authorities (trait + SQLx backend)
 * - login and email are stored lowercased by the service; lookups compare as-is
 */
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub login: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub activated: bool,
    pub lang_key: Option<String>,
    pub reset_key: Option<String>,
    pub reset_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub authorities: BTreeSet<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync + 'static {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    async fn find_one_by_login(&self, login: &str) -> RepoResult<Option<User>>;

    async fn find_one_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// All users, ordered by login.
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    async fn find_all_activated(&self) -> RepoResult<Vec<User>>;

    async fn count(&self) -> RepoResult<u64>;

    /// Insert or replace, including the authority set.
    async fn save(&self, user: User) -> RepoResult<User>;

    async fn delete_by_login(&self, login: &str) -> RepoResult<bool>;

    /// Names of all known authorities.
    async fn find_all_authorities(&self) -> RepoResult<Vec<String>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    login: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    image_url: Option<String>,
    activated: bool,
    lang_key: Option<String>,
    reset_key: Option<String>,
    reset_date: Option<DateTime<Utc>>,
    created_by: String,
    created_date: DateTime<Utc>,
    last_modified_by: Option<String>,
    last_modified_date: Option<DateTime<Utc>>,
    authorities: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            image_url: row.image_url,
            activated: row.activated,
            lang_key: row.lang_key,
            reset_key: row.reset_key,
            reset_date: row.reset_date,
            created_by: row.created_by,
            created_date: row.created_date,
            last_modified_by: row.last_modified_by,
            last_modified_date: row.last_modified_date,
            authorities: row.authorities.into_iter().collect(),
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        u.id, u.login, u.password_hash, u.first_name, u.last_name, u.email,
        u.image_url, u.activated, u.lang_key, u.reset_key, u.reset_date,
        u.created_by, u.created_date, u.last_modified_by, u.last_modified_date,
        COALESCE(
            array_agg(ua.authority_name ORDER BY ua.authority_name)
                FILTER (WHERE ua.authority_name IS NOT NULL),
            ARRAY[]::text[]
        ) AS authorities
    FROM jhi_user u
    LEFT JOIN jhi_user_authority ua ON ua.user_id = u.id
"#;

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch_one_where(&self, predicate: &str, value: &str) -> RepoResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE {predicate} GROUP BY u.id");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        self.fetch_one_where("u.id = $1", id).await
    }

    async fn find_one_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        self.fetch_one_where("u.login = $1", login).await
    }

    async fn find_one_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.fetch_one_where("lower(u.email) = lower($1)", email)
            .await
    }

    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let sql = format!("{SELECT_USER} GROUP BY u.id ORDER BY u.login");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_all_activated(&self) -> RepoResult<Vec<User>> {
        let sql = format!("{SELECT_USER} WHERE u.activated GROUP BY u.id ORDER BY u.login");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> RepoResult<u64> {
        let n: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM jhi_user"#)
            .fetch_one(&self.db)
            .await?;

        Ok(u64::try_from(n).unwrap_or_default())
    }

    async fn save(&self, user: User) -> RepoResult<User> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO jhi_user (
                id, login, password_hash, first_name, last_name, email,
                image_url, activated, lang_key, reset_key, reset_date,
                created_by, created_date, last_modified_by, last_modified_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE
            SET
                login = EXCLUDED.login,
                password_hash = EXCLUDED.password_hash,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url,
                activated = EXCLUDED.activated,
                lang_key = EXCLUDED.lang_key,
                reset_key = EXCLUDED.reset_key,
                reset_date = EXCLUDED.reset_date,
                last_modified_by = EXCLUDED.last_modified_by,
                last_modified_date = EXCLUDED.last_modified_date
            "#,
        )
        .bind(&user.id)
        .bind(&user.login)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.image_url)
        .bind(user.activated)
        .bind(&user.lang_key)
        .bind(&user.reset_key)
        .bind(user.reset_date)
        .bind(&user.created_by)
        .bind(user.created_date)
        .bind(&user.last_modified_by)
        .bind(user.last_modified_date)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r#"DELETE FROM jhi_user_authority WHERE user_id = $1"#)
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;

        for authority in &user.authorities {
            sqlx::query(
                r#"
                INSERT INTO jhi_user_authority (user_id, authority_name)
                VALUES ($1, $2)
                "#,
            )
            .bind(&user.id)
            .bind(authority)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(user)
    }

    async fn delete_by_login(&self, login: &str) -> RepoResult<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM jhi_user_authority
            WHERE user_id IN (SELECT id FROM jhi_user WHERE login = $1)
            "#,
        )
        .bind(login)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(r#"DELETE FROM jhi_user WHERE login = $1"#)
            .bind(login)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_all_authorities(&self) -> RepoResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar(r#"SELECT name FROM jhi_authority ORDER BY name"#)
                .fetch_all(&self.db)
                .await?;

        Ok(names)
    }
}
