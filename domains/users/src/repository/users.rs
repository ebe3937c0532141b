//! User repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lingodesk_common::{Error, RepositoryError, Result, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::directory::UserDirectory;
use crate::domain::entities::User;

/// Languages are aggregated per user so one row maps to one `User`
const SELECT_USER: &str = r#"
    SELECT u.id, u.name, u.email, u.role, u.password_hash, u.created_at,
           COALESCE(
               (SELECT array_agg(tl.language ORDER BY tl.language)
                FROM translator_languages tl WHERE tl.user_id = u.id),
               '{}'
           ) AS languages
    FROM users u
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    languages: Vec<String>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let role = row.role.parse::<UserRole>().map_err(|_| {
            Error::CorruptRecord(format!("user {} has unknown role {}", row.id, row.role))
        })?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            languages: row.languages,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_users_by_name(&self, name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE u.name = $1 ORDER BY u.created_at ASC, u.id ASC"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} ORDER BY u.created_at ASC, u.id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn get_translators_by_language(&self, language: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"{SELECT_USER}
            WHERE u.role = 'TRANSLATOR'
              AND EXISTS (
                  SELECT 1 FROM translator_languages tl
                  WHERE tl.user_id = u.id AND tl.language = $1
              )
            ORDER BY u.created_at ASC, u.id ASC
            "#
        ))
        .bind(language)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match RepositoryError::from_sqlx(e) {
            RepositoryError::AlreadyExists => {
                Error::Conflict(format!("A user with email {} already exists", user.email))
            }
            other => other.into(),
        })?;

        for language in &user.languages {
            sqlx::query("INSERT INTO translator_languages (user_id, language) VALUES ($1, $2)")
                .bind(user.id)
                .bind(language)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user.clone())
    }
}
