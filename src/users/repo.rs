use axum::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::repo_types::{NewUser, User};

/// Persistence seam for the `users` table.
///
/// A missing row is reported as `sqlx::Error::RowNotFound`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<User, sqlx::Error>;
    async fn create(&self, new: NewUser) -> Result<User, sqlx::Error>;
    async fn update(&self, id: i32, new: NewUser) -> Result<User, sqlx::Error>;
    async fn delete(&self, id: i32) -> Result<User, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
    }

    async fn create(&self, new: NewUser) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, email
            "#,
        )
        .bind(new.username)
        .bind(new.password)
        .bind(new.email)
        .fetch_one(&self.db)
        .await?;
        debug!(id = user.id, "inserted user");
        Ok(user)
    }

    async fn update(&self, id: i32, new: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password = $3, email = $4
            WHERE id = $1
            RETURNING id, username, password, email
            "#,
        )
        .bind(id)
        .bind(new.username)
        .bind(new.password)
        .bind(new.email)
        .fetch_one(&self.db)
        .await
    }

    async fn delete(&self, id: i32) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, username, password, email
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
    }
}
