//! Shared setup for the Postgres-backed tests.
//!
//! Connection settings come from the same `DB_*` variables the server reads.
//! Every context drops the schema and re-applies migrations, so these tests
//! must run one at a time:
//!
//! ```bash
//! cargo test --test users_api -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use sqlx::PgPool;
use tower::ServiceExt;
use users_api::{
    app::build_app,
    config::AppConfig,
    db,
    state::AppState,
    users::repo::{PgUserStore, UserStore},
};

pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

impl TestContext {
    /// Empties the database, migrates it to the latest version and builds the router.
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let pool = db::connect(&config.db).await?;

        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
            .execute(&pool)
            .await?;
        db::migrate(&pool).await?;

        let store = Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>;
        let app = build_app(AppState::from_store(store));

        Ok(Self { db: pool, app })
    }

    pub async fn insert_user(&self, username: &str, password: &str, email: &str) -> anyhow::Result<i32> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO users (username, password, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(password)
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    /// Sends a request with an optional raw JSON body and no `Content-Type`,
    /// the way a bare client would.
    pub async fn send(&self, method: &str, uri: &str, json: Option<&str>) -> Response {
        let body = json.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();
        self.app.clone().oneshot(req).await.unwrap()
    }
}

pub async fn body_bytes(res: Response) -> Vec<u8> {
    axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
