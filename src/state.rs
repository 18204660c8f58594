use crate::config::AppConfig;
use crate::users::repo::{PgUserStore, UserStore};
use std::sync::Arc;

/// Shared per-request state. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = crate::db::connect(&config.db).await?;

        if let Err(e) = crate::db::migrate(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let users = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        Ok(Self::from_store(users))
    }

    pub fn from_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::repo_types::{NewUser, User};
        use axum::async_trait;
        use std::sync::Mutex;

        #[derive(Default)]
        struct FakeUsers {
            rows: Mutex<(i32, Vec<User>)>,
        }

        #[async_trait]
        impl UserStore for FakeUsers {
            async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
                Ok(self.rows.lock().unwrap().1.clone())
            }
            async fn find_by_id(&self, id: i32) -> Result<User, sqlx::Error> {
                let rows = self.rows.lock().unwrap();
                rows.1
                    .iter()
                    .find(|u| u.id == id)
                    .cloned()
                    .ok_or(sqlx::Error::RowNotFound)
            }
            async fn create(&self, new: NewUser) -> Result<User, sqlx::Error> {
                let mut rows = self.rows.lock().unwrap();
                rows.0 += 1;
                let user = new.into_user(rows.0);
                rows.1.push(user.clone());
                Ok(user)
            }
            async fn update(&self, id: i32, new: NewUser) -> Result<User, sqlx::Error> {
                let mut rows = self.rows.lock().unwrap();
                let slot = rows
                    .1
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                *slot = new.into_user(id);
                Ok(slot.clone())
            }
            async fn delete(&self, id: i32) -> Result<User, sqlx::Error> {
                let mut rows = self.rows.lock().unwrap();
                let pos = rows
                    .1
                    .iter()
                    .position(|u| u.id == id)
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(rows.1.remove(pos))
            }
        }

        Self::from_store(Arc::new(FakeUsers::default()) as Arc<dyn UserStore>)
    }
}
