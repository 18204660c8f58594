use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
///
/// Serialized with capitalized keys (`ID`, `Username`, ...). The password is
/// stored and returned in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
}

/// Column values written by insert and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            email: self.email,
        }
    }
}
