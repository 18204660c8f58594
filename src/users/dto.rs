use serde::Deserialize;

use super::repo_types::NewUser;

/// Body of `POST /users` and `PUT /user/:id`.
///
/// Absent fields decode as empty strings; nothing is validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl From<UserPayload> for NewUser {
    fn from(p: UserPayload) -> Self {
        Self {
            username: p.username,
            password: p.password,
            email: p.email,
        }
    }
}
