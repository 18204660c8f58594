use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{error::ApiError, error::ApiResult, state::AppState};

use super::{dto::UserPayload, repo_types::User};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/user/:id", get(get_user).put(update_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_id(id)?;
    let user = state.users.find_by_id(id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<User>> {
    let payload = decode_payload(body)?;
    let user = state.users.create(payload.into()).await?;
    info!(id = user.id, "user created");
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_id(id)?;
    let payload = decode_payload(body)?;
    let user = state.users.update(id, payload.into()).await?;
    info!(id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<User>> {
    let id = parse_id(id)?;
    let user = state.users.delete(id).await?;
    info!(id, "user deleted");
    Ok(Json(user))
}

/// Ids arrive as raw path text; anything that is not an `int4` is a failed lookup.
fn parse_id(id: Result<Path<String>, PathRejection>) -> ApiResult<i32> {
    let Path(raw) = id.map_err(|e| ApiError::InvalidId(e.body_text()))?;
    raw.trim().parse::<i32>().map_err(|_| ApiError::InvalidId(raw))
}

/// Bodies are decoded as JSON whatever the `Content-Type` header says.
fn decode_payload(body: Result<Bytes, BytesRejection>) -> ApiResult<UserPayload> {
    let body = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    serde_json::from_slice::<UserPayload>(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}
