//! Local edge of the user backend: the operations that are not remote
//! procedures.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use rpc::contracts::user::UserReply;
use serde::Deserialize;
use service::user::domain::{user_reply, CreateUserInput};
use service::user::UserService;

use crate::errors::ApiError;
use crate::extract::{require_non_empty, validate_email, IdPath, Validate, ValidatedJson};

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
}

impl Validate for CreateUserBody {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        require_non_empty("password", &self.password)
    }
}

pub fn router(users: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/suspend", post(suspend_user))
        .with_state(users)
}

async fn create_user(
    State(users): State<Arc<UserService>>,
    ValidatedJson(body): ValidatedJson<CreateUserBody>,
) -> Result<(StatusCode, Json<UserReply>), ApiError> {
    let user = users
        .create_user(CreateUserInput { email: body.email, plaintext_password: body.password })
        .await?;
    Ok((StatusCode::CREATED, Json(user_reply(&user))))
}

async fn delete_user(State(users): State<Arc<UserService>>, IdPath(id): IdPath) -> Result<Json<UserReply>, ApiError> {
    let deleted = users.delete_user_by_id(id).await?.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_reply(&deleted)))
}

async fn suspend_user(State(users): State<Arc<UserService>>, IdPath(id): IdPath) -> Result<Json<UserReply>, ApiError> {
    let suspended = users.suspend_user_by_id(id).await?.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_reply(&suspended)))
}
