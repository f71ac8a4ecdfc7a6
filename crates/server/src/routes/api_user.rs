//! Edge for user lookups; every handler is one `UserService` call.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rpc::contracts::user::{UserReply, UserServiceClient};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::extract::{require_non_empty, validate_email, IdPath, Validate, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct EmailBody {
    pub email: String,
}

impl Validate for EmailBody {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)
    }
}

#[derive(Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

impl Validate for CredentialsBody {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        require_non_empty("password", &self.password)
    }
}

pub fn router(users: UserServiceClient) -> Router {
    Router::new()
        .route("/users/:id", get(get_user))
        .route("/users/find-by-email", post(find_by_email))
        .route("/users/find-by-credentials", post(find_by_credentials))
        .route("/users/find-active", post(find_active))
        .with_state(users)
}

fn found(user: Option<UserReply>) -> Result<Json<UserReply>, ApiError> {
    user.map(Json).ok_or(ApiError::NotFound("user"))
}

async fn get_user(State(users): State<UserServiceClient>, IdPath(id): IdPath) -> Result<Json<UserReply>, ApiError> {
    found(users.get_user_by_id(id).await?)
}

async fn find_by_email(
    State(users): State<UserServiceClient>,
    ValidatedJson(body): ValidatedJson<EmailBody>,
) -> Result<Json<UserReply>, ApiError> {
    found(users.get_user_by_email(&body.email).await?)
}

async fn find_by_credentials(
    State(users): State<UserServiceClient>,
    ValidatedJson(body): ValidatedJson<CredentialsBody>,
) -> Result<Json<UserReply>, ApiError> {
    found(users.get_user_by_email_password(&body.email, &body.password).await?)
}

async fn find_active(
    State(users): State<UserServiceClient>,
    ValidatedJson(body): ValidatedJson<EmailBody>,
) -> Result<Json<UserReply>, ApiError> {
    found(users.get_active_user_by_email(&body.email).await?)
}
