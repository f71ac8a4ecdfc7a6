//! `UserService` contract, served by the user backend.
//!
//! Wire field names are camelCase; the credential lookup additionally accepts
//! `plaintextPassword` / `plaintext_password` for `password`.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::client::RpcClient;
use crate::descriptor::{MethodDescriptor, RemoteMethod};
use crate::error::RpcError;
use crate::locator::ServiceLocator;

/// Locator key of the user backend.
pub const USER_DOMAIN: &str = "user";
pub const USER_SERVICE: &str = "UserService";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserState {
    Active,
    Suspended,
}

/// User as seen by callers. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReply {
    pub id: i32,
    pub email: String,
    pub status: UserState,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    #[serde(alias = "userId", alias = "user_id")]
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    #[serde(alias = "plaintextPassword", alias = "plaintext_password")]
    pub password: String,
}

pub struct GetUserById;
pub struct GetUserByEmail;
pub struct GetUserByEmailPassword;
pub struct GetActiveUserByEmail;

impl RemoteMethod for GetUserById {
    const SERVICE: &'static str = USER_SERVICE;
    const METHOD: &'static str = "GetUserById";
    type Request = UserIdRequest;
    type Response = Option<UserReply>;
}

impl RemoteMethod for GetUserByEmail {
    const SERVICE: &'static str = USER_SERVICE;
    const METHOD: &'static str = "GetUserByEmail";
    type Request = EmailRequest;
    type Response = Option<UserReply>;
}

impl RemoteMethod for GetUserByEmailPassword {
    const SERVICE: &'static str = USER_SERVICE;
    const METHOD: &'static str = "GetUserByEmailPassword";
    type Request = CredentialsRequest;
    type Response = Option<UserReply>;
}

impl RemoteMethod for GetActiveUserByEmail {
    const SERVICE: &'static str = USER_SERVICE;
    const METHOD: &'static str = "GetActiveUserByEmail";
    type Request = EmailRequest;
    type Response = Option<UserReply>;
}

/// Every procedure the user backend must serve.
pub const USER_METHODS: [MethodDescriptor; 4] = [
    MethodDescriptor::new(GetUserById::SERVICE, GetUserById::METHOD),
    MethodDescriptor::new(GetUserByEmail::SERVICE, GetUserByEmail::METHOD),
    MethodDescriptor::new(GetUserByEmailPassword::SERVICE, GetUserByEmailPassword::METHOD),
    MethodDescriptor::new(GetActiveUserByEmail::SERVICE, GetActiveUserByEmail::METHOD),
];

/// Typed stub over the user backend.
#[derive(Clone)]
pub struct UserServiceClient {
    inner: RpcClient,
}

impl UserServiceClient {
    pub fn new(inner: RpcClient) -> Self {
        Self { inner }
    }

    pub fn from_locator(locator: &ServiceLocator) -> Result<Self, RpcError> {
        Ok(Self::new(locator.client(USER_DOMAIN)?))
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<UserReply>, RpcError> {
        self.inner.call::<GetUserById>(UserIdRequest { id }).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserReply>, RpcError> {
        self.inner.call::<GetUserByEmail>(EmailRequest { email: email.to_string() }).await
    }

    pub async fn get_user_by_email_password(&self, email: &str, password: &str) -> Result<Option<UserReply>, RpcError> {
        let request = CredentialsRequest { email: email.to_string(), password: password.to_string() };
        self.inner.call::<GetUserByEmailPassword>(request).await
    }

    pub async fn get_active_user_by_email(&self, email: &str) -> Result<Option<UserReply>, RpcError> {
        self.inner.call::<GetActiveUserByEmail>(EmailRequest { email: email.to_string() }).await
    }
}
