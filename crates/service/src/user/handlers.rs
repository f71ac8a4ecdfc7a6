//! Binds `UserService` procedures to the domain service.
//!
//! Wire requests are mapped into handler arguments here and nowhere else.

use std::sync::Arc;

use rpc::contracts::user::{
    CredentialsRequest, GetActiveUserByEmail, GetUserByEmail, GetUserByEmailPassword, GetUserById, UserReply,
    USER_METHODS,
};
use rpc::{RegistryBuilder, RegistryError, RpcFault, RpcRegistry};

use super::domain::{user_reply, CredentialLookup, User};
use super::service::UserService;
use crate::errors::ServiceError;

impl From<CredentialsRequest> for CredentialLookup {
    fn from(req: CredentialsRequest) -> Self {
        Self { email: req.email, plaintext_password: req.password }
    }
}

fn to_wire(result: Result<Option<User>, ServiceError>) -> Result<Option<UserReply>, RpcFault> {
    result.map(|found| found.as_ref().map(user_reply)).map_err(RpcFault::from)
}

/// Declare and register every `UserService` procedure.
pub fn register(builder: RegistryBuilder, service: Arc<UserService>) -> RegistryBuilder {
    let by_id = service.clone();
    let by_email = service.clone();
    let by_credentials = service.clone();
    let active = service;
    builder
        .declare(&USER_METHODS)
        .register::<GetUserById, _, _>(move |req| {
            let svc = by_id.clone();
            async move { to_wire(svc.get_user_by_id(req.id).await) }
        })
        .register::<GetUserByEmail, _, _>(move |req| {
            let svc = by_email.clone();
            async move { to_wire(svc.get_user_by_email(&req.email).await) }
        })
        .register::<GetUserByEmailPassword, _, _>(move |req| {
            let svc = by_credentials.clone();
            async move { to_wire(svc.get_user_by_email_and_password(CredentialLookup::from(req)).await) }
        })
        .register::<GetActiveUserByEmail, _, _>(move |req| {
            let svc = active.clone();
            async move { to_wire(svc.get_active_user_by_email(&req.email).await) }
        })
}

pub fn registry(service: Arc<UserService>) -> Result<RpcRegistry, RegistryError> {
    register(RegistryBuilder::new(), service).build()
}
