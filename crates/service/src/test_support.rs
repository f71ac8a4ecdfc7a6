//! Fixtures shared by unit tests, integration tests and doc examples.

use std::sync::Arc;

use configs::CredentialsConfig;
use rpc::contracts::user::{UserServiceClient, USER_DOMAIN};
use rpc::{LocalTransport, RegistryError, RpcClient};

use crate::credentials::{Argon2Hasher, CredentialHasher};
use crate::user::repository::mock::InMemoryUserRepository;
use crate::user::UserService;

/// Cheap argon2 parameters; same shape as `env/test.toml`.
pub fn credentials_config() -> CredentialsConfig {
    CredentialsConfig { salt: "test-credential-salt".into(), memory_kib: 64, iterations: 1, parallelism: 1 }
}

pub fn hasher() -> Arc<dyn CredentialHasher> {
    match Argon2Hasher::new(&credentials_config()) {
        Ok(h) => Arc::new(h),
        Err(e) => panic!("test hasher: {e}"),
    }
}

/// User service over an empty in-memory store.
pub fn user_service() -> Arc<UserService> {
    Arc::new(UserService::new(Arc::new(InMemoryUserRepository::default()), hasher()))
}

/// `UserService` stub dispatching in-process into `users`.
pub fn local_user_client(users: Arc<UserService>) -> Result<UserServiceClient, RegistryError> {
    let registry = Arc::new(crate::user::handlers::registry(users)?);
    let transport = Arc::new(LocalTransport::new(registry));
    Ok(UserServiceClient::new(RpcClient::new(USER_DOMAIN, transport)))
}
