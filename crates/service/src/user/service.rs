use std::sync::Arc;

use models::user::{NewUser, UserFilter, UserStatus};
use tracing::{info, instrument, warn};

use super::domain::{CreateUserInput, CredentialLookup, User};
use super::repository::UserRepository;
use crate::credentials::CredentialHasher;
use crate::errors::ServiceError;

/// User domain service. Owns the user table through its repository and
/// hashes every credential before it reaches storage or a lookup.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Create an `ACTIVE` user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::user::{domain::CreateUserInput, repository::mock::InMemoryUserRepository, UserService};
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::default()), service::test_support::hasher());
    /// let input = CreateUserInput { email: "user@example.com".into(), plaintext_password: "p1".into() };
    /// let user = tokio_test::block_on(svc.create_user(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_ne!(user.password, "p1");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, ServiceError> {
        let password = self.hasher.hash(&input.plaintext_password)?;
        let user = self
            .repo
            .save(NewUser { email: input.email, password, status: None })
            .await?;
        info!(user_id = user.id, email = %user.email, "user_created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        self.repo.find_one(UserFilter::by_id(id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.repo.find_one(UserFilter::by_email(email)).await
    }

    /// A wrong email and a wrong password are the same miss.
    #[instrument(skip(self, lookup), fields(email = %lookup.email))]
    pub async fn get_user_by_email_and_password(&self, lookup: CredentialLookup) -> Result<Option<User>, ServiceError> {
        let hash = self.hasher.hash(&lookup.plaintext_password)?;
        self.repo.find_one(UserFilter::by_email(lookup.email).with_password(hash)).await
    }

    /// The identity-usable lookup: never yields a non-`ACTIVE` user.
    #[instrument(skip(self))]
    pub async fn get_active_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.repo
            .find_one(UserFilter::by_email(email).with_status(UserStatus::Active))
            .await
    }

    /// Read, delete, and hand back the row as it was before deletion.
    #[instrument(skip(self))]
    pub async fn delete_user_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let Some(snapshot) = self.repo.find_one(UserFilter::by_id(id)).await? else {
            return Ok(None);
        };
        if !self.repo.delete_by_id(id).await? {
            warn!(user_id = id, "user vanished before delete");
            return Ok(None);
        }
        info!(user_id = id, "user_deleted");
        Ok(Some(snapshot))
    }

    #[instrument(skip(self))]
    pub async fn suspend_user_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let updated = self.repo.update_status(id, UserStatus::Suspended).await?;
        if updated.is_some() {
            info!(user_id = id, "user_suspended");
        }
        Ok(updated)
    }
}
