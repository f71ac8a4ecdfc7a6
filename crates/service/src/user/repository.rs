use async_trait::async_trait;
use models::user::{NewUser, UserFilter, UserStatus};

use super::domain::User;
use crate::errors::ServiceError;

/// Persistence gateway for users. Store errors propagate unchanged.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, ServiceError>;
    /// Persist a new row; the store assigns the id and the default status.
    async fn save(&self, new_user: NewUser) -> Result<User, ServiceError>;
    async fn update_status(&self, id: i32, status: UserStatus) -> Result<Option<User>, ServiceError>;
    /// Whether a row was removed.
    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use models::errors::ModelError;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Rows {
        next_id: i32,
        by_id: BTreeMap<i32, User>,
    }

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        rows: Mutex<Rows>,
        calls: AtomicUsize,
    }

    impl InMemoryUserRepository {
        /// Number of repository operations served so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, ServiceError> {
            self.touch();
            if filter.is_empty() {
                return Err(ModelError::Validation("user lookup needs at least one predicate".into()).into());
            }
            let rows = self.rows.lock().await;
            Ok(rows.by_id.values().find(|u| filter.matches(u)).cloned())
        }

        async fn save(&self, new_user: NewUser) -> Result<User, ServiceError> {
            self.touch();
            new_user.validate()?;
            let mut rows = self.rows.lock().await;
            if rows.by_id.values().any(|u| u.email == new_user.email) {
                return Err(ModelError::Constraint(format!("users.email `{}` already exists", new_user.email)).into());
            }
            rows.next_id += 1;
            let now = Utc::now().into();
            let user = User {
                id: rows.next_id,
                status: new_user.resolved_status(),
                email: new_user.email,
                password: new_user.password,
                created_at: now,
                updated_at: now,
            };
            rows.by_id.insert(user.id, user.clone());
            Ok(user)
        }

        async fn update_status(&self, id: i32, status: UserStatus) -> Result<Option<User>, ServiceError> {
            self.touch();
            let mut rows = self.rows.lock().await;
            Ok(rows.by_id.get_mut(&id).map(|u| {
                u.status = status;
                u.updated_at = Utc::now().into();
                u.clone()
            }))
        }

        async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
            self.touch();
            Ok(self.rows.lock().await.by_id.remove(&id).is_some())
        }
    }
}
