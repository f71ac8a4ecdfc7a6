use async_trait::async_trait;
use models::user::{NewUser, UserFilter, UserStatus};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::user::domain::User;
use crate::user::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, ServiceError> {
        Ok(models::user::find_one(&self.db, &filter).await?)
    }

    async fn save(&self, new_user: NewUser) -> Result<User, ServiceError> {
        Ok(models::user::insert(&self.db, new_user).await?)
    }

    async fn update_status(&self, id: i32, status: UserStatus) -> Result<Option<User>, ServiceError> {
        Ok(models::user::update_status(&self.db, id, status).await?)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(models::user::delete_by_id(&self.db, id).await?)
    }
}
