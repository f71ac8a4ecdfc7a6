use chrono::Utc;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Lifecycle status of an account. Deletion is row removal, so there is no
/// `DELETED` value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "SUSPENDED")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// Credential hash; the plaintext never reaches this table.
    pub password: String,
    pub status: UserStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A user record as supplied by the caller before persistence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub status: Option<UserStatus>,
}

impl NewUser {
    /// The one place a new account's initial status is decided.
    pub fn resolved_status(&self) -> UserStatus {
        self.status.unwrap_or(UserStatus::Active)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.email.trim().is_empty() {
            return Err(ModelError::Validation("email required".into()));
        }
        if self.password.is_empty() {
            return Err(ModelError::Validation("credential hash required".into()));
        }
        Ok(())
    }
}

/// Conjunction of equality predicates over a user row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<i32>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserFilter {
    pub fn by_id(id: i32) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self { email: Some(email.into()), ..Self::default() }
    }

    pub fn with_password(mut self, password_hash: impl Into<String>) -> Self {
        self.password = Some(password_hash.into());
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.email.is_none() && self.password.is_none() && self.status.is_none()
    }

    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(id) = self.id {
            cond = cond.add(Column::Id.eq(id));
        }
        if let Some(email) = &self.email {
            cond = cond.add(Column::Email.eq(email.clone()));
        }
        if let Some(password) = &self.password {
            cond = cond.add(Column::Password.eq(password.clone()));
        }
        if let Some(status) = self.status {
            cond = cond.add(Column::Status.eq(status));
        }
        cond
    }

    /// In-process evaluation of the same predicate as [`condition`](Self::condition).
    pub fn matches(&self, row: &Model) -> bool {
        self.id.map_or(true, |id| row.id == id)
            && self.email.as_ref().map_or(true, |email| &row.email == email)
            && self.password.as_ref().map_or(true, |password| &row.password == password)
            && self.status.map_or(true, |status| row.status == status)
    }

    fn ensure_bounded(&self) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::Validation("user lookup needs at least one predicate".into()));
        }
        Ok(())
    }
}

pub async fn insert(db: &DatabaseConnection, new_user: NewUser) -> Result<Model, ModelError> {
    new_user.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        status: Set(new_user.resolved_status()),
        email: Set(new_user.email),
        password: Set(new_user.password),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_one(db: &DatabaseConnection, filter: &UserFilter) -> Result<Option<Model>, ModelError> {
    filter.ensure_bounded()?;
    Ok(Entity::find().filter(filter.condition()).one(db).await?)
}

pub async fn update_status(db: &DatabaseConnection, id: i32, status: UserStatus) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

/// Returns whether a row was removed.
pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, email: &str, status: UserStatus) -> Model {
        let now = Utc::now().into();
        Model { id, email: email.into(), password: "h".into(), status, created_at: now, updated_at: now }
    }

    #[test]
    fn new_user_defaults_to_active() {
        let new_user = NewUser { email: "a@x.com".into(), password: "h".into(), status: None };
        assert_eq!(new_user.resolved_status(), UserStatus::Active);
        let suspended = NewUser { status: Some(UserStatus::Suspended), ..new_user };
        assert_eq!(suspended.resolved_status(), UserStatus::Suspended);
    }

    #[test]
    fn filter_is_a_conjunction() {
        let active = row(1, "a@x.com", UserStatus::Active);
        let suspended = row(2, "b@x.com", UserStatus::Suspended);

        let by_email = UserFilter::by_email("b@x.com");
        assert!(!by_email.matches(&active));
        assert!(by_email.matches(&suspended));

        let active_only = UserFilter::by_email("b@x.com").with_status(UserStatus::Active);
        assert!(!active_only.matches(&suspended));

        let wrong_hash = UserFilter::by_email("a@x.com").with_password("other");
        assert!(!wrong_hash.matches(&active));
        assert!(UserFilter::by_email("a@x.com").with_password("h").matches(&active));
    }

    #[test]
    fn empty_filter_is_rejected() {
        assert!(UserFilter::default().is_empty());
        assert!(matches!(UserFilter::default().ensure_bounded(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn status_serializes_in_upper_case() {
        assert_eq!(UserStatus::Suspended.to_value(), "SUSPENDED");
    }
}
