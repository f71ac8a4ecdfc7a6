use chrono::Utc;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "HIDDEN")]
    Hidden,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Id of the owning user. The user table belongs to another service, so
    /// there is no foreign key.
    #[sea_orm(indexed)]
    pub owner_id: i32,
    pub name: String,
    /// Minor currency units.
    pub price: i64,
    pub status: ProductStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub owner_id: i32,
    pub name: String,
    pub price: i64,
    pub status: Option<ProductStatus>,
}

impl NewProduct {
    pub fn resolved_status(&self) -> ProductStatus {
        self.status.unwrap_or(ProductStatus::Active)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("product name required".into()));
        }
        if self.price < 0 {
            return Err(ModelError::Validation("price must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub id: Option<i32>,
    pub owner_id: Option<i32>,
    pub status: Option<ProductStatus>,
}

impl ProductFilter {
    pub fn by_id(id: i32) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn by_owner(owner_id: i32) -> Self {
        Self { owner_id: Some(owner_id), ..Self::default() }
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.owner_id.is_none() && self.status.is_none()
    }

    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(id) = self.id {
            cond = cond.add(Column::Id.eq(id));
        }
        if let Some(owner_id) = self.owner_id {
            cond = cond.add(Column::OwnerId.eq(owner_id));
        }
        if let Some(status) = self.status {
            cond = cond.add(Column::Status.eq(status));
        }
        cond
    }

    pub fn matches(&self, row: &Model) -> bool {
        self.id.map_or(true, |id| row.id == id)
            && self.owner_id.map_or(true, |owner_id| row.owner_id == owner_id)
            && self.status.map_or(true, |status| row.status == status)
    }

    fn ensure_bounded(&self) -> Result<(), ModelError> {
        if self.is_empty() {
            return Err(ModelError::Validation("product lookup needs at least one predicate".into()));
        }
        Ok(())
    }
}

pub async fn insert(db: &DatabaseConnection, new_product: NewProduct) -> Result<Model, ModelError> {
    new_product.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        status: Set(new_product.resolved_status()),
        owner_id: Set(new_product.owner_id),
        name: Set(new_product.name),
        price: Set(new_product.price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_one(db: &DatabaseConnection, filter: &ProductFilter) -> Result<Option<Model>, ModelError> {
    filter.ensure_bounded()?;
    Ok(Entity::find().filter(filter.condition()).one(db).await?)
}

/// All matching rows in id order.
pub async fn find_all(db: &DatabaseConnection, filter: &ProductFilter) -> Result<Vec<Model>, ModelError> {
    filter.ensure_bounded()?;
    Ok(Entity::find()
        .filter(filter.condition())
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_price_is_rejected() {
        let p = NewProduct { owner_id: 1, name: "lamp".into(), price: -1, status: None };
        assert!(matches!(p.validate(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn owner_filter_respects_status() {
        let now = Utc::now().into();
        let hidden = Model {
            id: 3,
            owner_id: 9,
            name: "lamp".into(),
            price: 1200,
            status: ProductStatus::Hidden,
            created_at: now,
            updated_at: now,
        };
        assert!(ProductFilter::by_owner(9).matches(&hidden));
        assert!(!ProductFilter::by_owner(9).with_status(ProductStatus::Active).matches(&hidden));
        assert!(!ProductFilter::by_owner(8).matches(&hidden));
    }
}
