use chrono::{DateTime, Utc};
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveModelTrait, Condition, DatabaseConnection,
    EntityTrait, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Optional equality filters, AND-combined. `None` matches everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter<'a> {
    pub user_id: Option<&'a str>,
    pub service_name: Option<&'a str>,
}

impl Filter<'_> {
    fn apply<Q: QueryFilter>(&self, mut q: Q) -> Q {
        if let Some(uid) = self.user_id { q = q.filter(Column::UserId.eq(uid)); }
        if let Some(name) = self.service_name { q = q.filter(Column::ServiceName.eq(name)); }
        q
    }
}

pub fn validate_price(price: i64) -> Result<(), ModelError> {
    if price <= 0 {
        return Err(ModelError::Validation("price must be a positive integer".into()));
    }
    Ok(())
}

pub async fn insert(db: &DatabaseConnection, row: Model) -> Result<Model, ModelError> {
    validate_price(row.price)?;
    let am = ActiveModel {
        id: Set(row.id),
        service_name: Set(row.service_name),
        price: Set(row.price),
        user_id: Set(row.user_id),
        start_date: Set(row.start_date),
        end_date: Set(row.end_date),
    };
    Ok(am.insert(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id.to_string()).one(db).await?)
}

/// Rows matching `filter`, oldest period first.
pub async fn list(db: &DatabaseConnection, filter: Filter<'_>) -> Result<Vec<Model>, ModelError> {
    let rows = filter
        .apply(Entity::find())
        .order_by_asc(Column::StartDate)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Overwrite every column of the row identified by `row.id`.
pub async fn replace(db: &DatabaseConnection, row: Model) -> Result<Model, ModelError> {
    validate_price(row.price)?;
    let mut am: ActiveModel = Entity::find_by_id(row.id.clone())
        .one(db)
        .await?
        .ok_or(ModelError::NotFound("subscription"))?
        .into();
    am.service_name = Set(row.service_name);
    am.price = Set(row.price);
    am.user_id = Set(row.user_id);
    am.start_date = Set(row.start_date);
    am.end_date = Set(row.end_date);
    Ok(am.update(db).await?)
}

/// Hard delete; returns true if a row was removed.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Sum of `price` over rows whose interval overlaps `[start, end]`.
/// An open-ended row (no `end_date`) overlaps every period after its start.
pub async fn sum_price_in_range(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    filter: Filter<'_>,
) -> Result<i64, ModelError> {
    let query = filter
        .apply(Entity::find())
        .select_only()
        .column_as(Expr::cust("CAST(COALESCE(SUM(price), 0) AS BIGINT)"), "total")
        .filter(Column::StartDate.lte(end))
        .filter(
            Condition::any()
                .add(Column::EndDate.is_null())
                .add(Column::EndDate.gte(start)),
        );
    let total = query.into_tuple::<i64>().one(db).await?;
    Ok(total.unwrap_or(0))
}
