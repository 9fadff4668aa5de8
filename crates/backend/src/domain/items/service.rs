use contracts::domain::item::Item;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::api::error::ApiError;

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Item>, ApiError> {
    let items = repository::list(db).await?;
    Ok(items)
}
