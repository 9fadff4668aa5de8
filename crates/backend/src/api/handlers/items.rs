use axum::Json;
use contracts::domain::item::Item;

use crate::api::error::ApiError;
use crate::domain::items::service;
use crate::shared::data::db::get_protheus;

pub async fn list() -> Result<Json<Vec<Item>>, ApiError> {
    let items = service::list(get_protheus()).await?;
    Ok(Json(items))
}
