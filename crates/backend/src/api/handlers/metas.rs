use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::meta::{Meta, MetaDraft};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::domain::metas::service;
use crate::shared::data::db::get_programacao;

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list(Query(params): Query<ListParams>) -> Result<Json<Vec<Meta>>, ApiError> {
    let metas = service::list(get_programacao(), params.limit, params.offset).await?;
    Ok(Json(metas))
}

pub async fn create(
    ApiJson(draft): ApiJson<MetaDraft>,
) -> Result<(StatusCode, &'static str), ApiError> {
    service::create(get_programacao(), draft).await?;
    Ok((StatusCode::CREATED, "Meta inserida com sucesso!"))
}

pub async fn update(
    Path(id): Path<i32>,
    ApiJson(draft): ApiJson<MetaDraft>,
) -> Result<&'static str, ApiError> {
    service::update(get_programacao(), id, draft).await?;
    Ok("Meta atualizada com sucesso!")
}

pub async fn delete(Path(id): Path<i32>) -> Result<&'static str, ApiError> {
    service::delete(get_programacao(), id).await?;
    Ok("Meta excluída com sucesso!")
}
