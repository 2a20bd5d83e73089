use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use sparetrack_core::InventoryId;

use crate::app::dto::{
    ErrorBody, InventoryDto, InventoryRequest, InventoryUpdateRequest, ValidationErrorBody,
};
use crate::app::errors::{self, ServiceError};
use crate::app::services::InventoryService;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route(
            "/:id",
            get(get_inventory).put(update_inventory).delete(delete_inventory),
        )
}

#[utoipa::path(
    get,
    path = "/api/inventories",
    tag = "inventories",
    responses((status = 200, description = "All inventory records, with the part embedded", body = [InventoryDto]))
)]
pub async fn list_inventory(
    Extension(service): Extension<Arc<InventoryService>>,
) -> Result<Json<Vec<InventoryDto>>, ServiceError> {
    let items = service.list().await?;
    Ok(Json(items.into_iter().map(InventoryDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/inventories/{id}",
    tag = "inventories",
    params(("id" = i64, Path, description = "Inventory id")),
    responses(
        (status = 200, description = "The inventory record", body = InventoryDto),
        (status = 404, description = "No such record", body = ErrorBody)
    )
)]
pub async fn get_inventory(
    Extension(service): Extension<Arc<InventoryService>>,
    Path(id): Path<String>,
) -> Result<Json<InventoryDto>, ServiceError> {
    let id: InventoryId = id.parse()?;
    Ok(Json(service.get(id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/inventories",
    tag = "inventories",
    request_body = InventoryRequest,
    responses(
        (status = 201, description = "Stock recorded", body = InventoryDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody),
        (status = 404, description = "Part not found", body = ErrorBody),
        (status = 500, description = "The part service could not be asked", body = ErrorBody)
    )
)]
pub async fn create_inventory(
    Extension(service): Extension<Arc<InventoryService>>,
    payload: Result<Json<InventoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InventoryDto>), ServiceError> {
    let request = errors::body(payload)?;
    let item = service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Only the quantity can change; the restock date moves to today.
#[utoipa::path(
    put,
    path = "/api/inventories/{id}",
    tag = "inventories",
    params(("id" = i64, Path, description = "Inventory id")),
    request_body = InventoryUpdateRequest,
    responses(
        (status = 200, description = "Stock updated", body = InventoryDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody),
        (status = 404, description = "No such record", body = ErrorBody)
    )
)]
pub async fn update_inventory(
    Extension(service): Extension<Arc<InventoryService>>,
    Path(id): Path<String>,
    payload: Result<Json<InventoryUpdateRequest>, JsonRejection>,
) -> Result<Json<InventoryDto>, ServiceError> {
    let id: InventoryId = id.parse()?;
    let request = errors::body(payload)?;
    Ok(Json(service.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/inventories/{id}",
    tag = "inventories",
    params(("id" = i64, Path, description = "Inventory id")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "No such record", body = ErrorBody)
    )
)]
pub async fn delete_inventory(
    Extension(service): Extension<Arc<InventoryService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id: InventoryId = id.parse()?;
    service.delete(id).await?;
    Ok(StatusCode::OK)
}
