use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use sparetrack_core::{CategoryId, PartId, SupplierId};

use crate::app::dto::{ErrorBody, PartDto, PartRequest, ValidationErrorBody};
use crate::app::errors::{self, ServiceError};
use crate::app::services::PartService;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/exists-by-category/:category_id", get(exists_by_category))
        .route("/exists-by-supplier/:supplier_id", get(exists_by_supplier))
}

#[utoipa::path(
    get,
    path = "/api/parts",
    tag = "parts",
    responses((status = 200, description = "All parts, with category and supplier embedded", body = [PartDto]))
)]
pub async fn list_parts(
    Extension(service): Extension<Arc<PartService>>,
) -> Result<Json<Vec<PartDto>>, ServiceError> {
    let parts = service.list().await?;
    Ok(Json(parts.into_iter().map(PartDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/parts/{id}",
    tag = "parts",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = 200, description = "The part", body = PartDto),
        (status = 404, description = "No such part", body = ErrorBody)
    )
)]
pub async fn get_part(
    Extension(service): Extension<Arc<PartService>>,
    Path(id): Path<String>,
) -> Result<Json<PartDto>, ServiceError> {
    let id: PartId = id.parse()?;
    Ok(Json(service.get(id).await?.into()))
}

/// The category and supplier must exist at their owning services.
#[utoipa::path(
    post,
    path = "/api/parts",
    tag = "parts",
    request_body = PartRequest,
    responses(
        (status = 201, description = "Part created", body = PartDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody),
        (status = 404, description = "Category or supplier not found", body = ErrorBody),
        (status = 500, description = "A peer service could not be asked", body = ErrorBody)
    )
)]
pub async fn create_part(
    Extension(service): Extension<Arc<PartService>>,
    payload: Result<Json<PartRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PartDto>), ServiceError> {
    let request = errors::body(payload)?;
    let part = service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(part.into())))
}

#[utoipa::path(
    put,
    path = "/api/parts/{id}",
    tag = "parts",
    params(("id" = i64, Path, description = "Part id")),
    request_body = PartRequest,
    responses(
        (status = 200, description = "Part updated", body = PartDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody),
        (status = 404, description = "Part, category or supplier not found", body = ErrorBody),
        (status = 500, description = "A peer service could not be asked", body = ErrorBody)
    )
)]
pub async fn update_part(
    Extension(service): Extension<Arc<PartService>>,
    Path(id): Path<String>,
    payload: Result<Json<PartRequest>, JsonRejection>,
) -> Result<Json<PartDto>, ServiceError> {
    let id: PartId = id.parse()?;
    let request = errors::body(payload)?;
    Ok(Json(service.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/parts/{id}",
    tag = "parts",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = 200, description = "Part deleted"),
        (status = 404, description = "No such part", body = ErrorBody)
    )
)]
pub async fn delete_part(
    Extension(service): Extension<Arc<PartService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id: PartId = id.parse()?;
    service.delete(id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/parts/exists-by-category/{category_id}",
    tag = "parts",
    params(("category_id" = i64, Path, description = "Category id")),
    responses((status = 200, description = "Whether any part references the category", body = bool))
)]
pub async fn exists_by_category(
    Extension(service): Extension<Arc<PartService>>,
    Path(category_id): Path<String>,
) -> Result<Json<bool>, ServiceError> {
    let id: CategoryId = category_id.parse()?;
    Ok(Json(service.exists_by_category(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/parts/exists-by-supplier/{supplier_id}",
    tag = "parts",
    params(("supplier_id" = i64, Path, description = "Supplier id")),
    responses((status = 200, description = "Whether any part references the supplier", body = bool))
)]
pub async fn exists_by_supplier(
    Extension(service): Extension<Arc<PartService>>,
    Path(supplier_id): Path<String>,
) -> Result<Json<bool>, ServiceError> {
    let id: SupplierId = supplier_id.parse()?;
    Ok(Json(service.exists_by_supplier(id).await?))
}
