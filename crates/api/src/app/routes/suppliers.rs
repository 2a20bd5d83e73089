use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use sparetrack_core::SupplierId;

use crate::app::dto::{ErrorBody, SupplierDto, SupplierRequest, ValidationErrorBody};
use crate::app::errors::{self, ServiceError};
use crate::app::services::SupplierService;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "suppliers",
    responses((status = 200, description = "All suppliers", body = [SupplierDto]))
)]
pub async fn list_suppliers(
    Extension(service): Extension<Arc<SupplierService>>,
) -> Result<Json<Vec<SupplierDto>>, ServiceError> {
    let suppliers = service.list().await?;
    Ok(Json(suppliers.into_iter().map(SupplierDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "suppliers",
    params(("id" = i64, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "The supplier", body = SupplierDto),
        (status = 404, description = "No such supplier", body = ErrorBody)
    )
)]
pub async fn get_supplier(
    Extension(service): Extension<Arc<SupplierService>>,
    Path(id): Path<String>,
) -> Result<Json<SupplierDto>, ServiceError> {
    let id: SupplierId = id.parse()?;
    Ok(Json(service.get(id).await?.into()))
}

/// Phone and email must be well formed and not used by another supplier.
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = SupplierDto),
        (status = 400, description = "Field rules violated or phone/email taken", body = ValidationErrorBody)
    )
)]
pub async fn create_supplier(
    Extension(service): Extension<Arc<SupplierService>>,
    payload: Result<Json<SupplierRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SupplierDto>), ServiceError> {
    let request = errors::body(payload)?;
    let supplier = service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(supplier.into())))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "suppliers",
    params(("id" = i64, Path, description = "Supplier id")),
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = SupplierDto),
        (status = 400, description = "Field rules violated or phone/email taken", body = ValidationErrorBody),
        (status = 404, description = "No such supplier", body = ErrorBody)
    )
)]
pub async fn update_supplier(
    Extension(service): Extension<Arc<SupplierService>>,
    Path(id): Path<String>,
    payload: Result<Json<SupplierRequest>, JsonRejection>,
) -> Result<Json<SupplierDto>, ServiceError> {
    let id: SupplierId = id.parse()?;
    let request = errors::body(payload)?;
    Ok(Json(service.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "suppliers",
    params(("id" = i64, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier deleted"),
        (status = 404, description = "No such supplier", body = ErrorBody),
        (status = 409, description = "Parts still reference the supplier", body = ErrorBody)
    )
)]
pub async fn delete_supplier(
    Extension(service): Extension<Arc<SupplierService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id: SupplierId = id.parse()?;
    service.delete(id).await?;
    Ok(StatusCode::OK)
}
