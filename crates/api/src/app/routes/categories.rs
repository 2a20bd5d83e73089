use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use sparetrack_core::CategoryId;

use crate::app::dto::{CategoryDto, CategoryRequest, ErrorBody, ValidationErrorBody};
use crate::app::errors::{self, ServiceError};
use crate::app::services::CategoryService;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses((status = 200, description = "All categories", body = [CategoryDto]))
)]
pub async fn list_categories(
    Extension(service): Extension<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryDto>>, ServiceError> {
    let categories = service.list().await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = CategoryDto),
        (status = 404, description = "No such category", body = ErrorBody)
    )
)]
pub async fn get_category(
    Extension(service): Extension<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryDto>, ServiceError> {
    let id: CategoryId = id.parse()?;
    Ok(Json(service.get(id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody)
    )
)]
pub async fn create_category(
    Extension(service): Extension<Arc<CategoryService>>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryDto>), ServiceError> {
    let request = errors::body(payload)?;
    let category = service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 400, description = "Field rules violated", body = ValidationErrorBody),
        (status = 404, description = "No such category", body = ErrorBody)
    )
)]
pub async fn update_category(
    Extension(service): Extension<Arc<CategoryService>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryDto>, ServiceError> {
    let id: CategoryId = id.parse()?;
    let request = errors::body(payload)?;
    Ok(Json(service.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "No such category", body = ErrorBody),
        (status = 409, description = "Parts still reference the category", body = ErrorBody)
    )
)]
pub async fn delete_category(
    Extension(service): Extension<Arc<CategoryService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id: CategoryId = id.parse()?;
    service.delete(id).await?;
    Ok(StatusCode::OK)
}
