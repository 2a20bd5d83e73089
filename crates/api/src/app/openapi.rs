//! Per-service OpenAPI documents, served at `/v3/api-docs` and merged by
//! the gateway.

use utoipa::OpenApi;

use crate::app::dto::{
    CategoryDto, CategoryRequest, ErrorBody, InventoryDto, InventoryRequest,
    InventoryUpdateRequest, PartDto, PartRequest, RegisterRequest, SupplierDto, SupplierRequest,
    ValidationErrorBody,
};
use crate::app::routes::{auth, categories, gateway, inventory, parts, suppliers};
use crate::app::ServiceKind;

#[derive(OpenApi)]
#[openapi(
    info(title = "Category service", version = "1.0.0"),
    paths(
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category
    ),
    components(schemas(CategoryRequest, CategoryDto, ErrorBody, ValidationErrorBody)),
    tags((name = "categories", description = "Part categories"))
)]
struct CategoryDocs;

#[derive(OpenApi)]
#[openapi(
    info(title = "Supplier service", version = "1.0.0"),
    paths(
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier
    ),
    components(schemas(SupplierRequest, SupplierDto, ErrorBody, ValidationErrorBody)),
    tags((name = "suppliers", description = "Suppliers and their contact details"))
)]
struct SupplierDocs;

#[derive(OpenApi)]
#[openapi(
    info(title = "Part service", version = "1.0.0"),
    paths(
        parts::list_parts,
        parts::get_part,
        parts::create_part,
        parts::update_part,
        parts::delete_part,
        parts::exists_by_category,
        parts::exists_by_supplier
    ),
    components(schemas(
        PartRequest,
        PartDto,
        CategoryDto,
        SupplierDto,
        ErrorBody,
        ValidationErrorBody
    )),
    tags((name = "parts", description = "Spare parts"))
)]
struct PartDocs;

#[derive(OpenApi)]
#[openapi(
    info(title = "Inventory service", version = "1.0.0"),
    paths(
        inventory::list_inventory,
        inventory::get_inventory,
        inventory::create_inventory,
        inventory::update_inventory,
        inventory::delete_inventory
    ),
    components(schemas(
        InventoryRequest,
        InventoryUpdateRequest,
        InventoryDto,
        PartDto,
        CategoryDto,
        SupplierDto,
        ErrorBody,
        ValidationErrorBody
    )),
    tags((name = "inventories", description = "Stock levels per part"))
)]
struct InventoryDocs;

#[derive(OpenApi)]
#[openapi(
    info(title = "API gateway", version = "1.0.0"),
    paths(gateway::swagger),
    tags((name = "gateway", description = "Aggregated API description"))
)]
struct GatewayDocs;

#[derive(OpenApi)]
#[openapi(
    info(title = "Security service", version = "1.0.0"),
    paths(auth::register),
    components(schemas(RegisterRequest, ErrorBody, ValidationErrorBody)),
    tags((name = "auth", description = "User registration"))
)]
struct AuthDocs;

/// The document a process of the given kind serves.
pub fn document(kind: ServiceKind) -> utoipa::openapi::OpenApi {
    match kind {
        ServiceKind::Category => CategoryDocs::openapi(),
        ServiceKind::Supplier => SupplierDocs::openapi(),
        ServiceKind::Part => PartDocs::openapi(),
        ServiceKind::Inventory => InventoryDocs::openapi(),
        ServiceKind::Gateway => GatewayDocs::openapi(),
        ServiceKind::Auth => AuthDocs::openapi(),
    }
}
