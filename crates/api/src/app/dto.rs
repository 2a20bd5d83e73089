//! Wire shapes (camelCase JSON) and the conversions to and from domain types.
//!
//! Requests carry only client-writable fields, all optional so that missing
//! values reach the field rules instead of failing deserialization.
//! Responses for parts and inventory embed the resources fetched from the
//! owning services (`null` when the lookup failed).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sparetrack_auth::Registration;
use sparetrack_categories::{Category, CategoryInput};
use sparetrack_core::{CategoryId, PartId, SupplierId};
use sparetrack_inventory::{InventoryInput, RestockInput};
use sparetrack_parts::PartInput;
use sparetrack_peers::{CategoryView, PartView, SupplierView};
use sparetrack_suppliers::{Supplier, SupplierInput};

use crate::app::services::inventory::EnrichedItem;
use crate::app::services::parts::EnrichedPart;

// --- categories -------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(r: CategoryRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id.get(),
            name: c.name,
            description: c.description,
        }
    }
}

impl From<CategoryView> for CategoryDto {
    fn from(c: CategoryView) -> Self {
        Self {
            id: c.id.get(),
            name: c.name,
            description: c.description,
        }
    }
}

// --- suppliers --------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<SupplierRequest> for SupplierInput {
    fn from(r: SupplierRequest) -> Self {
        Self {
            name: r.name,
            contact_person: r.contact_person,
            phone: r.phone,
            email: r.email,
            address: r.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDto {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id.get(),
            name: s.name,
            contact_person: s.contact_person,
            phone: s.phone,
            email: s.email,
            address: s.address,
        }
    }
}

impl From<SupplierView> for SupplierDto {
    fn from(s: SupplierView) -> Self {
        Self {
            id: s.id.get(),
            name: s.name,
            contact_person: s.contact_person,
            phone: s.phone,
            email: s.email,
            address: s.address,
        }
    }
}

// --- parts ------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub unit_price: Option<f64>,
}

impl From<PartRequest> for PartInput {
    fn from(r: PartRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            category_id: r.category_id.map(CategoryId::new),
            supplier_id: r.supplier_id.map(SupplierId::new),
            unit_price: r.unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub supplier_id: i64,
    pub category: Option<CategoryDto>,
    pub supplier: Option<SupplierDto>,
    pub unit_price: f64,
}

impl From<EnrichedPart> for PartDto {
    fn from(e: EnrichedPart) -> Self {
        let EnrichedPart {
            part,
            category,
            supplier,
        } = e;
        Self {
            id: part.id.get(),
            name: part.name,
            description: part.description,
            category_id: part.category_id.get(),
            supplier_id: part.supplier_id.get(),
            category: category.map(CategoryDto::from),
            supplier: supplier.map(SupplierDto::from),
            unit_price: part.unit_price,
        }
    }
}

impl From<PartView> for PartDto {
    fn from(p: PartView) -> Self {
        Self {
            id: p.id.get(),
            name: p.name,
            description: p.description,
            category_id: p.category_id.get(),
            supplier_id: p.supplier_id.get(),
            category: p.category.map(CategoryDto::from),
            supplier: p.supplier.map(SupplierDto::from),
            unit_price: p.unit_price,
        }
    }
}

// --- inventory --------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub part_id: Option<i64>,
    pub quantity_in_stock: Option<i64>,
}

impl From<InventoryRequest> for InventoryInput {
    fn from(r: InventoryRequest) -> Self {
        Self {
            part_id: r.part_id.map(PartId::new),
            quantity_in_stock: r.quantity_in_stock,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdateRequest {
    pub quantity_in_stock: Option<i64>,
}

impl From<InventoryUpdateRequest> for RestockInput {
    fn from(r: InventoryUpdateRequest) -> Self {
        Self {
            quantity_in_stock: r.quantity_in_stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDto {
    pub inventory_id: i64,
    pub part_id: i64,
    pub part: Option<PartDto>,
    pub quantity_in_stock: i64,
    /// `yyyy-MM-dd`
    pub last_restock_date: NaiveDate,
}

impl From<EnrichedItem> for InventoryDto {
    fn from(e: EnrichedItem) -> Self {
        Self {
            inventory_id: e.item.id.get(),
            part_id: e.item.part_id.get(),
            part: e.part.map(PartDto::from),
            quantity_in_stock: e.item.quantity_in_stock,
            last_restock_date: e.item.last_restock_date,
        }
    }
}

// --- auth -------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
        }
    }
}

// --- errors -----------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    pub error: String,
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sparetrack_parts::Part;

    #[test]
    fn part_request_reads_camel_case() {
        let request: PartRequest = serde_json::from_value(json!({
            "name": "Pad",
            "categoryId": 1,
            "supplierId": 2,
            "unitPrice": 9.5
        }))
        .unwrap();
        let input = PartInput::from(request);
        assert_eq!(input.category_id, Some(CategoryId::new(1)));
        assert_eq!(input.supplier_id, Some(SupplierId::new(2)));
        assert_eq!(input.description, None);
    }

    #[test]
    fn failed_enrichment_serialises_as_null() {
        let dto = PartDto::from(EnrichedPart {
            part: Part {
                id: PartId::new(3),
                name: "Pad".to_string(),
                description: None,
                category_id: CategoryId::new(1),
                supplier_id: SupplierId::new(2),
                unit_price: 9.5,
            },
            category: Some(CategoryView {
                id: CategoryId::new(1),
                name: "Brakes".to_string(),
                description: None,
            }),
            supplier: None,
        });

        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(value["category"]["name"], "Brakes");
        assert!(value["supplier"].is_null());
        assert_eq!(value["categoryId"], 1);
        assert_eq!(value["unitPrice"], 9.5);
    }

    #[test]
    fn inventory_date_is_plain_iso_date() {
        let dto = InventoryDto {
            inventory_id: 1,
            part_id: 3,
            part: None,
            quantity_in_stock: 10,
            last_restock_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        };
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(value["lastRestockDate"], "2024-05-17");
        assert_eq!(value["inventoryId"], 1);
    }
}
