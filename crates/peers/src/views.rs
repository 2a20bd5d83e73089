//! Read models of peer resources, as the owning services serialise them.

use serde::{Deserialize, Serialize};

use sparetrack_core::{CategoryId, PartId, SupplierId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierView {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// A part as the part service answers it, embedded views included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartView {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub supplier_id: SupplierId,
    #[serde(default)]
    pub category: Option<CategoryView>,
    #[serde(default)]
    pub supplier: Option<SupplierView>,
    pub unit_price: f64,
}
