use std::sync::Arc;

use sparetrack_core::{CategoryId, PartId, Record, SupplierId};
use sparetrack_infra::PartLookup;
use sparetrack_parts::{Part, PartFields, PartInput};
use sparetrack_peers::{CategoryDirectory, CategoryView, SupplierDirectory, SupplierView};

use super::{degrade, require_reference};
use crate::app::errors::ServiceError;

const ENTITY: &str = "Part";

/// A part with its category and supplier resolved (`None` when the lookup failed).
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPart {
    pub part: Part,
    pub category: Option<CategoryView>,
    pub supplier: Option<SupplierView>,
}

pub struct PartService {
    table: Arc<dyn PartLookup>,
    categories: Arc<CategoryDirectory>,
    suppliers: Arc<SupplierDirectory>,
}

impl PartService {
    pub fn new(
        table: Arc<dyn PartLookup>,
        categories: Arc<CategoryDirectory>,
        suppliers: Arc<SupplierDirectory>,
    ) -> Self {
        Self {
            table,
            categories,
            suppliers,
        }
    }

    async fn check_references(&self, fields: &PartFields) -> Result<(), ServiceError> {
        require_reference(self.categories.as_ref(), "Category", fields.category_id).await?;
        require_reference(self.suppliers.as_ref(), "Supplier", fields.supplier_id).await
    }

    /// One lookup per reference, issued concurrently.
    async fn enrich(&self, part: Part) -> EnrichedPart {
        let (category, supplier) = tokio::join!(
            self.categories.get(part.category_id),
            self.suppliers.get(part.supplier_id)
        );
        EnrichedPart {
            category: degrade("category", part.category_id.get(), category),
            supplier: degrade("supplier", part.supplier_id.get(), supplier),
            part,
        }
    }

    async fn find(&self, id: PartId) -> Result<Part, ServiceError> {
        self.table
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn create(&self, input: PartInput) -> Result<EnrichedPart, ServiceError> {
        let fields = input.validate()?;
        self.check_references(&fields).await?;
        let part = self.table.insert(fields).await?;
        Ok(self.enrich(part).await)
    }

    pub async fn get(&self, id: PartId) -> Result<EnrichedPart, ServiceError> {
        let part = self.find(id).await?;
        Ok(self.enrich(part).await)
    }

    /// Records are enriched one after another; a failed lookup only blanks
    /// that record's sub-resource.
    pub async fn list(&self) -> Result<Vec<EnrichedPart>, ServiceError> {
        let parts = self.table.list().await?;
        let mut enriched = Vec::with_capacity(parts.len());
        for part in parts {
            enriched.push(self.enrich(part).await);
        }
        Ok(enriched)
    }

    pub async fn update(&self, id: PartId, input: PartInput) -> Result<EnrichedPart, ServiceError> {
        let fields = input.validate()?;
        self.find(id).await?;
        self.check_references(&fields).await?;

        let part = self
            .table
            .replace(Part::assemble(id, fields))
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        Ok(self.enrich(part).await)
    }

    pub async fn delete(&self, id: PartId) -> Result<(), ServiceError> {
        if self.table.remove(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(ENTITY, id))
        }
    }

    pub async fn exists_by_category(&self, id: CategoryId) -> Result<bool, ServiceError> {
        Ok(self.table.any_with_category(id).await?)
    }

    pub async fn exists_by_supplier(&self, id: SupplierId) -> Result<bool, ServiceError> {
        Ok(self.table.any_with_supplier(id).await?)
    }
}
