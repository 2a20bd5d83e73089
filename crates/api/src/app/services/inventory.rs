use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use sparetrack_core::InventoryId;
use sparetrack_infra::Table;
use sparetrack_inventory::{InventoryInput, InventoryItem, RestockInput};
use sparetrack_peers::{PartDirectory, PartView};

use super::{degrade, require_reference};
use crate::app::errors::ServiceError;

const ENTITY: &str = "Inventory";

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub item: InventoryItem,
    pub part: Option<PartView>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct InventoryService {
    table: Arc<dyn Table<InventoryItem>>,
    parts: Arc<PartDirectory>,
}

impl InventoryService {
    pub fn new(table: Arc<dyn Table<InventoryItem>>, parts: Arc<PartDirectory>) -> Self {
        Self { table, parts }
    }

    async fn enrich(&self, item: InventoryItem) -> EnrichedItem {
        let part = degrade("part", item.part_id.get(), self.parts.get(item.part_id).await);
        EnrichedItem { item, part }
    }

    async fn find(&self, id: InventoryId) -> Result<InventoryItem, ServiceError> {
        self.table
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn create(&self, input: InventoryInput) -> Result<EnrichedItem, ServiceError> {
        let fields = input.validate(today())?;
        require_reference(self.parts.as_ref(), "Part", fields.part_id).await?;
        let item = self.table.insert(fields).await?;
        Ok(self.enrich(item).await)
    }

    pub async fn get(&self, id: InventoryId) -> Result<EnrichedItem, ServiceError> {
        let item = self.find(id).await?;
        Ok(self.enrich(item).await)
    }

    pub async fn list(&self) -> Result<Vec<EnrichedItem>, ServiceError> {
        let items = self.table.list().await?;
        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            enriched.push(self.enrich(item).await);
        }
        Ok(enriched)
    }

    /// Replace the quantity; the part reference never changes.
    pub async fn update(
        &self,
        id: InventoryId,
        input: RestockInput,
    ) -> Result<EnrichedItem, ServiceError> {
        let quantity = input.validate()?;
        let mut item = self.find(id).await?;
        item.restock(quantity, today());

        let item = self
            .table
            .replace(item)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        Ok(self.enrich(item).await)
    }

    pub async fn delete(&self, id: InventoryId) -> Result<(), ServiceError> {
        if self.table.remove(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(ENTITY, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparetrack_core::{CategoryId, PartId, SupplierId};
    use sparetrack_infra::InMemoryTable;
    use sparetrack_inventory::QUANTITY_NEGATIVE;
    use sparetrack_peers::local::LocalDirectory;

    fn service() -> InventoryService {
        let parts = LocalDirectory::new("Part");
        parts.put(
            PartId::new(4),
            PartView {
                id: PartId::new(4),
                name: "Pad".to_string(),
                description: None,
                category_id: CategoryId::new(1),
                supplier_id: SupplierId::new(1),
                category: None,
                supplier: None,
                unit_price: 3.0,
            },
        );
        InventoryService::new(Arc::new(InMemoryTable::<InventoryItem>::new()), parts)
    }

    fn create(part: i64, quantity: i64) -> InventoryInput {
        InventoryInput {
            part_id: Some(PartId::new(part)),
            quantity_in_stock: Some(quantity),
        }
    }

    #[tokio::test]
    async fn create_stamps_today_and_embeds_part() {
        let service = service();
        let created = service.create(create(4, 10)).await.unwrap();
        assert_eq!(created.item.last_restock_date, today());
        assert_eq!(created.part.unwrap().name, "Pad");
    }

    #[tokio::test]
    async fn unknown_part_is_rejected() {
        let err = service().create(create(8, 10)).await.unwrap_err();
        assert_eq!(err.to_string(), "Part with id 8 not found");
    }

    #[tokio::test]
    async fn negative_update_leaves_stock_unchanged() {
        let service = service();
        let created = service.create(create(4, 10)).await.unwrap();

        let err = service
            .update(
                created.item.id,
                RestockInput {
                    quantity_in_stock: Some(-1),
                },
            )
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(messages) => assert_eq!(messages, vec![QUANTITY_NEGATIVE]),
            other => panic!("unexpected {other:?}"),
        }

        let stored = service.get(created.item.id).await.unwrap();
        assert_eq!(stored.item.quantity_in_stock, 10);
    }

    #[tokio::test]
    async fn update_to_zero_is_allowed() {
        let service = service();
        let created = service.create(create(4, 10)).await.unwrap();
        let updated = service
            .update(
                created.item.id,
                RestockInput {
                    quantity_in_stock: Some(0),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item.quantity_in_stock, 0);
        assert_eq!(updated.item.part_id, PartId::new(4));
    }
}
