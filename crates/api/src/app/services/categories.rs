use std::sync::Arc;

use sparetrack_categories::{Category, CategoryInput};
use sparetrack_core::CategoryId;
use sparetrack_infra::Table;
use sparetrack_peers::PartUsage;

use super::still_referenced;
use crate::app::errors::ServiceError;

const ENTITY: &str = "Category";

pub struct CategoryService {
    table: Arc<dyn Table<Category>>,
    parts: Arc<dyn PartUsage>,
}

impl CategoryService {
    pub fn new(table: Arc<dyn Table<Category>>, parts: Arc<dyn PartUsage>) -> Self {
        Self { table, parts }
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, ServiceError> {
        let fields = input.validate()?;
        Ok(self.table.insert(fields).await?)
    }

    pub async fn get(&self, id: CategoryId) -> Result<Category, ServiceError> {
        self.table
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.table.list().await?)
    }

    pub async fn update(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> Result<Category, ServiceError> {
        let fields = input.validate()?;
        let mut category = self.get(id).await?;
        category.overwrite(fields);
        self.table
            .replace(category)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Rejected while any part still points at the category.
    pub async fn delete(&self, id: CategoryId) -> Result<(), ServiceError> {
        self.get(id).await?;
        still_referenced(ENTITY, id.get(), self.parts.references_category(id).await)?;

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
    use sparetrack_infra::InMemoryTable;
    use sparetrack_peers::local::LocalPartUsage;
    use sparetrack_peers::PeerError;

    fn service() -> (CategoryService, Arc<LocalPartUsage>) {
        let usage = LocalPartUsage::new();
        let service = CategoryService::new(Arc::new(InMemoryTable::<Category>::new()), usage.clone());
        (service, usage)
    }

    fn input(name: &str) -> CategoryInput {
        CategoryInput {
            name: Some(name.to_string()),
            description: Some("desc".to_string()),
        }
    }

    #[tokio::test]
    async fn created_category_reads_back_equal() {
        let (service, _) = service();
        let created = service.create(input("Filters")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Filters");
        assert_eq!(fetched.description.as_deref(), Some("desc"));
    }

    #[tokio::test]
    async fn update_of_missing_category_is_not_found_after_validation() {
        let (service, _) = service();
        let invalid = service
            .update(CategoryId::new(9), CategoryInput::default())
            .await
            .unwrap_err();
        assert!(matches!(invalid, ServiceError::Validation(_)));

        let missing = service
            .update(CategoryId::new(9), input("X"))
            .await
            .unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound { id: 9, .. }));
    }

    #[tokio::test]
    async fn referenced_category_survives_delete() {
        let (service, usage) = service();
        let created = service.create(input("Brakes")).await.unwrap();
        usage.reference_category(created.id);

        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::StillReferenced { .. }));
        assert!(service.get(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_part_service_keeps_the_category() {
        let (service, usage) = service();
        let created = service.create(input("Lamps")).await.unwrap();
        usage.fail_with(PeerError::upstream("part-service", "connection refused"));

        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unreferenced_category_is_deleted() {
        let (service, _) = service();
        let created = service.create(input("Belts")).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
