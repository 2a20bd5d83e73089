use std::sync::Arc;

use sparetrack_core::{Record, SupplierId};
use sparetrack_infra::{StoreError, SupplierLookup};
use sparetrack_peers::PartUsage;
use sparetrack_suppliers::{Supplier, SupplierFields, SupplierInput};

use super::still_referenced;
use crate::app::errors::ServiceError;

const ENTITY: &str = "Supplier";

pub struct SupplierService {
    table: Arc<dyn SupplierLookup>,
    parts: Arc<dyn PartUsage>,
}

impl SupplierService {
    pub fn new(table: Arc<dyn SupplierLookup>, parts: Arc<dyn PartUsage>) -> Self {
        Self { table, parts }
    }

    /// Every clashing contact field is reported in one response.
    async fn ensure_unique(
        &self,
        fields: &SupplierFields,
        except: Option<SupplierId>,
    ) -> Result<(), ServiceError> {
        let conflicts = self
            .table
            .conflicts(&fields.phone, &fields.email, except)
            .await?;
        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(
                conflicts.iter().map(|c| c.message().to_string()).collect(),
            ))
        }
    }

    /// A unique constraint can still fire when a concurrent write wins the
    /// race after `ensure_unique`; report it with the same field messages.
    async fn write_conflict(
        &self,
        err: StoreError,
        phone: &str,
        email: &str,
        except: Option<SupplierId>,
    ) -> ServiceError {
        if let StoreError::Conflict { .. } = err {
            if let Ok(conflicts) = self.table.conflicts(phone, email, except).await {
                if !conflicts.is_empty() {
                    return ServiceError::Validation(
                        conflicts.iter().map(|c| c.message().to_string()).collect(),
                    );
                }
            }
        }
        ServiceError::Store(err)
    }

    pub async fn create(&self, input: SupplierInput) -> Result<Supplier, ServiceError> {
        let fields = input.validate()?;
        self.ensure_unique(&fields, None).await?;

        let (phone, email) = (fields.phone.clone(), fields.email.clone());
        match self.table.insert(fields).await {
            Ok(supplier) => Ok(supplier),
            Err(e) => Err(self.write_conflict(e, &phone, &email, None).await),
        }
    }

    pub async fn get(&self, id: SupplierId) -> Result<Supplier, ServiceError> {
        self.table
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, ServiceError> {
        Ok(self.table.list().await?)
    }

    pub async fn update(
        &self,
        id: SupplierId,
        input: SupplierInput,
    ) -> Result<Supplier, ServiceError> {
        let fields = input.validate()?;
        self.get(id).await?;
        self.ensure_unique(&fields, Some(id)).await?;

        let (phone, email) = (fields.phone.clone(), fields.email.clone());
        match self.table.replace(Supplier::assemble(id, fields)).await {
            Ok(replaced) => replaced.ok_or_else(|| ServiceError::not_found(ENTITY, id)),
            Err(e) => Err(self.write_conflict(e, &phone, &email, Some(id)).await),
        }
    }

    /// Rejected while any part still points at the supplier.
    pub async fn delete(&self, id: SupplierId) -> Result<(), ServiceError> {
        self.get(id).await?;
        still_referenced(ENTITY, id.get(), self.parts.references_supplier(id).await)?;

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
    use async_trait::async_trait;
    use sparetrack_infra::{InMemoryTable, Table};
    use sparetrack_suppliers::Conflict;
    use sparetrack_peers::local::LocalPartUsage;
    use sparetrack_peers::PeerError;
    use sparetrack_suppliers::{EMAIL_TAKEN, PHONE_INVALID, PHONE_TAKEN};

    fn service() -> (SupplierService, Arc<LocalPartUsage>) {
        let usage = LocalPartUsage::new();
        let service =
            SupplierService::new(Arc::new(InMemoryTable::<Supplier>::new()), usage.clone());
        (service, usage)
    }

    fn input(phone: &str, email: &str) -> SupplierInput {
        SupplierInput {
            name: Some("Acme".to_string()),
            contact_person: None,
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
            address: None,
        }
    }

    /// Lets another writer insert `rival` between the uniqueness check and
    /// the insert, then fails the insert like a unique index would.
    struct RacedTable {
        inner: InMemoryTable<Supplier>,
        rival: SupplierFields,
    }

    #[async_trait]
    impl Table<Supplier> for RacedTable {
        async fn insert(&self, _fields: SupplierFields) -> Result<Supplier, StoreError> {
            self.inner.insert(self.rival.clone()).await?;
            Err(StoreError::Conflict {
                operation: "insert",
                message: "duplicate key value violates unique constraint".to_string(),
            })
        }

        async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, StoreError> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Supplier>, StoreError> {
            self.inner.list().await
        }

        async fn replace(&self, record: Supplier) -> Result<Option<Supplier>, StoreError> {
            self.inner.replace(record).await
        }

        async fn remove(&self, id: SupplierId) -> Result<bool, StoreError> {
            self.inner.remove(id).await
        }
    }

    #[async_trait]
    impl SupplierLookup for RacedTable {
        async fn conflicts(
            &self,
            phone: &str,
            email: &str,
            except: Option<SupplierId>,
        ) -> Result<Vec<Conflict>, StoreError> {
            self.inner.conflicts(phone, email, except).await
        }
    }

    #[tokio::test]
    async fn lost_insert_race_reports_the_taken_field() {
        let rival = input("+79991234567", "rival@b.com").validate().unwrap();
        let table = RacedTable {
            inner: InMemoryTable::new(),
            rival,
        };
        let service = SupplierService::new(Arc::new(table), LocalPartUsage::new());

        let err = service
            .create(input("+79991234567", "mine@b.com"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(messages) => assert_eq!(messages, vec![PHONE_TAKEN]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_phone_is_reported() {
        let (service, _) = service();
        service.create(input("+79991234567", "a@b.com")).await.unwrap();

        let err = service
            .create(input("+79991234567", "other@b.com"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(messages) => assert_eq!(messages, vec![PHONE_TAKEN]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn both_conflicts_are_reported_together() {
        let (service, _) = service();
        service.create(input("+79991234567", "a@b.com")).await.unwrap();

        let err = service
            .create(input("+79991234567", "a@b.com"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(messages) => {
                assert_eq!(messages, vec![PHONE_TAKEN, EMAIL_TAKEN])
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn format_errors_come_before_uniqueness() {
        let (service, _) = service();
        let err = service.create(input("123", "a@b.com")).await.unwrap_err();
        match err {
            ServiceError::Validation(messages) => assert_eq!(messages, vec![PHONE_INVALID]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeping_own_contacts_is_allowed() {
        let (service, _) = service();
        let acme = service.create(input("+79991234567", "a@b.com")).await.unwrap();
        let other = service.create(input("+79990000000", "z@b.com")).await.unwrap();

        let mut renamed = input("+79991234567", "a@b.com");
        renamed.name = Some("Acme Ltd".to_string());
        let updated = service.update(acme.id, renamed).await.unwrap();
        assert_eq!(updated.name, "Acme Ltd");

        let stolen = service
            .update(other.id, input("+79991234567", "z@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(stolen, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn unreachable_part_service_keeps_the_supplier() {
        let (service, usage) = service();
        let acme = service.create(input("+79991234567", "a@b.com")).await.unwrap();
        usage.fail_with(PeerError::upstream("part-service", "timeout"));

        let err = service.delete(acme.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert_eq!(service.list().await.unwrap(), vec![acme]);
    }

    #[tokio::test]
    async fn referenced_supplier_cannot_be_deleted() {
        let (service, usage) = service();
        let acme = service.create(input("+79991234567", "a@b.com")).await.unwrap();
        usage.reference_supplier(acme.id);
        assert!(matches!(
            service.delete(acme.id).await,
            Err(ServiceError::StillReferenced { .. })
        ));
    }
}
