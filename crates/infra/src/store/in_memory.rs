use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sparetrack_core::{CategoryId, Record, SupplierId};
use sparetrack_parts::Part;
use sparetrack_suppliers::{Conflict, Supplier};

use super::{PartLookup, StoreError, SupplierLookup, Table};

struct Rows<R> {
    next_id: i64,
    rows: BTreeMap<i64, R>,
}

/// In-memory table for tests/dev. Ids start at 1 and are never reused.
pub struct InMemoryTable<R> {
    inner: RwLock<Rows<R>>,
}

impl<R> InMemoryTable<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Rows<R>) -> T) -> Result<T, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&rows))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Rows<R>) -> T) -> Result<T, StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut rows))
    }
}

impl<R> Default for InMemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Table<R> for InMemoryTable<R> {
    async fn insert(&self, fields: R::Fields) -> Result<R, StoreError> {
        self.write(|t| {
            let id = t.next_id;
            t.next_id += 1;
            let record = R::assemble(R::Id::from(id), fields);
            t.rows.insert(id, record.clone());
            record
        })
    }

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let key: i64 = id.into();
        self.read(|t| t.rows.get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        self.read(|t| t.rows.values().cloned().collect())
    }

    async fn replace(&self, record: R) -> Result<Option<R>, StoreError> {
        let key: i64 = record.id().into();
        self.write(|t| {
            let slot = t.rows.get_mut(&key)?;
            *slot = record.clone();
            Some(record)
        })
    }

    async fn remove(&self, id: R::Id) -> Result<bool, StoreError> {
        let key: i64 = id.into();
        self.write(|t| t.rows.remove(&key).is_some())
    }
}

#[async_trait]
impl PartLookup for InMemoryTable<Part> {
    async fn any_with_category(&self, id: CategoryId) -> Result<bool, StoreError> {
        self.read(|t| t.rows.values().any(|p| p.references_category(id)))
    }

    async fn any_with_supplier(&self, id: SupplierId) -> Result<bool, StoreError> {
        self.read(|t| t.rows.values().any(|p| p.references_supplier(id)))
    }
}

#[async_trait]
impl SupplierLookup for InMemoryTable<Supplier> {
    async fn conflicts(
        &self,
        phone: &str,
        email: &str,
        except: Option<SupplierId>,
    ) -> Result<Vec<Conflict>, StoreError> {
        self.read(|t| {
            let others: Vec<&Supplier> = t
                .rows
                .values()
                .filter(|s| Some(s.id) != except)
                .collect();

            let mut conflicts = Vec::new();
            if others.iter().any(|s| s.phone == phone) {
                conflicts.push(Conflict::Phone);
            }
            if others.iter().any(|s| s.email == email) {
                conflicts.push(Conflict::Email);
            }
            conflicts
        })
    }
}
