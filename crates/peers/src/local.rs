//! In-process doubles for the lookup seams.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use sparetrack_core::{CategoryId, SupplierId};

use crate::directory::Directory;
use crate::error::PeerError;
use crate::usage::PartUsage;

/// Map-backed directory. `fail_with` turns every lookup into that error.
pub struct LocalDirectory<I, V> {
    resource: &'static str,
    records: RwLock<HashMap<i64, V>>,
    failure: RwLock<Option<PeerError>>,
    _marker: std::marker::PhantomData<fn(I)>,
}

impl<I, V> LocalDirectory<I, V> {
    pub fn new(resource: &'static str) -> Arc<Self> {
        Arc::new(Self {
            resource,
            records: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            _marker: std::marker::PhantomData,
        })
    }

    pub fn put(&self, id: impl Into<i64>, view: V) {
        if let Ok(mut records) = self.records.write() {
            records.insert(id.into(), view);
        }
    }

    pub fn fail_with(&self, error: PeerError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(error);
        }
    }
}

#[async_trait]
impl<I, V> Directory<I, V> for LocalDirectory<I, V>
where
    I: Copy + Into<i64> + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, id: I) -> Result<V, PeerError> {
        if let Some(e) = self.failure.read().ok().and_then(|f| f.clone()) {
            return Err(e);
        }
        let id: i64 = id.into();
        self.records
            .read()
            .ok()
            .and_then(|r| r.get(&id).cloned())
            .ok_or(PeerError::NotFound {
                resource: self.resource,
                id,
            })
    }
}

/// Set-backed part usage. `fail_with` turns every query into that error.
#[derive(Default)]
pub struct LocalPartUsage {
    categories: RwLock<HashSet<CategoryId>>,
    suppliers: RwLock<HashSet<SupplierId>>,
    failure: RwLock<Option<PeerError>>,
}

impl LocalPartUsage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reference_category(&self, id: CategoryId) {
        if let Ok(mut set) = self.categories.write() {
            set.insert(id);
        }
    }

    pub fn reference_supplier(&self, id: SupplierId) {
        if let Ok(mut set) = self.suppliers.write() {
            set.insert(id);
        }
    }

    pub fn fail_with(&self, error: PeerError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(error);
        }
    }

    fn failure(&self) -> Result<(), PeerError> {
        match self.failure.read().ok().and_then(|f| f.clone()) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PartUsage for LocalPartUsage {
    async fn references_category(&self, id: CategoryId) -> Result<bool, PeerError> {
        self.failure()?;
        Ok(self.categories.read().map(|s| s.contains(&id)).unwrap_or(false))
    }

    async fn references_supplier(&self, id: SupplierId) -> Result<bool, PeerError> {
        self.failure()?;
        Ok(self.suppliers.read().map(|s| s.contains(&id)).unwrap_or(false))
    }
}
