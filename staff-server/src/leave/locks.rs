//! Per-employee serialization of count-then-insert sequences

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async mutex table keyed by employee id.
///
/// Operations on several employees must go through [`EmployeeLocks::lock_many`],
/// which acquires in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, employee_id: i64) -> Arc<Mutex<()>> {
        self.inner
            .entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn lock(&self, employee_id: i64) -> OwnedMutexGuard<()> {
        self.slot(employee_id).lock_owned().await
    }

    pub async fn lock_many(&self, employee_ids: &[i64]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = employee_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.lock(id).await);
        }
        guards
    }

    /// Drop the slot of a deleted employee
    pub fn forget(&self, employee_id: i64) {
        self.inner.remove(&employee_id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}
