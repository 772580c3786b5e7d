use super::model::PhaseShiftRecord;
use super::repository::PhaseShiftRepository;
use crate::domain::{Displacement, PhaseError, PhaseResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle for loading from several threads.
///
/// The identity scan and the conditional append run under one lock, so two
/// callers racing on the same identity still end up with a single record.
#[derive(Debug, Clone, Default)]
pub struct SharedPhaseShiftRepository {
    inner: Arc<Mutex<PhaseShiftRepository>>,
}

impl SharedPhaseShiftRepository {
    pub fn new(repository: PhaseShiftRepository) -> Self {
        Self {
            inner: Arc::new(Mutex::new(repository)),
        }
    }

    pub fn resolve_or_load(&self, name: &str, displacement: &Displacement) -> PhaseResult<usize> {
        self.lock()?.resolve_or_load(name, displacement)
    }

    pub fn len(&self) -> PhaseResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn record(&self, index: usize) -> PhaseResult<Option<PhaseShiftRecord>> {
        Ok(self.lock()?.record(index).cloned())
    }

    pub fn with_record<T>(
        &self,
        index: usize,
        visit: impl FnOnce(&PhaseShiftRecord) -> T,
    ) -> PhaseResult<Option<T>> {
        Ok(self.lock()?.record(index).map(visit))
    }

    fn lock(&self) -> PhaseResult<MutexGuard<'_, PhaseShiftRepository>> {
        self.inner.lock().map_err(|_| {
            PhaseError::internal(
                "SYS.PHASE_LOCK",
                "phase shift repository lock poisoned by a panicking loader",
            )
        })
    }
}
