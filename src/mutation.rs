use crate::api::AdminApi;
use crate::errors::{AppError, AppResult};
use crate::models::ToggleOutcome;
use crate::notify::{Notifier, TOGGLE_FAILURE_MESSAGE, TOGGLE_SUCCESS_MESSAGE};
use crate::store::RecordStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    pending: Arc<StdMutex<HashSet<String>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, record_id: &str) -> AppResult<PendingGuard> {
        if !self.lock().insert(record_id.to_string()) {
            return Err(AppError::InFlight(format!(
                "Credential toggle for record {} is already in progress",
                record_id
            )));
        }
        Ok(PendingGuard {
            registry: self.clone(),
            record_id: record_id.to_string(),
        })
    }

    pub fn is_pending(&self, record_id: &str) -> bool {
        self.lock().contains(record_id)
    }

    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids = self.lock().iter().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    // A panic while holding this lock cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct PendingGuard {
    registry: InFlightRegistry,
    record_id: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.record_id);
    }
}

struct TentativeWrite<'a> {
    store: &'a RecordStore,
    record_id: &'a str,
    previous: bool,
    generation: u64,
    committed: bool,
}

impl<'a> TentativeWrite<'a> {
    fn apply(store: &'a RecordStore, record_id: &'a str) -> AppResult<Self> {
        let (previous, generation) = store.toggle_flag(record_id)?;
        Ok(Self {
            store,
            record_id,
            previous,
            generation,
            committed: false,
        })
    }

    fn tentative(&self) -> bool {
        !self.previous
    }

    fn commit(mut self) -> bool {
        self.committed = true;
        self.tentative()
    }
}

impl Drop for TentativeWrite<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(error) = self
            .store
            .restore_flag(self.record_id, self.previous, self.generation)
        {
            tracing::warn!(record_id = %self.record_id, error = %error, "could not restore credential flag");
        }
    }
}

#[derive(Clone)]
pub struct MutationController {
    store: Arc<RecordStore>,
    api: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlightRegistry,
}

impl MutationController {
    pub fn new(store: Arc<RecordStore>, api: Arc<dyn AdminApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            api,
            notifier,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Remote failures are not errors here: they roll back and report
    /// `ToggleOutcome::RolledBack`. Errors are reserved for stale ids and
    /// toggles already in flight for the same record.
    pub async fn toggle_flag(&self, event_id: &str, record_id: &str) -> AppResult<ToggleOutcome> {
        let _pending = self.in_flight.try_acquire(record_id)?;
        let write = TentativeWrite::apply(&self.store, record_id)?;
        tracing::debug!(event_id, record_id, tentative = write.tentative(), "credential toggle applied locally");

        match self.api.toggle_credential(event_id, record_id).await {
            Ok(()) => {
                let credentialed = write.commit();
                tracing::info!(event_id, record_id, credentialed, "credential toggle confirmed");
                self.notifier.notify_success(TOGGLE_SUCCESS_MESSAGE);
                Ok(ToggleOutcome::Confirmed {
                    record_id: record_id.to_string(),
                    credentialed,
                })
            }
            Err(error) => {
                let previous = write.previous;
                drop(write);
                tracing::error!(event_id, record_id, error = %error, "credential toggle failed, rolled back");
                self.notifier.notify_error(TOGGLE_FAILURE_MESSAGE);
                Ok(ToggleOutcome::RolledBack {
                    record_id: record_id.to_string(),
                    credentialed: previous,
                })
            }
        }
    }
}
