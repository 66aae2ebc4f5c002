use crate::errors::{AppError, AppResult};
use crate::models::Record;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Readers take an `Arc` snapshot, so a `load` or `update_flag` is never observed halfway.
/// Every `load` starts a new generation; writes tagged with an older one are dropped.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Arc<Vec<Record>>>,
    generation: AtomicU64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, records: Vec<Record>) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(AppError::Internal(format!("duplicate record id {} in snapshot", record.id)));
            }
        }

        let count = records.len();
        let mut guard = self.write()?;
        *guard = Arc::new(records);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        drop(guard);
        tracing::info!(count, generation, "record store loaded");
        Ok(())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn get(&self) -> AppResult<Arc<Vec<Record>>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn flag(&self, id: &str) -> AppResult<bool> {
        self.read()?
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.credentialed)
            .ok_or_else(|| stale_id(id))
    }

    pub fn update_flag(&self, id: &str, value: bool) -> AppResult<bool> {
        let mut guard = self.write()?;
        set_flag(&mut *guard, id, value)
    }

    pub fn toggle_flag(&self, id: &str) -> AppResult<(bool, u64)> {
        let mut guard = self.write()?;
        let current = guard
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.credentialed)
            .ok_or_else(|| stale_id(id))?;
        let previous = set_flag(&mut *guard, id, !current)?;
        Ok((previous, self.generation()))
    }

    pub fn restore_flag(&self, id: &str, value: bool, generation: u64) -> AppResult<bool> {
        let mut guard = self.write()?;
        let current = self.generation();
        if current != generation {
            tracing::info!(
                record_id = %id,
                generation,
                current,
                "store reloaded since the write, skipping restore"
            );
            return Ok(false);
        }
        set_flag(&mut *guard, id, value)?;
        Ok(true)
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Arc<Vec<Record>>>> {
        self.records
            .read()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Arc<Vec<Record>>>> {
        self.records
            .write()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }
}

fn set_flag(records: &mut Arc<Vec<Record>>, id: &str, value: bool) -> AppResult<bool> {
    let index = records
        .iter()
        .position(|record| record.id == id)
        .ok_or_else(|| stale_id(id))?;
    let records = Arc::make_mut(records);
    let previous = records[index].credentialed;
    records[index].credentialed = value;
    Ok(previous)
}

fn stale_id(id: &str) -> AppError {
    tracing::warn!(record_id = %id, "record id not present in store");
    AppError::NotFound(format!("Record {} not found", id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::RecordStore;
    use crate::models::{PaymentStatus, Record};

    pub(crate) fn record(id: &str, name: &str, status: PaymentStatus, credentialed: bool) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            badge_name: name.to_uppercase(),
            email: format!("{}@example.com", name.to_lowercase()),
            payment_status: status,
            credentialed,
        }
    }

    #[test]
    fn load_replaces_whole_snapshot() {
        let store = RecordStore::new();
        store
            .load(vec![record("1", "Ana", PaymentStatus::Completed, false)])
            .expect("first load");
        let before = store.get().expect("snapshot");

        store
            .load(vec![
                record("2", "Bea", PaymentStatus::Pending, false),
                record("3", "Caio", PaymentStatus::Free, true),
            ])
            .expect("second load");

        assert_eq!(before.len(), 1);
        assert_eq!(store.len().expect("len"), 2);
        assert!(store.flag("1").is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = RecordStore::new();
        store
            .load(vec![record("1", "Ana", PaymentStatus::Completed, false)])
            .expect("load");
        let result = store.load(vec![
            record("2", "Bea", PaymentStatus::Pending, false),
            record("2", "Bia", PaymentStatus::Pending, false),
        ]);
        assert!(result.is_err());
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn update_flag_touches_only_the_matching_record() {
        let store = RecordStore::new();
        store
            .load(vec![
                record("1", "Ana", PaymentStatus::Completed, false),
                record("2", "Bea", PaymentStatus::Pending, false),
            ])
            .expect("load");
        let snapshot = store.get().expect("snapshot");

        let previous = store.update_flag("2", true).expect("update");
        assert!(!previous);
        assert!(!store.flag("1").expect("flag 1"));
        assert!(store.flag("2").expect("flag 2"));
        assert!(!snapshot[1].credentialed, "earlier snapshots are unaffected");
    }

    #[test]
    fn toggle_flag_flips_and_reports_generation() {
        let store = RecordStore::new();
        store
            .load(vec![record("1", "Ana", PaymentStatus::Completed, false)])
            .expect("load");

        let (previous, generation) = store.toggle_flag("1").expect("toggle");
        assert!(!previous);
        assert_eq!(generation, 1);
        assert!(store.flag("1").expect("flag"));

        let (previous, _) = store.toggle_flag("1").expect("toggle back");
        assert!(previous);
        assert!(!store.flag("1").expect("flag"));
    }

    #[test]
    fn restore_is_skipped_after_reload() {
        let store = RecordStore::new();
        store
            .load(vec![record("1", "Ana", PaymentStatus::Completed, false)])
            .expect("load");
        let (previous, generation) = store.toggle_flag("1").expect("toggle");

        store
            .load(vec![record("1", "Ana", PaymentStatus::Completed, true)])
            .expect("reload");
        assert_eq!(store.generation(), generation + 1);

        assert!(!store.restore_flag("1", previous, generation).expect("restore"));
        assert!(store.flag("1").expect("flag"), "reloaded value is kept");

        let (previous, generation) = store.toggle_flag("1").expect("toggle again");
        assert!(store.restore_flag("1", previous, generation).expect("restore"));
        assert!(store.flag("1").expect("flag"));
    }

    #[test]
    fn stale_id_is_a_caller_error() {
        let store = RecordStore::new();
        let err = store.update_flag("missing", true).expect_err("stale id");
        assert!(err.to_string().starts_with("NOT_FOUND:"));
    }
}
