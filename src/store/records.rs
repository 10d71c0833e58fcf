//! Generic persisted record collections.
//!
//! # Responsibilities
//! - Own every collection and id counter, keyed by resource key
//! - Serialize mutations per key; let reads share the key
//! - Assign identifiers and enforce business-equality on create
//! - Resolve update/delete addresses to exactly one record
//!
//! # Design Decisions
//! - Each call re-reads the collection, mutates a copy and writes it back whole
//! - The conflict check runs before an identifier is reserved, so a rejected
//!   create never advances the counter
//! - The counter lives under `<key>-id` and is written in the same backend
//!   call as the collection it belongs to

use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::observability::metrics;
use crate::store::backend::{MemoryStore, PreferenceStore};
use crate::store::error::StoreError;
use crate::store::filter::{self, Params};
use crate::store::record::Record;

/// Persisted, ordered record collections with per-key mutual exclusion.
#[derive(Debug)]
pub struct RecordStore {
    backend: Arc<dyn PreferenceStore>,
    locks: DashMap<String, Arc<RwLock<()>>>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn PreferenceStore>) -> Self {
        Self {
            backend,
            locks: DashMap::new(),
        }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// All records stored under `key`, in insertion order.
    pub fn list<R: Record>(&self, key: &str) -> Result<Vec<R>, StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.read();
        tally(key, "list", self.load(key))
    }

    /// Records under `key` matching every entry of `params`.
    pub fn find_matching<R: Record>(&self, key: &str, params: &Params) -> Result<Vec<R>, StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.read();
        let result = self.load(key).map(|records| filter::filter(records, params));
        tally(key, "find", result)
    }

    /// Append a new record built from `draft` and return its identifier.
    pub fn create<R: Record>(&self, key: &str, draft: R::Draft) -> Result<u64, StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.write();
        tally(key, "create", self.insert::<R>(key, draft))
    }

    /// Merge `partial` into the single record selected by `address`.
    pub fn update<R: Record>(
        &self,
        key: &str,
        address: &Params,
        partial: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.write();
        tally(key, "update", self.merge_one::<R>(key, address, partial))
    }

    /// Remove the single record selected by `address`.
    pub fn delete<R: Record>(&self, key: &str, address: &Params) -> Result<(), StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.write();
        tally(key, "delete", self.remove_one::<R>(key, address))
    }

    /// Last identifier handed out for `key` (0 when none yet).
    pub fn id_counter(&self, key: &str) -> Result<u64, StoreError> {
        let lock = self.lock_for(key);
        let _guard = lock.read();
        self.load_counter(key)
    }

    fn insert<R: Record>(&self, key: &str, draft: R::Draft) -> Result<u64, StoreError> {
        let mut records: Vec<R> = self.load(key)?;
        let next_id = self.load_counter(key)? + 1;
        let candidate = R::from_draft(next_id, draft);

        if records.iter().any(|r| r.business_eq(&candidate)) {
            return Err(StoreError::Conflict);
        }

        records.push(candidate);
        self.backend.set_many(vec![
            (key.to_string(), encode(key, &records)?),
            (counter_key(key), next_id.to_string()),
        ])?;

        tracing::info!(key = %key, id = next_id, "Record created");
        Ok(next_id)
    }

    fn merge_one<R: Record>(
        &self,
        key: &str,
        address: &Params,
        partial: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut records: Vec<R> = self.load(key)?;
        let index = locate(&records, address)?;
        records[index].merge(partial)?;

        self.backend.set(key, encode(key, &records)?)?;

        tracing::info!(key = %key, id = records[index].id(), "Record updated");
        Ok(())
    }

    fn remove_one<R: Record>(&self, key: &str, address: &Params) -> Result<(), StoreError> {
        let mut records: Vec<R> = self.load(key)?;
        let index = locate(&records, address)?;
        let removed = records.remove(index);

        self.backend.set(key, encode(key, &records)?)?;

        tracing::info!(key = %key, id = removed.id(), "Record deleted");
        Ok(())
    }

    fn lock_for(&self, key: &str) -> Arc<RwLock<()>> {
        self.locks.entry(key.to_string()).or_default().value().clone()
    }

    fn load<R: Record>(&self, key: &str) -> Result<Vec<R>, StoreError> {
        match self.backend.get(key)? {
            Some(blob) => serde_json::from_str(&blob).map_err(|source| StoreError::Codec {
                key: key.to_string(),
                source,
            }),
            None => {
                tracing::debug!(key = %key, "Initializing empty collection");
                self.backend.set(key, "[]".to_string())?;
                Ok(Vec::new())
            }
        }
    }

    fn load_counter(&self, key: &str) -> Result<u64, StoreError> {
        let counter_key = counter_key(key);
        match self.backend.get(&counter_key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
                key: counter_key,
                source,
            }),
            None => Ok(0),
        }
    }
}

fn locate<R: Record>(records: &[R], address: &Params) -> Result<usize, StoreError> {
    match filter::positions(records, address).as_slice() {
        [index] => Ok(*index),
        [] => Err(StoreError::NotFound),
        many => Err(StoreError::Ambiguous(many.len())),
    }
}

/// Count one store call under its outcome label.
fn tally<T>(key: &str, op: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::record_store_operation(key, op, outcome);
    result
}

fn counter_key(key: &str) -> String {
    format!("{key}-id")
}

fn encode<R: Record>(key: &str, records: &[R]) -> Result<String, StoreError> {
    serde_json::to_string(records).map_err(|source| StoreError::Codec {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Person, PersonDraft};
    use serde_json::json;

    const KEY: &str = "persons";

    fn draft(name: &str, age: i64) -> PersonDraft {
        PersonDraft {
            name: name.to_string(),
            age,
        }
    }

    fn by_id(id: u64) -> Params {
        Params::from([("id".to_string(), id.to_string())])
    }

    fn partial(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_list_initializes_empty_collection() {
        let backend = Arc::new(MemoryStore::new());
        let store = RecordStore::new(backend.clone());

        assert!(store.list::<Person>(KEY).unwrap().is_empty());
        assert_eq!(backend.get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let store = RecordStore::in_memory();
        assert_eq!(store.create::<Person>(KEY, draft("Kyle", 22)).unwrap(), 1);
        assert_eq!(store.create::<Person>(KEY, draft("Lyle", 30)).unwrap(), 2);

        let all = store.list::<Person>(KEY).unwrap();
        assert_eq!(all, vec![Person::new(1, "Kyle", 22), Person::new(2, "Lyle", 30)]);
    }

    #[test]
    fn test_conflicting_create_does_not_advance_counter() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();

        let err = store.create::<Person>(KEY, draft("Kyle", 22)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
        assert_eq!(store.id_counter(KEY).unwrap(), 1);
        assert_eq!(store.list::<Person>(KEY).unwrap().len(), 1);

        assert_eq!(store.create::<Person>(KEY, draft("Kyle", 23)).unwrap(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();
        store.delete::<Person>(KEY, &by_id(1)).unwrap();

        assert_eq!(store.create::<Person>(KEY, draft("Kyle", 22)).unwrap(), 2);
    }

    #[test]
    fn test_find_matching_with_empty_params_equals_list() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();
        store.create::<Person>(KEY, draft("Lyle", 22)).unwrap();

        let all = store.list::<Person>(KEY).unwrap();
        let filtered = store.find_matching::<Person>(KEY, &Params::new()).unwrap();
        assert_eq!(all, filtered);
    }

    #[test]
    fn test_update_merges_present_fields_only() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();

        store
            .update::<Person>(KEY, &by_id(1), &partial(json!({"name": "Lyle"})))
            .unwrap();

        assert_eq!(store.list::<Person>(KEY).unwrap(), vec![Person::new(1, "Lyle", 22)]);
    }

    #[test]
    fn test_update_with_empty_partial_is_noop() {
        let backend = Arc::new(MemoryStore::new());
        let store = RecordStore::new(backend.clone());
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();
        let before = backend.get(KEY).unwrap();

        store.update::<Person>(KEY, &by_id(1), &Map::new()).unwrap();

        assert_eq!(backend.get(KEY).unwrap(), before);
    }

    #[test]
    fn test_update_never_changes_identifier() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();

        store
            .update::<Person>(KEY, &by_id(1), &partial(json!({"id": 99, "age": 23})))
            .unwrap();

        assert_eq!(store.list::<Person>(KEY).unwrap(), vec![Person::new(1, "Kyle", 23)]);
    }

    #[test]
    fn test_update_rejects_wrong_type_and_keeps_record() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();

        let err = store
            .update::<Person>(KEY, &by_id(1), &partial(json!({"name": "Lyle", "age": "old"})))
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidField(_)));
        assert_eq!(store.list::<Person>(KEY).unwrap(), vec![Person::new(1, "Kyle", 22)]);
    }

    #[test]
    fn test_update_address_resolution() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();
        store.create::<Person>(KEY, draft("Lyle", 22)).unwrap();

        let missing = store.update::<Person>(KEY, &by_id(7), &Map::new()).unwrap_err();
        assert!(matches!(missing, StoreError::NotFound));

        let by_age = Params::from([("age".to_string(), "22".to_string())]);
        let ambiguous = store.update::<Person>(KEY, &by_age, &Map::new()).unwrap_err();
        assert!(matches!(ambiguous, StoreError::Ambiguous(2)));
    }

    #[test]
    fn test_delete_is_not_idempotent() {
        let store = RecordStore::in_memory();
        store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();

        store.delete::<Person>(KEY, &by_id(1)).unwrap();
        let err = store.delete::<Person>(KEY, &by_id(1)).unwrap_err();

        assert!(matches!(err, StoreError::NotFound));
        assert!(store.list::<Person>(KEY).unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let store = RecordStore::in_memory();
        store.create::<Person>("persons", draft("Kyle", 22)).unwrap();
        store.create::<Person>("staff", draft("Kyle", 22)).unwrap();

        assert_eq!(store.id_counter("persons").unwrap(), 1);
        assert_eq!(store.id_counter("staff").unwrap(), 1);
    }

    #[test]
    fn test_concurrent_creates_get_unique_ids() {
        let store = Arc::new(RecordStore::in_memory());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.create::<Person>(KEY, draft("Kyle", i)).unwrap())
            })
            .collect();

        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
        assert_eq!(store.list::<Person>(KEY).unwrap().len(), 16);
    }

    #[test]
    fn test_corrupt_collection_is_reported() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(KEY, "{".to_string()).unwrap();
        let store = RecordStore::new(backend);

        assert!(matches!(store.list::<Person>(KEY), Err(StoreError::Codec { .. })));
    }

    /// Records every `op/outcome` pair registered on `store_operations_total`.
    #[derive(Default)]
    struct OutcomeRecorder {
        seen: parking_lot::Mutex<Vec<String>>,
    }

    impl ::metrics::Recorder for OutcomeRecorder {
        fn describe_counter(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}
        fn describe_gauge(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}
        fn describe_histogram(&self, _: ::metrics::KeyName, _: Option<::metrics::Unit>, _: ::metrics::SharedString) {}

        fn register_counter(&self, key: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Counter {
            if key.name() == "store_operations_total" {
                let label = |name: &str| {
                    key.labels()
                        .find(|l| l.key() == name)
                        .map(|l| l.value().to_string())
                        .unwrap_or_default()
                };
                self.seen.lock().push(format!("{}/{}", label("op"), label("outcome")));
            }
            ::metrics::Counter::noop()
        }

        fn register_gauge(&self, _: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Gauge {
            ::metrics::Gauge::noop()
        }

        fn register_histogram(&self, _: &::metrics::Key, _: &::metrics::Metadata<'_>) -> ::metrics::Histogram {
            ::metrics::Histogram::noop()
        }
    }

    #[test]
    fn test_outcomes_are_counted() {
        let recorder = OutcomeRecorder::default();
        let store = RecordStore::in_memory();

        ::metrics::with_local_recorder(&recorder, || {
            store.list::<Person>(KEY).unwrap();
            store.create::<Person>(KEY, draft("Kyle", 22)).unwrap();
            store.create::<Person>(KEY, draft("Kyle", 22)).unwrap_err();
            store.find_matching::<Person>(KEY, &by_id(1)).unwrap();
            store.update::<Person>(KEY, &by_id(1), &partial(json!({"age": "old"}))).unwrap_err();
            store.delete::<Person>(KEY, &by_id(7)).unwrap_err();
            store.delete::<Person>(KEY, &by_id(1)).unwrap();
        });

        assert_eq!(
            *recorder.seen.lock(),
            vec![
                "list/ok",
                "create/ok",
                "create/conflict",
                "find/ok",
                "update/invalid",
                "delete/not_found",
                "delete/ok",
            ]
        );
    }

    #[test]
    fn test_storage_failures_are_counted() {
        let recorder = OutcomeRecorder::default();
        let backend = Arc::new(MemoryStore::new());
        backend.set(KEY, "{".to_string()).unwrap();
        let store = RecordStore::new(backend);

        ::metrics::with_local_recorder(&recorder, || {
            store.list::<Person>(KEY).unwrap_err();
            store.create::<Person>(KEY, draft("Kyle", 22)).unwrap_err();
            store.delete::<Person>(KEY, &by_id(1)).unwrap_err();
        });

        assert_eq!(
            *recorder.seen.lock(),
            vec!["list/storage_error", "create/storage_error", "delete/storage_error"]
        );
    }
}
