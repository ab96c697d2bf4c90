use crate::db::kv_store::KeyValueStore;
use crate::db::repository;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// An in-memory list of records mirrored to one key of a [KeyValueStore].
///
/// The list is the source of truth. After each change the whole list is
/// written back; a failed write is logged and remembered but never undoes
/// the change.
pub(crate) struct PersistedCollection<T, S> {
    key: &'static str,
    records: Vec<T>,
    store: S,
    unsaved: bool,
}

impl<T, S> PersistedCollection<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub(crate) fn load(store: S, key: &'static str) -> Self {
        let records = repository::load(&store, key);
        Self {
            key,
            records,
            store,
            unsaved: false,
        }
    }

    pub(crate) fn records(&self) -> &[T] {
        &self.records
    }

    pub(crate) fn unsaved(&self) -> bool {
        self.unsaved
    }

    /// Applies `change` to the records and persists the result.
    pub(crate) fn mutate<R>(&mut self, change: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let result = change(&mut self.records);
        self.persist();
        result
    }

    fn persist(&mut self) {
        match repository::save(&self.store, self.key, &self.records) {
            Ok(()) => self.unsaved = false,
            Err(error) => {
                tracing::error!("Keeping unsaved changes in memory: {error}");
                self.unsaved = true;
            }
        }
    }
}

/// A fresh, time-ordered record id for which `is_taken` is false.
pub(crate) fn new_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = uuid::Uuid::now_v7().to_string();
        if !is_taken(&id) {
            return id;
        }
    }
}
