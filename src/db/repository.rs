use crate::db::kv_store::KeyValueStore;
use crate::error::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const TRANSACTIONS_KEY: &str = "budgetTransactions";
pub const HABITS_KEY: &str = "habits";
pub const GOALS_KEY: &str = "goals";

/// Reads the collection stored under `key`.
///
/// A missing key is an empty collection. A value that does not parse is
/// reported as [Error::CorruptPersistedState].
pub fn try_load<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Vec<T>, Error> {
    let raw = match store.get(key)? {
        Some(raw) => raw,
        None => return Ok(Vec::new()),
    };

    serde_json::from_str(&raw).map_err(|e| Error::CorruptPersistedState {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Reads the collection stored under `key`, starting over with an empty
/// collection if it cannot be read.
pub fn load<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Vec<T> {
    match try_load(store, key) {
        Ok(records) => {
            tracing::info!("Loaded {} records from \"{key}\"", records.len());
            records
        }
        Err(error) => {
            tracing::error!("Discarding stored \"{key}\": {error}");
            Vec::new()
        }
    }
}

/// Writes the whole collection under `key`, replacing what was there.
pub fn save<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<(), Error> {
    let raw = serde_json::to_string(records)?;
    store.set(key, &raw).map_err(|e| match e {
        Error::PersistenceWrite { .. } => e,
        other => Error::PersistenceWrite {
            key: key.to_string(),
            reason: other.to_string(),
        },
    })?;
    tracing::debug!("Saved {} records to \"{key}\"", records.len());
    Ok(())
}
