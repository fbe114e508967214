use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::kv::KeyValueStore;

/// Load a JSON value from the store. `Ok(None)` if the key is absent;
/// `StorageError::Corrupt` if the stored text does not parse as `T`.
pub fn load_state<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Save a JSON value to the store.
pub fn save_state<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}

/// Save a list, or remove the key entirely when the list is empty, so an
/// empty array is never left behind in storage.
///
/// Returns `true` if a value was written, `false` if the key was removed.
pub fn save_list_or_remove<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<bool, StorageError> {
    if items.is_empty() {
        store.remove(key)?;
        Ok(false)
    } else {
        save_state(store, key, items)?;
        Ok(true)
    }
}
