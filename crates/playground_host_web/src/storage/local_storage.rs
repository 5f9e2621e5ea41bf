//! `localStorage`-backed key-value store implementation.
//!
//! The browser API is synchronous, so this adapter implements
//! [`playground_host::KeyValueStore`] directly. Write failures surface as `DOMException`s and are
//! classified by exception name so quota exhaustion can be told apart from other failures.

use playground_host::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, Default)]
/// Browser key-value store backed by `window.localStorage`.
///
/// On non-WASM targets reads are empty and writes are dropped.
pub struct WebLocalStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
fn classify_js_error(err: wasm_bindgen::JsValue) -> StorageError {
    use wasm_bindgen::JsCast;

    match err.dyn_into::<web_sys::DomException>() {
        Ok(exception) => StorageError::from_exception(exception.name(), exception.message()),
        Err(other) => StorageError::from_exception("Error", format!("{other:?}")),
    }
}

impl KeyValueStore for WebLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?.get_item(key).map_err(classify_js_error)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(classify_js_error)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?.remove_item(key).map_err(classify_js_error)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage()?;
            let len = storage.length().map_err(classify_js_error)?;
            let mut entries = Vec::with_capacity(len as usize);
            for index in 0..len {
                let Some(key) = storage.key(index).map_err(classify_js_error)? else {
                    continue;
                };
                if let Some(value) = storage.get_item(&key).map_err(classify_js_error)? {
                    entries.push((key, value));
                }
            }
            Ok(entries)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(Vec::new())
        }
    }
}
