//! Small key/value persistence.
//!
//! The browser build uses `localStorage`/`sessionStorage`. Native builds keep
//! local values as JSON files under `ANTEATER_DATA_DIR` (default `.anteater`)
//! and session values in memory for the lifetime of the process.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts.
    Local,
    /// Lives as long as the tab (web) or the process (native).
    Session,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("could not access `{key}`: {reason}")]
    Access { key: String, reason: String },

    #[error("stored value for `{key}` is malformed")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode value for `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_json<T: DeserializeOwned>(
    scope: StorageScope,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = backend::load(scope, key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

pub fn save_json<T: Serialize>(scope: StorageScope, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    backend::save(scope, key, &raw)
}

pub fn load_string(scope: StorageScope, key: &str) -> Result<Option<String>, StorageError> {
    backend::load(scope, key)
}

pub fn save_string(scope: StorageScope, key: &str, value: &str) -> Result<(), StorageError> {
    backend::save(scope, key, value)
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use super::{StorageError, StorageScope};

    fn web_storage(scope: StorageScope) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = match scope {
            StorageScope::Local => window.local_storage(),
            StorageScope::Session => window.session_storage(),
        };
        storage.ok().flatten().ok_or(StorageError::Unavailable)
    }

    pub(super) fn load(scope: StorageScope, key: &str) -> Result<Option<String>, StorageError> {
        web_storage(scope)?
            .get_item(key)
            .map_err(|err| StorageError::Access {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }

    pub(super) fn save(scope: StorageScope, key: &str, value: &str) -> Result<(), StorageError> {
        web_storage(scope)?
            .set_item(key, value)
            .map_err(|err| StorageError::Access {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::LazyLock;
    use std::{env, fs, io};

    use parking_lot::Mutex;

    use super::{StorageError, StorageScope};

    const DATA_DIR_VAR: &str = "ANTEATER_DATA_DIR";
    const DEFAULT_DATA_DIR: &str = ".anteater";

    static SESSION: LazyLock<Mutex<HashMap<String, String>>> =
        LazyLock::new(|| Mutex::new(HashMap::new()));

    fn file_for(key: &str) -> PathBuf {
        let dir = env::var_os(DATA_DIR_VAR).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        dir.join(format!("{key}.json"))
    }

    fn access_error(key: &str, err: &io::Error) -> StorageError {
        StorageError::Access {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub(super) fn load(scope: StorageScope, key: &str) -> Result<Option<String>, StorageError> {
        match scope {
            StorageScope::Session => Ok(SESSION.lock().get(key).cloned()),
            StorageScope::Local => match fs::read_to_string(file_for(key)) {
                Ok(raw) => Ok(Some(raw)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(access_error(key, &err)),
            },
        }
    }

    pub(super) fn save(scope: StorageScope, key: &str, value: &str) -> Result<(), StorageError> {
        match scope {
            StorageScope::Session => {
                SESSION.lock().insert(key.to_string(), value.to_string());
                Ok(())
            }
            StorageScope::Local => {
                let path = file_for(key);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|err| access_error(key, &err))?;
                }
                fs::write(path, value).map_err(|err| access_error(key, &err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        dark: bool,
    }

    #[test]
    fn session_values_round_trip() {
        save_json(StorageScope::Session, "test.prefs", &Prefs { dark: true })
            .expect("session storage is always available natively");
        let loaded: Option<Prefs> =
            load_json(StorageScope::Session, "test.prefs").expect("value was just written");
        assert_eq!(loaded, Some(Prefs { dark: true }), "value should survive");
    }

    #[test]
    fn missing_key_is_none() {
        let loaded: Option<Prefs> =
            load_json(StorageScope::Session, "test.never-written").expect("lookup succeeds");
        assert!(loaded.is_none(), "nothing stored under this key");
    }

    #[test]
    fn malformed_value_is_reported() {
        save_string(StorageScope::Session, "test.garbage", "{not json")
            .expect("session storage is always available natively");
        let result: Result<Option<Prefs>, _> = load_json(StorageScope::Session, "test.garbage");
        assert!(
            matches!(result, Err(StorageError::Malformed { .. })),
            "garbage should not parse"
        );
    }
}
