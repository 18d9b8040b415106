use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// Loads a JSON structure from `path`.
///
/// An absent file and malformed content both resolve to the default value
/// rather than an error; losing a local store is never fatal.
pub fn load<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let Ok(raw) = fs::read_to_string(path) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), %err, "malformed store, starting empty");
            T::default()
        }
    }
}

/// Writes a structure to `path` as pretty-printed JSON.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
