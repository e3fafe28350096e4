//! Dotted key-path access into a [`crate::ConfigSnapshot`], exposed for the
//! external `config get <keyPath>` / `config set <keyPath> <value>` CLI
//! collaborator. The core itself never parses a config file; it only
//! resolves paths against an already-constructed snapshot.

use crate::{ConfigError, ConfigSnapshot};
use serde_json::Value;

/// Reads a recognized key path out of `snapshot`, returning its current value
/// as JSON so the CLI can render it without knowing our Rust types.
pub fn get(snapshot: &ConfigSnapshot, key_path: &str) -> Result<Value, ConfigError> {
    let root = serde_json::to_value(snapshot).expect("ConfigSnapshot always serializes");
    resolve(&root, key_path).ok_or_else(|| ConfigError::UnknownKeyPath(key_path.to_string()))
}

/// Applies `value` at `key_path` on a clone of `snapshot`, returning the new
/// snapshot. Validation (`ConfigSnapshot::validate`) is the caller's
/// responsibility after this returns, matching `--dry-run` semantics where a
/// caller may want to validate without committing.
pub fn set(
    snapshot: &ConfigSnapshot,
    key_path: &str,
    value: Value,
) -> Result<ConfigSnapshot, ConfigError> {
    let mut root = serde_json::to_value(snapshot).expect("ConfigSnapshot always serializes");

    set_in_place(&mut root, key_path, value)
        .ok_or_else(|| ConfigError::UnknownKeyPath(key_path.to_string()))?;

    serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
        key: key_path.to_string(),
        reason: e.to_string(),
    })
}

fn resolve(root: &Value, key_path: &str) -> Option<Value> {
    let mut cursor = root;
    for segment in key_path.split('.') {
        cursor = cursor.get(segment)?;
    }
    Some(cursor.clone())
}

fn set_in_place(root: &mut Value, key_path: &str, value: Value) -> Option<()> {
    let segments: Vec<&str> = key_path.split('.').collect();
    let (last, init) = segments.split_last()?;

    let mut cursor = root;
    for segment in init {
        cursor = cursor.get_mut(*segment)?;
    }

    let obj = cursor.as_object_mut()?;
    if !obj.contains_key(*last) {
        return None;
    }
    obj.insert(last.to_string(), value);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigSnapshot;

    #[test]
    fn get_known_path_returns_value() {
        let snapshot = ConfigSnapshot::default();
        let value = get(&snapshot, "global.enabled").unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn get_unknown_path_errors() {
        let snapshot = ConfigSnapshot::default();
        let err = get(&snapshot, "global.doesNotExist").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKeyPath(_)));
    }

    #[test]
    fn set_known_path_round_trips() {
        let snapshot = ConfigSnapshot::default();
        let updated = set(&snapshot, "global.maxLogSizeMB", Value::from(50)).unwrap();
        assert_eq!(updated.global.max_log_size_mb, 50);
    }

    #[test]
    fn set_unknown_path_errors() {
        let snapshot = ConfigSnapshot::default();
        let err = set(&snapshot, "global.bogus", Value::from(1)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKeyPath(_)));
    }
}
