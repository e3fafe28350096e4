//! `LD_PRELOAD`/`DYLD_INSERT_LIBRARIES` interposers for `getuid`, `getgid`,
//! `gethostname`, and `uname`.

mod bindings;
mod interposers;
mod original;

pub use bindings::BINDINGS_PATH_VAR;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bindings_path_var_name_is_stable() {
        assert_eq!(BINDINGS_PATH_VAR, "PRIVARION_HOOK_BINDINGS");
    }

    #[test]
    fn missing_bindings_file_yields_empty_table() {
        // SAFETY: test-only; no other test in this crate touches env vars.
        unsafe {
            std::env::remove_var(BINDINGS_PATH_VAR);
        }
        assert_eq!(bindings::lookup("gethostname"), None);
    }

    #[test]
    fn bindings_file_is_parsed_into_the_lookup_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"gethostname": "ghost.local"}}"#).unwrap();

        // A OnceLock backs the crate-wide table, so this only exercises the
        // parser, not the process-wide singleton refreshing mid-test.
        let content = std::fs::read_to_string(file.path()).unwrap();
        let parsed: std::collections::HashMap<String, String> =
            serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.get("gethostname"), Some(&"ghost.local".to_string()));
    }
}
