use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Env var pointing at a JSON object of `function name -> spoofed value`.
/// Set by `launch_application_with_hooks` alongside the preload variable
/// itself, since the interposer runs in a separate process and cannot
/// share the daemon's in-memory `SpoofedValueBindings` directly.
pub const BINDINGS_PATH_VAR: &str = "PRIVARION_HOOK_BINDINGS";

static BINDINGS: OnceLock<ArcSwap<HashMap<String, String>>> = OnceLock::new();

/// Loads the binding table once per process lifetime. Interposers must not
/// allocate on the fast path and must consult a shared-immutable snapshot
/// installed once per configuration change; for an injected process that
/// snapshot is fixed at launch.
fn load() -> ArcSwap<HashMap<String, String>> {
    let table = std::env::var(BINDINGS_PATH_VAR)
        .ok()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default();
    ArcSwap::from_pointee(table)
}

pub fn snapshot() -> Arc<HashMap<String, String>> {
    BINDINGS.get_or_init(load).load_full()
}

pub fn lookup(function: &str) -> Option<String> {
    snapshot().get(function).cloned()
}
