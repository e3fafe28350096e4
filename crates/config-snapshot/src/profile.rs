use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the profile that always exists and can never be deleted.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySpoofingToggles {
    pub enabled: bool,
    pub spoof_hostname: bool,
    pub spoof_mac_address: bool,
    pub spoof_user_info: bool,
    pub spoof_system_info: bool,
}

impl Default for IdentitySpoofingToggles {
    fn default() -> Self {
        Self {
            enabled: true,
            spoof_hostname: true,
            spoof_mac_address: false,
            spoof_user_info: false,
            spoof_system_info: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFilterToggles {
    pub enabled: bool,
    pub block_telemetry: bool,
    pub block_analytics: bool,
    pub use_dns_filtering: bool,
}

impl Default for NetworkFilterToggles {
    fn default() -> Self {
        Self {
            enabled: true,
            block_telemetry: true,
            block_analytics: true,
            use_dns_filtering: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SandboxManagerToggles {
    pub enabled: bool,
    pub strict_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapshotManagerToggles {
    pub enabled: bool,
    pub auto_snapshot: bool,
}

/// Per-function enable flags for the syscall interception manager.
///
/// Extensible: unrecognized function names passed to `hook_enabled` simply
/// return `false`, so adding a new interposable function only requires a new
/// field plus a match arm in [`SyscallHookToggles::hook_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallHookToggles {
    pub getuid: bool,
    pub getgid: bool,
    pub gethostname: bool,
    pub uname: bool,
}

impl Default for SyscallHookToggles {
    fn default() -> Self {
        Self {
            getuid: true,
            getgid: true,
            gethostname: true,
            uname: true,
        }
    }
}

impl SyscallHookToggles {
    pub fn hook_enabled(&self, function: &str) -> bool {
        match function {
            "getuid" => self.getuid,
            "getgid" => self.getgid,
            "gethostname" => self.gethostname,
            "uname" => self.uname,
            _ => false,
        }
    }

    pub fn enabled_functions(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.getuid {
            names.push("getuid");
        }
        if self.getgid {
            names.push("getgid");
        }
        if self.gethostname {
            names.push("gethostname");
        }
        if self.uname {
            names.push("uname");
        }
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallHookModule {
    pub enabled: bool,
    pub debug_mode: bool,
    pub hooks: SyscallHookToggles,
}

impl Default for SyscallHookModule {
    fn default() -> Self {
        Self {
            enabled: true,
            debug_mode: false,
            hooks: SyscallHookToggles::default(),
        }
    }
}

/// The full set of per-profile module toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleToggles {
    pub identity_spoofing: IdentitySpoofingToggles,
    pub network_filter: NetworkFilterToggles,
    pub sandbox_manager: SandboxManagerToggles,
    pub snapshot_manager: SnapshotManagerToggles,
    pub syscall_hook: SyscallHookModule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub modules: ModuleToggles,
}

impl Profile {
    pub fn default_profile() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            description: "Built-in default profile".to_string(),
            modules: ModuleToggles::default(),
        }
    }
}

pub type ProfileMap = BTreeMap<String, Profile>;

pub fn default_profile_map() -> ProfileMap {
    let mut map = BTreeMap::new();
    map.insert(DEFAULT_PROFILE.to_string(), Profile::default_profile());
    map
}
