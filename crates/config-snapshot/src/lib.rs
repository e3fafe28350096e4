//! Immutable configuration snapshots consumed by every other privarion-core
//! component.
//!
//! The core never reads a configuration *file*, that's an external
//! collaborator's job. This crate only models the recognized options as
//! plain, `serde`-round-trippable types and the pure validation / key-path
//! logic a CLI front-end would bind to.

mod error;
mod keypath;
mod profile;

pub use error::ConfigError;
pub use keypath::{get as keypath_get, set as keypath_set};
pub use profile::{
    DEFAULT_PROFILE, IdentitySpoofingToggles, ModuleToggles, NetworkFilterToggles, Profile,
    ProfileMap, SandboxManagerToggles, SnapshotManagerToggles, SyscallHookModule,
    SyscallHookToggles, default_profile_map,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    pub enabled: bool,
    pub log_level: LogLevel,
    pub log_directory: PathBuf,
    pub max_log_size_mb: u32,
    pub log_rotation_count: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: LogLevel::Info,
            log_directory: PathBuf::from("."),
            max_log_size_mb: 10,
            log_rotation_count: 5,
        }
    }
}

/// Transport a per-application rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    Tcp,
    Udp,
    Icmp,
    Other,
}

/// Policy outcome for a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePolicy {
    Allow,
    Block,
}

/// A per-application network rule. Explicit per-application rules win over
/// global allow/block decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRule {
    pub application: String,
    pub domain_or_ip: String,
    pub protocol: Option<TransportProtocol>,
    pub policy: RulePolicy,
}

/// An immutable view of the recognized configuration options in force at a
/// given instant. A newer snapshot supersedes atomically; callers hold a
/// cheap, shared reference (`Arc<ConfigSnapshot>` at the call site) rather
/// than a mutable handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub global: GlobalConfig,
    pub active_profile: String,
    pub profiles: ProfileMap,
    pub blocklist: BTreeSet<String>,
    pub fingerprinting_keywords: BTreeSet<String>,
    pub app_rules: Vec<AppRule>,
    pub allowlist: BTreeSet<String>,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            active_profile: DEFAULT_PROFILE.to_string(),
            profiles: default_profile_map(),
            blocklist: BTreeSet::new(),
            fingerprinting_keywords: default_fingerprinting_keywords(),
            app_rules: Vec::new(),
            allowlist: BTreeSet::new(),
        }
    }
}

pub fn default_fingerprinting_keywords() -> BTreeSet<String> {
    [
        "fingerprint",
        "tracking",
        "analytics",
        "telemetry",
        "metrics",
        "pixel",
        "fp",
        "track",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ConfigSnapshot {
    /// The module toggles of the currently active profile.
    ///
    /// Panics if `active_profile` does not name a profile in `profiles`,
    /// an invariant established by [`ConfigSnapshot::validate`] and
    /// [`ConfigSnapshot::switch_profile`], which every mutator goes through.
    pub fn active_modules(&self) -> ModuleToggles {
        self.profiles
            .get(&self.active_profile)
            .map(|p| p.modules)
            .unwrap_or_default()
    }

    /// Validates the recognized options' constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global.log_rotation_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "global.logRotationCount".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.profiles.contains_key(&self.active_profile) {
            return Err(ConfigError::ProfileNotFound(self.active_profile.clone()));
        }

        if !self.profiles.contains_key(DEFAULT_PROFILE) {
            return Err(ConfigError::ProfileNotFound(DEFAULT_PROFILE.to_string()));
        }

        Ok(())
    }

    pub fn switch_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.profiles.contains_key(name) {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        self.active_profile = name.to_string();
        Ok(())
    }

    pub fn create_profile(&mut self, name: &str, description: &str) -> Result<(), ConfigError> {
        if self.profiles.contains_key(name) {
            return Err(ConfigError::ProfileAlreadyExists(name.to_string()));
        }
        self.profiles.insert(
            name.to_string(),
            Profile {
                name: name.to_string(),
                description: description.to_string(),
                modules: ModuleToggles::default(),
            },
        );
        Ok(())
    }

    pub fn delete_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        if name == DEFAULT_PROFILE {
            return Err(ConfigError::DefaultProfileImmutable);
        }
        if self.profiles.remove(name).is_none() {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        if self.active_profile == name {
            self.active_profile = DEFAULT_PROFILE.to_string();
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = ConfigSnapshot::default();
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_validates() {
        let snapshot = ConfigSnapshot::default();
        snapshot.validate().expect("default snapshot is valid");
    }

    #[test]
    fn default_profile_cannot_be_deleted() {
        let mut snapshot = ConfigSnapshot::default();
        let err = snapshot.delete_profile(DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultProfileImmutable));
    }

    #[test]
    fn switching_to_unknown_profile_fails() {
        let mut snapshot = ConfigSnapshot::default();
        let err = snapshot.switch_profile("ghost").unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(_)));
    }

    #[test]
    fn create_then_switch_profile() {
        let mut snapshot = ConfigSnapshot::default();
        snapshot.create_profile("work", "office network").unwrap();
        snapshot.switch_profile("work").unwrap();
        assert_eq!(snapshot.active_profile, "work");
    }

    #[test]
    fn deleting_active_non_default_profile_falls_back_to_default() {
        let mut snapshot = ConfigSnapshot::default();
        snapshot.create_profile("work", "office network").unwrap();
        snapshot.switch_profile("work").unwrap();
        snapshot.delete_profile("work").unwrap();
        assert_eq!(snapshot.active_profile, DEFAULT_PROFILE);
    }

    #[test]
    fn zero_log_rotation_count_is_invalid() {
        let mut snapshot = ConfigSnapshot::default();
        snapshot.global.log_rotation_count = 0;
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn json_round_trip() {
        let snapshot = ConfigSnapshot::default();
        let json = snapshot.to_json_string().unwrap();
        let parsed = ConfigSnapshot::from_json_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
