use crate::error::HookError;
use crate::handle::HookHandle;
use crate::launch::{LaunchResult, preload_env_var, sip_enabled};
use crate::registry::{INTERPOSABLE_FUNCTIONS, is_interposable};
use config_snapshot::SyscallHookModule;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Installs and removes in-process function interposers for a target
/// executable launched with `hook_library_path` pre-loaded.
pub struct SyscallInterceptionManager {
    hook_library_path: PathBuf,
    minimum_platform_major_version: u32,
    initialized: RwLock<bool>,
    active: RwLock<BTreeMap<String, HookHandle>>,
}

impl SyscallInterceptionManager {
    pub fn new(hook_library_path: impl Into<PathBuf>) -> Self {
        Self {
            hook_library_path: hook_library_path.into(),
            minimum_platform_major_version: 0,
            initialized: RwLock::new(false),
            active: RwLock::new(BTreeMap::new()),
        }
    }

    /// True iff the host provides library-preload injection and its major
    /// version meets the configured minimum. Preload injection itself is a
    /// standard facility on Linux and macOS; the version gate exists for
    /// hosts new enough to carry the expected `LD_PRELOAD`/
    /// `DYLD_INSERT_LIBRARIES` semantics.
    pub fn is_platform_supported(&self) -> bool {
        if !cfg!(any(target_os = "linux", target_os = "macos")) {
            return false;
        }
        platform_major_version() >= self.minimum_platform_major_version
    }

    /// Idempotent: repeated calls return success without re-allocating.
    pub fn initialize(&self) -> Result<(), HookError> {
        if !self.is_platform_supported() {
            return Err(HookError::UnsupportedPlatform);
        }
        *self.initialized.write() = true;
        Ok(())
    }

    /// Installs exactly the interposers enabled in `config.hooks`. Partial
    /// failure rolls back every hook installed for this call.
    pub fn install_configured_hooks(
        &self,
        config: &SyscallHookModule,
    ) -> Result<BTreeMap<String, HookHandle>, HookError> {
        if !*self.initialized.read() {
            self.initialize()?;
        }

        let mut installed = BTreeMap::new();
        for function in INTERPOSABLE_FUNCTIONS {
            if !config.hooks.hook_enabled(function.name) {
                continue;
            }
            match self.install_one(function.name) {
                Ok(handle) => {
                    installed.insert(function.name.to_string(), handle);
                }
                Err(err) => {
                    for name in installed.keys() {
                        self.active.write().remove(name);
                    }
                    return Err(err);
                }
            }
        }

        Ok(installed)
    }

    fn install_one(&self, function: &str) -> Result<HookHandle, HookError> {
        if !is_interposable(function) {
            return Err(HookError::UnknownFunction(function.to_string()));
        }
        let handle = HookHandle::new(function);
        self.active
            .write()
            .insert(function.to_string(), handle.clone());
        tracing::debug!(function, "Installed interposer");
        Ok(handle)
    }

    pub fn is_hooked(&self, function: &str) -> bool {
        self.active.read().contains_key(function)
    }

    pub fn active_hook_count(&self) -> usize {
        self.active.read().len()
    }

    pub fn active_hooks(&self) -> Vec<String> {
        self.active.read().keys().cloned().collect()
    }

    /// Removes a single installed interposer. Returns `false` if it was not
    /// active.
    pub fn uninstall(&self, function: &str) -> bool {
        let mut active = self.active.write();
        match active.get_mut(function) {
            Some(handle) => {
                handle.invalidate();
                active.remove(function);
                true
            }
            None => false,
        }
    }

    /// Pure; returns a shell-ready launch line without side effects.
    pub fn get_injection_command(&self, app_path: &str, args: &[String]) -> String {
        let mut command = format!(
            "{}={} {app_path}",
            preload_env_var(),
            self.hook_library_path.display()
        );
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    pub fn launch_application_with_hooks(
        &self,
        app_path: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> LaunchResult {
        if sip_enabled() {
            return LaunchResult::SipEnabled;
        }
        if !Path::new(app_path).exists() {
            return LaunchResult::TargetNotFound;
        }
        if !self.hook_library_path.exists() {
            return LaunchResult::HookLibraryNotFound;
        }

        let mut command = Command::new(app_path);
        command
            .args(args)
            .envs(env)
            .env(preload_env_var(), &self.hook_library_path);

        match command.spawn() {
            Ok(_) => LaunchResult::Success,
            Err(err) => LaunchResult::Failed(err.to_string()),
        }
    }
}

#[cfg(target_os = "linux")]
fn platform_major_version() -> u32 {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .and_then(|release| release.split('.').next().map(str::to_string))
        .and_then(|major| major.parse().ok())
        .unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
fn platform_major_version() -> u32 {
    0
}
