//! In-process function interposer installation for a preload-injected
//! target executable.

mod error;
mod handle;
mod launch;
mod manager;
mod registry;

pub use error::HookError;
pub use handle::HookHandle;
pub use launch::{LaunchResult, preload_env_var};
pub use manager::SyscallInterceptionManager;
pub use registry::{INTERPOSABLE_FUNCTIONS, InterposableFunction};

#[cfg(test)]
mod tests {
    use super::*;
    use config_snapshot::SyscallHookModule;
    use std::collections::BTreeMap;

    #[test]
    fn installing_same_configured_set_twice_yields_identical_active_hooks() {
        let manager = SyscallInterceptionManager::new("/nonexistent/libhook_preload.so");
        let config = SyscallHookModule::default();

        let first = manager.install_configured_hooks(&config).unwrap();
        let first_active = manager.active_hooks();

        manager.install_configured_hooks(&config).unwrap();
        let second_active = manager.active_hooks();

        let mut a = first_active.clone();
        let mut b = second_active.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(first.len(), first_active.len());
    }

    #[test]
    fn only_enabled_functions_are_installed() {
        let manager = SyscallInterceptionManager::new("/nonexistent/libhook_preload.so");
        let mut config = SyscallHookModule::default();
        config.hooks.uname = false;

        let installed = manager.install_configured_hooks(&config).unwrap();
        assert!(!installed.contains_key("uname"));
        assert!(installed.contains_key("getuid"));
    }

    #[test]
    fn get_injection_command_is_pure_and_preserves_args() {
        let manager = SyscallInterceptionManager::new("/opt/privarion/libhook_preload.so");
        let args = vec!["--flag".to_string(), "value".to_string()];
        let command = manager.get_injection_command("/usr/bin/app", &args);
        assert!(command.contains("/opt/privarion/libhook_preload.so"));
        assert!(command.ends_with("/usr/bin/app --flag value"));
    }

    #[test]
    fn launch_reports_target_not_found() {
        let manager = SyscallInterceptionManager::new("/opt/privarion/libhook_preload.so");
        let result = manager.launch_application_with_hooks(
            "/definitely/not/a/real/binary",
            &[],
            &BTreeMap::new(),
        );
        assert_eq!(result, LaunchResult::TargetNotFound);
    }

    #[test]
    fn uninstall_removes_an_active_hook() {
        let manager = SyscallInterceptionManager::new("/nonexistent/libhook_preload.so");
        manager.install_configured_hooks(&SyscallHookModule::default()).unwrap();
        assert!(manager.is_hooked("getuid"));
        assert!(manager.uninstall("getuid"));
        assert!(!manager.is_hooked("getuid"));
    }
}
