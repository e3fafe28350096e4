/// Outcome of `launch_application_with_hooks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    Success,
    /// Kernel integrity protection (e.g. macOS SIP) prevents injection.
    SipEnabled,
    TargetNotFound,
    HookLibraryNotFound,
    Failed(String),
}

#[cfg(target_os = "macos")]
pub fn preload_env_var() -> &'static str {
    "DYLD_INSERT_LIBRARIES"
}

#[cfg(not(target_os = "macos"))]
pub fn preload_env_var() -> &'static str {
    "LD_PRELOAD"
}

/// Best-effort detection of kernel integrity protection. Only macOS SIP is
/// modeled; every other platform reports `false`. Failure to determine
/// status is treated as "not enabled" rather than blocking the launch.
#[cfg(target_os = "macos")]
pub fn sip_enabled() -> bool {
    use std::process::Command;

    Command::new("csrutil")
        .arg("status")
        .output()
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .to_ascii_lowercase()
                .contains("enabled")
        })
        .unwrap_or(false)
}

#[cfg(not(target_os = "macos"))]
pub fn sip_enabled() -> bool {
    false
}
