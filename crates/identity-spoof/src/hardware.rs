use crate::error::SpoofError;
use identity_backup::IdentityType;

/// Platform-specific leaf that answers "what is this identifier's real
/// value on this host right now." The Identity Spoofing Manager consults
/// this only on a binding miss.
pub trait HardwareIdentifierEngine: Send + Sync {
    fn current_value(&self, identity_type: IdentityType) -> Result<String, SpoofError>;
}

fn query_failed(identity_type: IdentityType, reason: impl Into<String>) -> SpoofError {
    SpoofError::PlatformQueryFailed {
        identity_type: identity_type.as_str().to_string(),
        reason: reason.into(),
    }
}

#[cfg(target_os = "linux")]
pub use linux::LinuxHardwareIdentifierEngine;

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Reads hardware identifiers from the usual Linux vantage points:
    /// `gethostname(2)` (via `nix`), `/sys/class/net/*/address` for the MAC
    /// and interface name, SMBIOS system information (via `smbios-lib`) for
    /// the serial number, and `/etc/machine-id` as the closest stable
    /// stand-in for a disk UUID. Real disk UUIDs require block-device
    /// enumeration that is out of scope here.
    #[derive(Debug, Default)]
    pub struct LinuxHardwareIdentifierEngine;

    impl HardwareIdentifierEngine for LinuxHardwareIdentifierEngine {
        fn current_value(&self, identity_type: IdentityType) -> Result<String, SpoofError> {
            match identity_type {
                IdentityType::Hostname => hostname(),
                IdentityType::MacAddress => first_interface_address(),
                IdentityType::SerialNumber => serial_number(),
                IdentityType::DiskUuid => machine_id(),
                IdentityType::NetworkInterface => first_interface_name(),
            }
        }
    }

    fn hostname() -> Result<String, SpoofError> {
        nix::unistd::gethostname()
            .map_err(|e| query_failed(IdentityType::Hostname, e.to_string()))?
            .into_string()
            .map_err(|_| query_failed(IdentityType::Hostname, "hostname is not valid UTF-8"))
    }

    fn net_class_dir() -> &'static Path {
        Path::new("/sys/class/net")
    }

    fn interfaces() -> Result<Vec<String>, SpoofError> {
        let entries = fs::read_dir(net_class_dir()).map_err(|e| {
            query_failed(
                IdentityType::NetworkInterface,
                format!("reading /sys/class/net: {e}"),
            )
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "lo")
            .collect();
        names.sort();
        Ok(names)
    }

    fn first_interface_name() -> Result<String, SpoofError> {
        interfaces()?
            .into_iter()
            .next()
            .ok_or_else(|| query_failed(IdentityType::NetworkInterface, "no non-loopback interface found"))
    }

    fn first_interface_address() -> Result<String, SpoofError> {
        let name = first_interface_name()?;
        let path = net_class_dir().join(&name).join("address");
        fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|e| query_failed(IdentityType::MacAddress, format!("reading {}: {e}", path.display())))
    }

    fn serial_number() -> Result<String, SpoofError> {
        let data = smbios_lib::table_load_from_device()
            .map_err(|e| query_failed(IdentityType::SerialNumber, e.to_string()))?;

        let system = data
            .first::<smbios_lib::SMBiosSystemInformation>()
            .ok_or_else(|| query_failed(IdentityType::SerialNumber, "no SMBIOS system information table"))?;

        let serial = system.serial_number().to_string();
        if serial.is_empty() {
            return Err(query_failed(
                IdentityType::SerialNumber,
                "SMBIOS serial number is not set",
            ));
        }
        Ok(serial)
    }

    fn machine_id() -> Result<String, SpoofError> {
        fs::read_to_string("/etc/machine-id")
            .map(|s| s.trim().to_string())
            .map_err(|e| query_failed(IdentityType::DiskUuid, format!("reading /etc/machine-id: {e}")))
    }
}

/// Returns a live hardware value for whichever test harness or unsupported
/// platform calls it; never installed by default in production wiring.
#[derive(Debug, Default)]
pub struct UnsupportedPlatformEngine;

impl HardwareIdentifierEngine for UnsupportedPlatformEngine {
    fn current_value(&self, identity_type: IdentityType) -> Result<String, SpoofError> {
        Err(query_failed(
            identity_type,
            "hardware identifier queries are not implemented on this platform",
        ))
    }
}
