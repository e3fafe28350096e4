use serde::{Deserialize, Serialize};

/// The compile-time constant set of identifiers privarion can spoof and back
/// up. Value formats are enforced by [`IdentityType::validate_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityType {
    Hostname,
    MacAddress,
    SerialNumber,
    DiskUuid,
    NetworkInterface,
}

impl IdentityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityType::Hostname => "hostname",
            IdentityType::MacAddress => "macAddress",
            IdentityType::SerialNumber => "serialNumber",
            IdentityType::DiskUuid => "diskUUID",
            IdentityType::NetworkInterface => "networkInterface",
        }
    }

    /// Validates `value` against the expected format for this identity kind.
    pub fn validate_value(&self, value: &str) -> Result<(), String> {
        match self {
            IdentityType::Hostname => validate_hostname(value),
            IdentityType::MacAddress => validate_mac_address(value),
            IdentityType::SerialNumber => validate_serial_number(value),
            IdentityType::DiskUuid => validate_disk_uuid(value),
            IdentityType::NetworkInterface => validate_network_interface(value),
        }
    }
}

fn validate_hostname(value: &str) -> Result<(), String> {
    if value.is_empty() || value.len() > 255 {
        return Err("hostname must be 1..=255 characters".to_string());
    }
    let is_label_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.';
    if !value.chars().all(is_label_char) {
        return Err("hostname must use RFC-1123-label characters".to_string());
    }
    Ok(())
}

fn validate_mac_address(value: &str) -> Result<(), String> {
    let octets: Vec<&str> = value.split(':').collect();
    if octets.len() != 6 {
        return Err("MAC address must have six colon-separated octets".to_string());
    }
    for octet in octets {
        if octet.len() != 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("each MAC octet must be two hex digits".to_string());
        }
    }
    Ok(())
}

fn validate_serial_number(value: &str) -> Result<(), String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("serial number must be non-empty alphanumeric".to_string());
    }
    Ok(())
}

fn validate_disk_uuid(value: &str) -> Result<(), String> {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| "disk UUID must be a canonical 36-character UUID".to_string())
}

fn validate_network_interface(value: &str) -> Result<(), String> {
    if value.is_empty() || value.len() > 16 {
        return Err("network interface name must be 1..=16 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(IdentityType::Hostname, "alpha.local", true; "valid hostname")]
    #[test_case(IdentityType::Hostname, "", false; "empty hostname")]
    #[test_case(IdentityType::MacAddress, "aa:bb:cc:dd:ee:ff", true; "valid mac")]
    #[test_case(IdentityType::MacAddress, "aabbccddeeff", false; "mac without colons")]
    #[test_case(IdentityType::SerialNumber, "C02X1234ABCD", true; "valid serial")]
    #[test_case(IdentityType::SerialNumber, "", false; "empty serial")]
    #[test_case(IdentityType::DiskUuid, "550e8400-e29b-41d4-a716-446655440000", true; "valid disk uuid")]
    #[test_case(IdentityType::DiskUuid, "not-a-uuid", false; "invalid disk uuid")]
    #[test_case(IdentityType::NetworkInterface, "en0", true; "valid interface")]
    #[test_case(IdentityType::NetworkInterface, "", false; "empty interface")]
    fn validates_value_formats(identity_type: IdentityType, value: &str, expect_ok: bool) {
        assert_eq!(identity_type.validate_value(value).is_ok(), expect_ok);
    }
}
