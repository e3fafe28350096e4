//! Crash-safe, session-grouped, content-addressed backup store for mutated
//! system identities.

mod error;
mod identity;
mod model;
mod restorer;
mod store;

pub use error::BackupError;
pub use identity::IdentityType;
pub use model::{BackupSession, IdentityBackup, PersistedBackup};
pub use restorer::{IdentityRestorer, NoopRestorer};
pub use store::{IdentityBackupStore, IntegrityReport};

/// Parses durations accepted by the `--older-than` CLI flag: `<int><unit>`
/// where unit in `{m, h, d, w}` and the default unit is days.
pub fn parse_duration(input: &str) -> Result<chrono::Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (digits, unit) = match trimmed.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => (&trimmed[..trimmed.len() - 1], c),
        _ => (trimmed, 'd'),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| format!("`{input}` is not a valid duration"))?;

    match unit {
        'm' => Ok(chrono::Duration::minutes(amount)),
        'h' => Ok(chrono::Duration::hours(amount)),
        'd' => Ok(chrono::Duration::days(amount)),
        'w' => Ok(chrono::Duration::weeks(amount)),
        other => Err(format!("unrecognized duration unit `{other}`")),
    }
}
