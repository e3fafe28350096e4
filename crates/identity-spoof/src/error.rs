use identity_backup::BackupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpoofError {
    #[error("`{value}` is not a valid {identity_type} value: {reason}")]
    InvalidValue {
        identity_type: String,
        value: String,
        reason: String,
    },

    #[error("failed to query the live value of {identity_type}: {reason}")]
    PlatformQueryFailed {
        identity_type: String,
        reason: String,
    },

    #[error(transparent)]
    Backup(#[from] BackupError),
}

impl SpoofError {
    pub fn troubleshooting(&self) -> String {
        match self {
            Self::InvalidValue {
                identity_type,
                value,
                reason,
            } => format!(
                "`{value}` is not a valid value for identity type `{identity_type}` ({reason}). \
                 Check the expected format before calling spoof again."
            ),
            Self::PlatformQueryFailed {
                identity_type,
                reason,
            } => format!(
                "Could not read the live value of `{identity_type}` from the host ({reason}). \
                 Verify the process has permission to query hardware identifiers on this platform."
            ),
            Self::Backup(err) => err.troubleshooting(),
        }
    }
}
