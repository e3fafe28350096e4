use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup `{0}` not found")]
    BackupNotFound(Uuid),

    #[error("session `{0}` not found")]
    SessionNotFound(Uuid),

    #[error("no session is currently open; call start_session first")]
    NoOpenSession,

    #[error("a session is already open; complete it before starting another")]
    SessionAlreadyOpen,

    #[error("backup `{0}` failed validation: {reason}")]
    BackupValidationFailed { id: Uuid, reason: String },

    #[error("refusing to delete persistent session `{0}` without force_persistent")]
    SessionIsPersistent(Uuid),

    #[error("restore of backup `{id}` failed: {reason}")]
    RestoreFailed { id: Uuid, reason: String },

    #[error("`{value}` is not a valid {identity_type} value: {reason}")]
    InvalidIdentityValue {
        identity_type: String,
        value: String,
        reason: String,
    },

    #[error("storage I/O error: {0}")]
    Io(String),
}

impl BackupError {
    pub fn troubleshooting(&self) -> String {
        match self {
            BackupError::BackupNotFound(id) => format!(
                "No backup with id `{id}` exists in the store. Run `identity list` \
                 to see all known backups, or `identity sessions` to browse by session."
            ),
            BackupError::SessionNotFound(id) => format!(
                "No session with id `{id}` exists. Run `identity sessions` to list \
                 known sessions."
            ),
            BackupError::NoOpenSession => {
                "No backup session is open. Call start_session (or use the \
                 single-shot create_backup helper) before adding backups."
                    .to_string()
            }
            BackupError::SessionAlreadyOpen => {
                "A backup session is already open for this process. Complete it \
                 with complete_session before starting a new one; only one \
                 write transaction may be open at a time."
                    .to_string()
            }
            BackupError::BackupValidationFailed { id, reason } => format!(
                "Backup `{id}` failed validation ({reason}). The on-disk record may \
                 be corrupted; other backups are unaffected. Run `identity validate` \
                 for a full integrity report."
            ),
            BackupError::SessionIsPersistent(id) => format!(
                "Session `{id}` is marked persistent and was not deleted. Pass \
                 --force-persistent if you are sure you want to discard it."
            ),
            BackupError::RestoreFailed { id, reason } => format!(
                "Restoring backup `{id}` failed ({reason}) and the backup record \
                 was NOT marked deleted. Verify you have permission to change the \
                 underlying system identifier and retry."
            ),
            BackupError::InvalidIdentityValue {
                identity_type,
                value,
                reason,
            } => format!(
                "`{value}` is not a valid value for identity type `{identity_type}` \
                 ({reason}). Check the expected format and retry."
            ),
            BackupError::Io(reason) => format!(
                "A storage I/O error occurred ({reason}). Verify the backup store \
                 directory exists and is writable, then retry."
            ),
        }
    }
}
