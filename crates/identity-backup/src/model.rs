use crate::identity::IdentityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A single reversible mutation of a persistent system identifier.
///
/// `original_value` is set once, at construction, and never mutated
/// afterward; only `new_value` changes over the record's life. This record
/// carries no `validated` flag of its own: integrity is reported
/// out-of-band by [`IdentityBackupStore::validate_integrity`], which
/// recomputes the checksum against the live record rather than trusting a
/// persisted bit that could go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBackup {
    pub id: Uuid,
    pub session_id: Uuid,
    pub identity_type: IdentityType,
    pub original_value: String,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

impl IdentityBackup {
    pub fn new(
        session_id: Uuid,
        identity_type: IdentityType,
        original_value: String,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            identity_type,
            original_value,
            new_value: None,
            created_at: Utc::now(),
            metadata,
        }
    }

    /// A checksum of every field of this record, used by
    /// [`PersistedBackup::is_checksum_valid`] to detect on-disk corruption.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update(self.session_id.as_bytes());
        hasher.update(self.identity_type.as_str().as_bytes());
        hasher.update(self.original_value.as_bytes());
        if let Some(new_value) = &self.new_value {
            hasher.update(new_value.as_bytes());
        }
        hasher.update(self.created_at.to_rfc3339().as_bytes());
        for (k, v) in &self.metadata {
            hasher.update(k.as_bytes());
            hasher.update(v.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// A record as persisted on disk: the backup plus a checksum trailer,
/// carried as a plain field alongside the JSON record rather than a
/// length-prefixed binary trailer, since the store's unit of storage is the
/// whole session file, not an individual record stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedBackup {
    pub backup: IdentityBackup,
    pub checksum: String,
}

impl PersistedBackup {
    pub fn seal(backup: IdentityBackup) -> Self {
        let checksum = backup.checksum();
        Self { backup, checksum }
    }

    /// True iff the record parses (guaranteed, since we're already holding a
    /// deserialized value) and its checksum matches the stored trailer.
    pub fn is_checksum_valid(&self) -> bool {
        self.backup.checksum() == self.checksum
    }
}

/// A group of [`IdentityBackup`]s created together, restored together, and
/// deleted together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSession {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub persistent: bool,
    pub backups: Vec<PersistedBackup>,
}

impl BackupSession {
    pub fn new(name: String, persistent: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
            persistent,
            backups: Vec::new(),
        }
    }

    pub fn backup_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.backups.iter().map(|b| b.backup.id)
    }

    /// At most one active backup per identity type: finds the most recent
    /// backup for `identity_type` still in this session, if any.
    pub fn active_backup_for(&self, identity_type: IdentityType) -> Option<&PersistedBackup> {
        self.backups
            .iter()
            .rev()
            .find(|b| b.backup.identity_type == identity_type)
    }
}
