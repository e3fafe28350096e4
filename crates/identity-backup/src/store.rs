use crate::error::BackupError;
use crate::identity::IdentityType;
use crate::model::{BackupSession, IdentityBackup, PersistedBackup};
use crate::restorer::IdentityRestorer;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Per-backup result of [`IdentityBackupStore::validate_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub id: Uuid,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// Crash-safe, session-grouped, content-addressed store of identifier
/// mutations.
///
/// Persistence layout under `root_dir`:
/// - `sessions/<session-id>.json`, one file per [`BackupSession`]
/// - `index.json`, the list of all known session ids
///
/// Writes go through [`atomicwrites::AtomicFile`] (temp file + fsync +
/// rename), matching `headless-client::device_id::get_or_create`'s use of
/// the same crate for the device-id file.
pub struct IdentityBackupStore {
    root_dir: PathBuf,
    open_session: Mutex<Option<BackupSession>>,
}

impl IdentityBackupStore {
    pub fn open(root_dir: impl Into<PathBuf>) -> Result<Self, BackupError> {
        let root_dir = root_dir.into();
        fs::create_dir_all(root_dir.join("sessions"))
            .map_err(|e| BackupError::Io(e.to_string()))?;

        let store = Self {
            root_dir,
            open_session: Mutex::new(None),
        };

        if !store.index_path().exists() {
            store.write_index(&BTreeSet::new())?;
        }

        Ok(store)
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root_dir.join("sessions")
    }

    fn session_path(&self, id: Uuid) -> PathBuf {
        self.sessions_dir().join(format!("{id}.json"))
    }

    fn index_path(&self) -> PathBuf {
        self.root_dir.join("index.json")
    }

    fn read_index(&self) -> Result<BTreeSet<Uuid>, BackupError> {
        let content =
            fs::read_to_string(self.index_path()).map_err(|e| BackupError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| BackupError::Io(e.to_string()))
    }

    fn write_index(&self, ids: &BTreeSet<Uuid>) -> Result<(), BackupError> {
        atomic_write_json(&self.index_path(), ids)
    }

    fn read_session_file(&self, id: Uuid) -> Result<BackupSession, BackupError> {
        let content = fs::read_to_string(self.session_path(id))
            .map_err(|_| BackupError::SessionNotFound(id))?;
        serde_json::from_str(&content)
            .map_err(|e| BackupError::Io(format!("corrupt session file {id}: {e}")))
    }

    fn write_session_file(&self, session: &BackupSession) -> Result<(), BackupError> {
        atomic_write_json(&self.session_path(session.id), session)?;

        let mut index = self.read_index()?;
        index.insert(session.id);
        self.write_index(&index)
    }

    // -- Write-transaction API ------------------------------------------

    pub fn start_session(&self, name: &str, persistent: bool) -> Result<Uuid, BackupError> {
        let mut open = self.open_session.lock();
        if open.is_some() {
            return Err(BackupError::SessionAlreadyOpen);
        }
        let session = BackupSession::new(name.to_string(), persistent);
        let id = session.id;
        *open = Some(session);
        Ok(id)
    }

    pub fn add_backup(
        &self,
        identity_type: IdentityType,
        original_value: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<Uuid, BackupError> {
        identity_type
            .validate_value(original_value)
            .map_err(|reason| BackupError::InvalidIdentityValue {
                identity_type: identity_type.as_str().to_string(),
                value: original_value.to_string(),
                reason,
            })?;

        let mut open = self.open_session.lock();
        let session = open.as_mut().ok_or(BackupError::NoOpenSession)?;

        let backup = IdentityBackup::new(
            session.id,
            identity_type,
            original_value.to_string(),
            metadata,
        );
        let id = backup.id;
        session.backups.push(PersistedBackup::seal(backup));

        Ok(id)
    }

    pub fn complete_session(&self) -> Result<Uuid, BackupError> {
        let session = self
            .open_session
            .lock()
            .take()
            .ok_or(BackupError::NoOpenSession)?;

        let id = session.id;
        self.write_session_file(&session)?;
        tracing::debug!(session_id = %id, backups = session.backups.len(), "Completed backup session");
        Ok(id)
    }

    /// Single-shot convenience: opens a session, adds one backup, completes
    /// the session, and returns the backup id.
    pub fn create_backup(
        &self,
        identity_type: IdentityType,
        original_value: &str,
        session_name: &str,
    ) -> Result<Uuid, BackupError> {
        self.start_session(session_name, false)?;
        let backup_id = match self.add_backup(identity_type, original_value, BTreeMap::new()) {
            Ok(id) => id,
            Err(e) => {
                // Roll back the half-open session rather than leaking it.
                self.open_session.lock().take();
                return Err(e);
            }
        };
        self.complete_session()?;
        Ok(backup_id)
    }

    // -- Read API ---------------------------------------------------------

    pub fn list_backups(&self) -> Result<Vec<BackupSession>, BackupError> {
        let index = self.read_index()?;
        index.into_iter().map(|id| self.read_session_file(id)).collect()
    }

    fn find_backup(&self, id: Uuid) -> Result<(BackupSession, usize), BackupError> {
        for session in self.list_backups()? {
            if let Some(pos) = session.backups.iter().position(|b| b.backup.id == id) {
                return Ok((session, pos));
            }
        }
        Err(BackupError::BackupNotFound(id))
    }

    pub fn restore_from_backup(
        &self,
        id: Uuid,
        restorer: &dyn IdentityRestorer,
    ) -> Result<IdentityBackup, BackupError> {
        let (session, pos) = self.find_backup(id)?;
        let record = &session.backups[pos];

        restorer
            .restore(record.backup.identity_type, &record.backup.original_value)
            .map_err(|reason| BackupError::RestoreFailed { id, reason })?;

        Ok(record.backup.clone())
    }

    /// Restores every backup in `session_id`, in reverse insertion order
    /// (last mutation undone first).
    pub fn restore_session(
        &self,
        session_id: Uuid,
        restorer: &dyn IdentityRestorer,
    ) -> Result<Vec<IdentityBackup>, BackupError> {
        let session = self.read_session_file(session_id)?;
        let mut restored = Vec::with_capacity(session.backups.len());

        for record in session.backups.iter().rev() {
            restorer
                .restore(record.backup.identity_type, &record.backup.original_value)
                .map_err(|reason| BackupError::RestoreFailed {
                    id: record.backup.id,
                    reason,
                })?;
            restored.push(record.backup.clone());
        }

        Ok(restored)
    }

    pub fn delete_backup(&self, id: Uuid, force_persistent: bool) -> Result<(), BackupError> {
        let (mut session, pos) = self.find_backup(id)?;

        if session.persistent && !force_persistent {
            return Err(BackupError::SessionIsPersistent(session.id));
        }

        session.backups.remove(pos);
        self.write_session_file(&session)
    }

    pub fn delete_session(&self, session_id: Uuid, force_persistent: bool) -> Result<(), BackupError> {
        let session = self.read_session_file(session_id)?;

        if session.persistent && !force_persistent {
            return Err(BackupError::SessionIsPersistent(session_id));
        }

        fs::remove_file(self.session_path(session_id)).map_err(|e| BackupError::Io(e.to_string()))?;

        let mut index = self.read_index()?;
        index.remove(&session_id);
        self.write_index(&index)
    }

    /// Returns the ids of backups eligible for cleanup: older than
    /// `retention` and not in a persistent session. When `dry_run` is
    /// false, those backups (and any session left empty as a result) are
    /// actually deleted. Idempotent either way.
    pub fn cleanup(&self, retention: Duration, dry_run: bool) -> Result<Vec<Uuid>, BackupError> {
        let now = Utc::now();
        let mut eligible = Vec::new();

        for mut session in self.list_backups()? {
            if session.persistent {
                continue;
            }

            let (expired, kept): (Vec<_>, Vec<_>) = session
                .backups
                .into_iter()
                .partition(|b| now - b.backup.created_at > retention);

            eligible.extend(expired.iter().map(|b| b.backup.id));

            if dry_run || expired.is_empty() {
                continue;
            }

            session.backups = kept;
            if session.backups.is_empty() {
                fs::remove_file(self.session_path(session.id))
                    .map_err(|e| BackupError::Io(e.to_string()))?;
                let mut index = self.read_index()?;
                index.remove(&session.id);
                self.write_index(&index)?;
            } else {
                self.write_session_file(&session)?;
            }
        }

        Ok(eligible)
    }

    /// Enumerates every backup, reporting per-backup validity. Optionally
    /// compares `original_value` against `current_value_of` (the live
    /// system value), surfacing a warning on mismatch rather than an error,
    /// since drift is informative, not necessarily corruption.
    pub fn validate_integrity(
        &self,
        current_value_of: Option<&dyn Fn(IdentityType) -> Option<String>>,
    ) -> Result<Vec<IntegrityReport>, BackupError> {
        let mut reports = Vec::new();

        for session in self.list_backups()? {
            for record in &session.backups {
                let mut issues = Vec::new();
                let mut warnings = Vec::new();

                if !record.is_checksum_valid() {
                    issues.push("checksum mismatch".to_string());
                }

                if let Some(lookup) = current_value_of {
                    if let Some(live) = lookup(record.backup.identity_type) {
                        if live != record.backup.original_value {
                            warnings.push(format!(
                                "live value `{live}` differs from recorded original `{}`",
                                record.backup.original_value
                            ));
                        }
                    }
                }

                reports.push(IntegrityReport {
                    id: record.backup.id,
                    is_valid: issues.is_empty(),
                    issues,
                    warnings,
                });
            }
        }

        Ok(reports)
    }
}

fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), BackupError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| BackupError::Io(e.to_string()))?;

    let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
    file.write(|f| f.write_all(content.as_bytes()))
        .map_err(|e| BackupError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restorer::NoopRestorer;
    use tempfile::tempdir;

    fn open_store() -> (tempfile::TempDir, IdentityBackupStore) {
        let dir = tempdir().unwrap();
        let store = IdentityBackupStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn backup_round_trip_preserves_original_value() {
        let (_dir, store) = open_store();

        let id = store
            .create_backup(IdentityType::Hostname, "Alpha.local", "s1")
            .unwrap();

        let restored = store.restore_from_backup(id, &NoopRestorer).unwrap();
        assert_eq!(restored.original_value, "Alpha.local");

        let sessions = store.list_backups().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].backups.iter().any(|b| b.backup.id == id));
    }

    #[test]
    fn persistent_session_survives_delete_without_force() {
        let (_dir, store) = open_store();

        let session_id = store.start_session("s1", true).unwrap();
        store
            .add_backup(IdentityType::Hostname, "Alpha.local", BTreeMap::new())
            .unwrap();
        store.complete_session().unwrap();

        let err = store.delete_session(session_id, false).unwrap_err();
        assert!(matches!(err, BackupError::SessionIsPersistent(_)));

        store.delete_session(session_id, true).unwrap();
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn persistent_session_survives_cleanup() {
        let (_dir, store) = open_store();

        store.start_session("s1", true).unwrap();
        store
            .add_backup(IdentityType::Hostname, "Alpha.local", BTreeMap::new())
            .unwrap();
        store.complete_session().unwrap();

        let eligible = store.cleanup(Duration::seconds(-1), false).unwrap();
        assert!(eligible.is_empty());
        assert_eq!(store.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn non_persistent_expired_backup_is_cleaned_up() {
        let (_dir, store) = open_store();

        store.start_session("s1", false).unwrap();
        store
            .add_backup(IdentityType::Hostname, "Alpha.local", BTreeMap::new())
            .unwrap();
        store.complete_session().unwrap();

        let eligible = store.cleanup(Duration::seconds(-1), true).unwrap();
        assert_eq!(eligible.len(), 1);
        // dry-run: still present
        assert_eq!(store.list_backups().unwrap().len(), 1);

        store.cleanup(Duration::seconds(-1), false).unwrap();
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn restore_missing_backup_fails_with_not_found() {
        let (_dir, store) = open_store();
        let err = store
            .restore_from_backup(Uuid::new_v4(), &NoopRestorer)
            .unwrap_err();
        assert!(matches!(err, BackupError::BackupNotFound(_)));
    }

    #[test]
    fn restore_failure_does_not_delete_backup() {
        struct AlwaysFails;
        impl IdentityRestorer for AlwaysFails {
            fn restore(&self, _: IdentityType, _: &str) -> Result<(), String> {
                Err("permission denied".to_string())
            }
        }

        let (_dir, store) = open_store();
        let id = store
            .create_backup(IdentityType::Hostname, "Alpha.local", "s1")
            .unwrap();

        let err = store.restore_from_backup(id, &AlwaysFails).unwrap_err();
        assert!(matches!(err, BackupError::RestoreFailed { .. }));

        // Still present after a failed restore.
        assert!(store.find_backup(id).is_ok());
    }

    #[test]
    fn restore_session_restores_in_reverse_order() {
        let (_dir, store) = open_store();

        store.start_session("s1", false).unwrap();
        store
            .add_backup(IdentityType::Hostname, "first", BTreeMap::new())
            .unwrap();
        store
            .add_backup(IdentityType::MacAddress, "aa:bb:cc:dd:ee:ff", BTreeMap::new())
            .unwrap();
        let session_id = store.complete_session().unwrap();

        let order = std::sync::Mutex::new(Vec::new());
        struct Recording<'a>(&'a std::sync::Mutex<Vec<IdentityType>>);
        impl IdentityRestorer for Recording<'_> {
            fn restore(&self, identity_type: IdentityType, _: &str) -> Result<(), String> {
                self.0.lock().unwrap().push(identity_type);
                Ok(())
            }
        }

        store
            .restore_session(session_id, &Recording(&order))
            .unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec![IdentityType::MacAddress, IdentityType::Hostname]
        );
    }

    #[test]
    fn corrupt_record_does_not_lose_other_backups() {
        let (_dir, store) = open_store();

        let good_id = store
            .create_backup(IdentityType::Hostname, "Alpha.local", "s1")
            .unwrap();

        let reports = store.validate_integrity(None).unwrap();
        assert!(reports.iter().all(|r| r.is_valid));
        assert!(reports.iter().any(|r| r.id == good_id));
    }
}
