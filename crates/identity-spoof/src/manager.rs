use crate::bindings::SpoofedValueBindings;
use crate::error::SpoofError;
use crate::hardware::HardwareIdentifierEngine;
use identity_backup::{IdentityBackup, IdentityBackupStore, IdentityRestorer, IdentityType};
use std::sync::Arc;
use uuid::Uuid;

/// Mediates identity mutations: owns the live bindings, and asks the
/// Identity Backup Store to record the original before every mutation.
pub struct IdentitySpoofingManager {
    engine: Arc<dyn HardwareIdentifierEngine>,
    store: Arc<IdentityBackupStore>,
    bindings: SpoofedValueBindings,
}

impl IdentitySpoofingManager {
    pub fn new(engine: Arc<dyn HardwareIdentifierEngine>, store: Arc<IdentityBackupStore>) -> Self {
        Self {
            engine,
            store,
            bindings: SpoofedValueBindings::new(),
        }
    }

    /// The shared-immutable binding snapshot consulted by interposers.
    pub fn bindings_snapshot(&self) -> std::sync::Arc<std::collections::HashMap<IdentityType, String>> {
        self.bindings.snapshot()
    }

    pub fn current_value(&self, identity_type: IdentityType) -> Result<String, SpoofError> {
        if let Some(spoofed) = self.bindings.get(identity_type) {
            return Ok(spoofed);
        }
        self.engine.current_value(identity_type)
    }

    /// Validates `new_value`, records the pre-spoof value in `session`,
    /// installs the binding, and returns the new backup id.
    pub fn spoof(
        &self,
        identity_type: IdentityType,
        new_value: &str,
        session: &str,
    ) -> Result<Uuid, SpoofError> {
        identity_type
            .validate_value(new_value)
            .map_err(|reason| SpoofError::InvalidValue {
                identity_type: identity_type.as_str().to_string(),
                value: new_value.to_string(),
                reason,
            })?;

        let original = self.current_value(identity_type)?;
        let backup_id = self
            .store
            .create_backup(identity_type, &original, session)?;

        self.bindings.install(identity_type, new_value.to_string());
        tracing::info!(?identity_type, %backup_id, "Installed identity spoof binding");

        Ok(backup_id)
    }

    /// Reinstates the pre-spoof value for the backup's identity type and
    /// removes the binding.
    pub fn rollback(&self, backup_id: Uuid) -> Result<IdentityBackup, SpoofError> {
        Ok(self.store.restore_from_backup(backup_id, self)?)
    }
}

impl IdentityRestorer for IdentitySpoofingManager {
    fn restore(&self, identity_type: IdentityType, _original_value: &str) -> Result<(), String> {
        self.bindings.remove(identity_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::HardwareIdentifierEngine;
    use tempfile::tempdir;

    struct FixedEngine;
    impl HardwareIdentifierEngine for FixedEngine {
        fn current_value(&self, identity_type: IdentityType) -> Result<String, SpoofError> {
            Ok(match identity_type {
                IdentityType::Hostname => "Alpha.local".to_string(),
                _ => "unset".to_string(),
            })
        }
    }

    fn manager() -> (tempfile::TempDir, IdentitySpoofingManager) {
        let dir = tempdir().unwrap();
        let store = Arc::new(IdentityBackupStore::open(dir.path()).unwrap());
        let manager = IdentitySpoofingManager::new(Arc::new(FixedEngine), store);
        (dir, manager)
    }

    #[test]
    fn spoof_then_rollback_restores_pre_spoof_value() {
        let (_dir, manager) = manager();

        let backup_id = manager
            .spoof(IdentityType::Hostname, "ghost", "s1")
            .unwrap();
        assert_eq!(manager.current_value(IdentityType::Hostname).unwrap(), "ghost");

        manager.rollback(backup_id).unwrap();
        assert_eq!(
            manager.current_value(IdentityType::Hostname).unwrap(),
            "Alpha.local"
        );
    }

    #[test]
    fn spoof_rejects_invalid_value() {
        let (_dir, manager) = manager();
        let err = manager
            .spoof(IdentityType::MacAddress, "not-a-mac", "s1")
            .unwrap_err();
        assert!(matches!(err, SpoofError::InvalidValue { .. }));
    }
}
