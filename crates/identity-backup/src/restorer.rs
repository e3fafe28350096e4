use crate::identity::IdentityType;

/// Callback the store uses to reinstate an original value on the live
/// system. Implemented by the Identity Spoofing Manager; kept as a trait
/// here so this crate has no dependency on `identity-spoof`, breaking what
/// would otherwise be a cyclic reference (the Backup Store is the
/// authoritative owner, the Manager only gets a reference to this trait's
/// consumer).
pub trait IdentityRestorer {
    fn restore(&self, identity_type: IdentityType, original_value: &str) -> Result<(), String>;
}

/// A restorer that always succeeds, for tests that only care about the
/// store's own bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRestorer;

impl IdentityRestorer for NoopRestorer {
    fn restore(&self, _identity_type: IdentityType, _original_value: &str) -> Result<(), String> {
        Ok(())
    }
}
