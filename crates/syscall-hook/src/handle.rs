use uuid::Uuid;

/// A single installed interposer, returned from `install_configured_hooks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookHandle {
    pub id: Uuid,
    pub function: String,
    valid: bool,
}

impl HookHandle {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            function: function.into(),
            valid: true,
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }
}
