use thiserror::Error;

/// Errors surfaced by configuration and profile management.
///
/// Every variant carries enough context to print an operator-readable
/// troubleshooting paragraph via [`ConfigError::troubleshooting`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration key path `{0}`")]
    UnknownKeyPath(String),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("profile `{0}` does not exist")]
    ProfileNotFound(String),

    #[error("failed to switch to profile `{0}`: {reason}")]
    ProfileSwitchFailed { name: String, reason: String },

    #[error("the default profile cannot be deleted")]
    DefaultProfileImmutable,

    #[error("profile `{0}` already exists")]
    ProfileAlreadyExists(String),
}

impl ConfigError {
    /// An operator-readable paragraph enumerating concrete next steps.
    pub fn troubleshooting(&self) -> String {
        match self {
            ConfigError::UnknownKeyPath(key) => format!(
                "The key path `{key}` is not a recognized configuration option. \
                 Run `config list` to see all recognized key paths, check for typos, \
                 and verify you are not using a key from a newer release."
            ),
            ConfigError::InvalidValue { key, reason } => format!(
                "The value supplied for `{key}` was rejected ({reason}). \
                 Run `config get {key}` to see the current value and its expected \
                 format, then retry with `--dry-run` to validate before applying."
            ),
            ConfigError::ProfileNotFound(name) => format!(
                "No profile named `{name}` exists. Run `profile list` to see \
                 available profiles, or `profile create {name} <description>` to \
                 create it."
            ),
            ConfigError::ProfileSwitchFailed { name, reason } => format!(
                "Switching to profile `{name}` failed ({reason}). The previously \
                 active profile remains in effect. Verify the profile's module \
                 toggles are internally consistent and retry."
            ),
            ConfigError::DefaultProfileImmutable => {
                "The `default` profile always exists and cannot be deleted. \
                 Create and switch to a different profile first if you want to \
                 reconfigure from scratch."
                    .to_string()
            }
            ConfigError::ProfileAlreadyExists(name) => format!(
                "A profile named `{name}` already exists. Choose a different \
                 name or delete the existing profile first."
            ),
        }
    }
}
