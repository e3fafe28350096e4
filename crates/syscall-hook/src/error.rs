use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("`{0}` is not a recognized interposable function")]
    UnknownFunction(String),

    #[error("hook installation failed for `{function}`: {reason}")]
    HookInstallFailed { function: String, reason: String },

    #[error("this platform does not support library-preload injection")]
    UnsupportedPlatform,
}

impl HookError {
    pub fn troubleshooting(&self) -> String {
        match self {
            Self::UnknownFunction(name) => format!(
                "`{name}` is not one of the interposable functions this build supports. \
                 Run `hook list` to see the recognized set."
            ),
            Self::HookInstallFailed { function, reason } => format!(
                "Installing the `{function}` hook failed ({reason}). Any hooks already \
                 installed for this process were rolled back; retry after addressing the cause."
            ),
            Self::UnsupportedPlatform => {
                "This host does not support library-preload injection, or its major version is \
                 below the supported minimum. Syscall interception is unavailable here."
                    .to_string()
            }
        }
    }
}
