/// One entry in the enumerable set of interposable functions: a stable
/// textual name plus a human description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterposableFunction {
    pub name: &'static str,
    pub description: &'static str,
}

pub const INTERPOSABLE_FUNCTIONS: &[InterposableFunction] = &[
    InterposableFunction {
        name: "getuid",
        description: "Reports the calling process's real user id",
    },
    InterposableFunction {
        name: "getgid",
        description: "Reports the calling process's real group id",
    },
    InterposableFunction {
        name: "gethostname",
        description: "Reports the host's configured hostname",
    },
    InterposableFunction {
        name: "uname",
        description: "Reports kernel name, release, version, and machine identifiers",
    },
];

pub fn is_interposable(function: &str) -> bool {
    INTERPOSABLE_FUNCTIONS.iter().any(|f| f.name == function)
}
