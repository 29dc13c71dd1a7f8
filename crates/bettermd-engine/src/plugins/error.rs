use std::fmt;

use thiserror::Error;

/// A plugin lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Init,
    Enable,
    Disable,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Init => "init",
            Hook::Enable => "enable",
            Hook::Disable => "disable",
        };
        f.write_str(name)
    }
}

/// Failure reported by a plugin's own hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("Plugin not found: {0}")]
    NotFound(String),
    #[error("Plugin '{id}' {hook} hook failed: {source}")]
    HookFailed {
        id: String,
        hook: Hook,
        #[source]
        source: HookError,
    },
}
