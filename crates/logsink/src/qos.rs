use std::fmt;

use serde::{Deserialize, Serialize};

/// Advisory scheduling priority for a sink's worker thread.
///
/// The standard library has no portable thread priorities, so the value only
/// ends up in the worker's thread name. Nothing about ordering or delivery
/// depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityOfService {
    /// Work the user does not see.
    Background,
    /// Long-running work with progress the user may look at.
    Utility,
    /// Work the user started and is waiting on.
    #[default]
    UserInitiated,
    /// Work tied to what the user is doing right now.
    UserInteractive,
}

impl QualityOfService {
    /// Kebab-case name, as used in configuration and thread names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Utility => "utility",
            Self::UserInitiated => "user-initiated",
            Self::UserInteractive => "user-interactive",
        }
    }
}

impl fmt::Display for QualityOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
