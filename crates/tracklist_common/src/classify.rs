//! Error classification for automation engine diagnostics
//!
//! The media application only reports authorization and availability
//! problems as free text on the engine's stderr. Rules are matched in order,
//! case-insensitively, and the first match wins.

use serde::{Deserialize, Serialize};

/// Substrings that indicate automation consent was not granted
const PERMISSION_PATTERNS: &[&str] = &[
    "not authorized",
    "assistive access",
    "user canceled",
    "erraeventnotpermitted",
    "-1743",
];

/// Substrings that indicate the target application is missing or unlaunchable
const UNAVAILABLE_PATTERNS: &[&str] = &[
    "application isn't running",
    "can't be found",
    "connection is invalid",
    "couldn't launch",
];

/// Failure taxonomy for one extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Automation consent for the media application was not granted
    PermissionDenied,
    /// The media application is missing or could not be launched
    TargetUnavailable,
    /// Any other scripting failure, including spawn failures
    AutomationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission denied",
            Self::TargetUnavailable => "target unavailable",
            Self::AutomationError => "automation error",
        }
    }

    /// Process exit status surfaced to the invoking shell
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TargetUnavailable => crate::error::EXIT_TARGET_UNAVAILABLE,
            Self::PermissionDenied => crate::error::EXIT_PERMISSION_DENIED,
            Self::AutomationError => crate::error::EXIT_AUTOMATION_ERROR,
        }
    }

    /// Fixed human-readable explanation
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Not allowed to control the media application. Automation permission has not been granted."
            }
            Self::TargetUnavailable => {
                "The media application is not installed or could not be launched."
            }
            Self::AutomationError => "The automation script failed while reading the library.",
        }
    }

    /// Steps the user can take to recover, if any
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied => Some(
                "Grant automation permission to your terminal:\n  \
                 1. Open System Settings > Privacy & Security > Automation\n  \
                 2. Enable the media application under your terminal app\n  \
                 3. Re-run the export\n\
                 If no prompt ever appeared, reset the consent state with:\n  \
                 tccutil reset AppleEvents",
            ),
            Self::TargetUnavailable | Self::AutomationError => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map raw diagnostic text to an error kind
pub fn classify(diagnostic: &str) -> ErrorKind {
    let text = diagnostic.to_lowercase();

    if PERMISSION_PATTERNS.iter().any(|p| text.contains(p)) {
        ErrorKind::PermissionDenied
    } else if UNAVAILABLE_PATTERNS.iter().any(|p| text.contains(p)) {
        ErrorKind::TargetUnavailable
    } else {
        ErrorKind::AutomationError
    }
}
