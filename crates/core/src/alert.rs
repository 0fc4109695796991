//! Error severity levels used by the error reporter.
//!
//! Every severity is logged. `High` and `Critical` also send an alert email
//! to the operator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgently an operational error needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether this severity triggers an alert email.
    pub fn sends_alert(self) -> bool {
        self >= Self::High
    }

    /// Header colour used in the alert email.
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#3b82f6",
            Self::Medium => "#f59e0b",
            Self::High => "#ef4444",
            Self::Critical => "#dc2626",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
