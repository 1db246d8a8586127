//! Outcome status protocol shared with the upstream task manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of processing a single task.
///
/// A closed 7-value set with stable integer codes. Producers attach exactly
/// one status per task result; consumers branch only on these values, never
/// on free-form error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// The status is unknown. Processing has not started yet.
    Unknown = 0,
    /// Everything went well.
    Ok = 1,
    /// A catastrophic error that could not be recovered from.
    Error = 2,
    /// Something is a bit fishy. Maybe try again with a different algorithm?
    Warning = 3,
    /// Processing was aborted.
    Abort = 4,
    /// The target was skipped because the algorithm found that to be the
    /// best solution.
    Skipped = 5,
    /// Processing has started but not yet finished.
    Started = 6,
}

impl Status {
    /// Stable integer code used on the wire to the task manager.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code back into a status.
    ///
    /// Returns `None` for codes outside the closed set.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Ok),
            2 => Some(Self::Error),
            3 => Some(Self::Warning),
            4 => Some(Self::Abort),
            5 => Some(Self::Skipped),
            6 => Some(Self::Started),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Ok => "OK",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Abort => "ABORT",
            Self::Skipped => "SKIPPED",
            Self::Started => "STARTED",
        };
        f.write_str(name)
    }
}
