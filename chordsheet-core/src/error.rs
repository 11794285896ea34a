use std::fmt;

/// Errors raised by the parsing entry points of the core.
///
/// Sheet transposition itself never fails: unrecognized text is passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransposeError {
    /// A root spelling that names none of the 12 pitch classes (e.g. `H`, `Cx`)
    UnknownRoot(String),
    /// A stored song key that could not be resolved to a pitch class
    UnknownKey(String),
}

impl fmt::Display for TransposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransposeError::UnknownRoot(root) => write!(f, "Unknown chord root '{}'", root),
            TransposeError::UnknownKey(key) => write!(f, "Unknown key '{}'", key),
        }
    }
}

impl std::error::Error for TransposeError {}
