//! Error codes for the Strata diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Document errors (YAML syntax, document shape)
//! - `E1xx` - Declaration errors (pipeline and node names)
//! - `E2xx` - Reference errors (dependency targets)

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Invalid document.
    ///
    /// The input is not valid YAML, or it does not have the shape of a
    /// pipeline document (for example `nodes` is not a list).
    E001,

    // =========================================================================
    // Declaration Errors (E1xx)
    // =========================================================================
    /// Missing pipeline name.
    ///
    /// The document has no `name` key, or its value is blank.
    E100,

    /// Empty node name.
    ///
    /// A node entry has a name that is empty once surrounding whitespace is
    /// removed.
    E101,

    /// Duplicate node.
    ///
    /// Two node entries have the same name after trimming.
    E102,

    /// Redundant dependency.
    ///
    /// The same edge is listed twice in one declaration form. The edge
    /// counts once; this code is only ever reported as a warning.
    E103,

    // =========================================================================
    // Reference Errors (E2xx)
    // =========================================================================
    /// Undeclared node reference.
    ///
    /// A dependency names a node that is not declared in `nodes`.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid pipeline document",
            ErrorCode::E100 => "missing pipeline name",
            ErrorCode::E101 => "empty node name",
            ErrorCode::E102 => "duplicate node",
            ErrorCode::E103 => "redundant dependency",
            ErrorCode::E200 => "undeclared node",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
