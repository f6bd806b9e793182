//! Error types for Strata operations.
//!
//! [`StrataError`] covers every way turning a pipeline into a drawing can
//! fail, from reading the document to writing the output file.

use std::io;

use thiserror::Error;

use strata_parser::error::ParseError;

/// The main error type for Strata operations.
///
/// The `Parse` variant keeps the document source so that callers can render
/// the parser diagnostics against it.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pipeline has a dependency cycle through: {}", nodes.join(", "))]
    GraphCycle { nodes: Vec<String> },

    #[error("Arrow from `{parent}` to `{child}` has zero length")]
    DegenerateGeometry { parent: String, child: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for StrataError {
    fn from(error: crate::export::Error) -> Self {
        match error {
            crate::export::Error::Io(err) => Self::Io(err),
            other => Self::Export(Box::new(other)),
        }
    }
}

impl StrataError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_cycle_message_lists_nodes() {
        let err = StrataError::GraphCycle {
            nodes: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Pipeline has a dependency cycle through: A, B"
        );
    }

    #[test]
    fn test_export_errors_convert() {
        let err: StrataError = crate::export::Error::Render("no styles".to_string()).into();
        assert_eq!(err.to_string(), "Export error: Render error: no styles");

        let err: StrataError =
            crate::export::Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                .into();
        assert!(matches!(err, StrataError::Io(_)));
    }

    #[test]
    fn test_io_error_converts() {
        let err: StrataError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, StrataError::Io(_)));
    }
}
