//! Diagnostics reported while reading a pipeline document.
//!
//! A [`Diagnostic`] is a single error or warning with an optional
//! [`ErrorCode`], labelled source spans and help text. Every problem found in
//! a document is collected, and the whole batch is returned as a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use strata_parser::error::{Diagnostic, ErrorCode};
//! # use strata_parser::Span;
//!
//! let diag = Diagnostic::error("node `Load` is declared more than once")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(40..44), "duplicate declaration")
//!     .with_help("rename one of the nodes");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
