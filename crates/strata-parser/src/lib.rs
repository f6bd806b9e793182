//! # Strata Parser
//!
//! Reads a YAML pipeline document and turns it into a validated
//! [`Pipeline`](strata_core::semantic::Pipeline).
//!
//! ## Usage
//!
//! ```
//! # use strata_parser::{parse, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! name: etl
//! nodes:
//!   - name: Extract
//!     nexts: [Load]
//!   - name: Load
//! "#;
//!
//!     let pipeline = parse(source, ParseConfig::default())?;
//!     assert_eq!(pipeline.name(), "etl");
//!     Ok(())
//! }
//! ```

mod document;
mod elaborate;
pub mod error;
mod span;

pub use document::{NodeEntry, OneOrMany, PipelineDocument};
pub use elaborate::ParseConfig;
pub use error::ParseError;
pub use span::Span;

use log::debug;

use strata_core::semantic::Pipeline;

use elaborate::Builder;
use error::{Diagnostic, ErrorCode};

/// Parse YAML source text into a pipeline.
///
/// 1. **Deserialize** - YAML into a [`PipelineDocument`]
/// 2. **Elaborate** - merge the dependency styles and validate names
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic found. Malformed YAML
/// stops at the first syntax error (`E001`).
pub fn parse(source: &str, config: ParseConfig) -> Result<Pipeline, ParseError> {
    debug!(len = source.len(); "Parsing pipeline document");

    let document: PipelineDocument =
        serde_yaml::from_str(source).map_err(|err| document_error(source, &err))?;

    Builder::new(config, Some(source)).build(&document)
}

/// Build a pipeline from an already structured document.
///
/// Same validation as [`parse`], but diagnostics carry no source labels.
///
/// # Example
///
/// ```
/// # use strata_parser::{build, NodeEntry, ParseConfig, PipelineDocument};
/// let document = PipelineDocument::new("pipe")
///     .with_node(NodeEntry::new("A").with_nexts(["B"]))
///     .with_node(NodeEntry::new("B"));
///
/// let pipeline = build(&document, ParseConfig::default()).unwrap();
/// assert_eq!(pipeline.edges().count(), 1);
/// ```
pub fn build(document: &PipelineDocument, config: ParseConfig) -> Result<Pipeline, ParseError> {
    Builder::new(config, None).build(document)
}

fn document_error(source: &str, err: &serde_yaml::Error) -> ParseError {
    let mut diag = Diagnostic::error(format!("invalid pipeline document: {err}"))
        .with_code(ErrorCode::E001)
        .with_help("expected a mapping with `name`, `nodes` and optional `dependencies`");

    if let Some(location) = err.location() {
        let start = location.index().min(source.len());
        // Point at the offending character, if there is one
        let end = source
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(start, |c| start + c.len_utf8());
        diag = diag.with_label(Span::new(start..end), "here");
    }

    diag.into()
}
