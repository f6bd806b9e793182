//! miette rendering for [`StrataError`].
//!
//! A parse error expands into one report per parser diagnostic, warnings
//! included. Every other error is a single report without a snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity, SourceCode, SourceSpan};

use strata::StrataError;
use strata_parser::{Span, error::Diagnostic};

/// One report handed to a miette handler.
pub enum Reportable<'a> {
    /// A parser diagnostic, with the document text it points into.
    Diagnostic { diag: &'a Diagnostic, src: &'a str },
    /// Any other failure.
    Error(&'a StrataError),
}

impl Reportable<'_> {
    /// Documents built in memory carry no text to draw snippets from.
    fn has_source(&self) -> bool {
        matches!(self, Reportable::Diagnostic { src, .. } if !src.is_empty())
    }
}

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic { diag, .. } => f.debug_tuple("Diagnostic").field(diag).finish(),
            Reportable::Error(err) => f.debug_tuple("Error").field(err).finish(),
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic { diag, .. } => f.write_str(diag.message()),
            Reportable::Error(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic { .. } => None,
            Reportable::Error(err) => std::error::Error::source(*err),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code: Box<dyn fmt::Display> = match self {
            Reportable::Diagnostic { diag, .. } => Box::new(diag.code()?),
            Reportable::Error(StrataError::Parse { .. }) => return None,
            Reportable::Error(StrataError::Io(_)) => Box::new("strata::io"),
            Reportable::Error(StrataError::Configuration(_)) => Box::new("strata::configuration"),
            Reportable::Error(StrataError::GraphCycle { .. }) => Box::new("strata::graph_cycle"),
            Reportable::Error(StrataError::DegenerateGeometry { .. }) => {
                Box::new("strata::geometry")
            }
            Reportable::Error(StrataError::Export(_)) => Box::new("strata::export"),
        };
        Some(code)
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Diagnostic { diag, .. } if diag.severity().is_warning() => {
                Some(Severity::Warning)
            }
            _ => Some(Severity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            Reportable::Diagnostic { diag, .. } => diag.help()?,
            Reportable::Error(StrataError::GraphCycle { .. }) => {
                "every dependency must point from an earlier step to a later one"
            }
            Reportable::Error(StrataError::DegenerateGeometry { .. }) => {
                "increase `layout.level_gap_x` so that levels do not touch"
            }
            Reportable::Error(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Reportable::Diagnostic { src, .. } if self.has_source() => Some(src as &dyn SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() || !self.has_source() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let message = Some(label.message().to_string());
            let span = to_source_span(label.span());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Splits `err` into the reports to print, in order.
pub fn to_reportables(err: &StrataError) -> Vec<Reportable<'_>> {
    match err {
        StrataError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Diagnostic { diag, src })
            .collect(),
        _ => vec![Reportable::Error(err)],
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}
