//! Turns a [`PipelineDocument`] into a validated [`Pipeline`].
//!
//! The explicit `dependencies` mapping, per-node `nexts` and per-node
//! `depends` are unioned into one canonical mapping. Every problem found on
//! the way is reported, not only the first.

use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace};

use strata_core::semantic::{Dependencies, Node, Pipeline, UndeclaredNodePolicy};

use crate::{
    document::PipelineDocument,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Options that change how a document is turned into a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// What to do with dependencies on nodes that were never declared.
    pub undeclared: UndeclaredNodePolicy,
}

impl ParseConfig {
    pub fn new(undeclared: UndeclaredNodePolicy) -> Self {
        Self { undeclared }
    }
}

pub(crate) struct Builder<'a> {
    cfg: ParseConfig,
    locator: SourceLocator<'a>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Builder<'a> {
    /// `source` is the text the document was read from, if any. It is only
    /// used to point diagnostics at the offending names.
    pub fn new(cfg: ParseConfig, source: Option<&'a str>) -> Self {
        Self {
            cfg,
            locator: SourceLocator { source },
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub fn build(mut self, document: &PipelineDocument) -> Result<Pipeline, ParseError> {
        debug!("Building pipeline from document");

        let name = self.pipeline_name(document);
        let mut declared = self.declare_nodes(document);
        let edges = self.collect_edges(document);
        trace!(nodes = declared.len(), edges = edges.len(); "Document collected");

        self.check_references(&mut declared, &edges);
        self.diagnostics.finish()?;

        let mut dependencies = Dependencies::new();
        for (parent, child) in edges {
            dependencies.entry(parent).or_default().insert(child);
        }

        let nodes: Vec<Node> = declared.iter().map(Node::new).collect();
        info!(pipeline = name.as_str(), nodes = nodes.len(); "Pipeline built");
        Ok(Pipeline::new(name, nodes, dependencies))
    }

    fn pipeline_name(&mut self, document: &PipelineDocument) -> String {
        let name = document.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            self.diagnostics.emit(
                Diagnostic::error("pipeline has no name")
                    .with_code(ErrorCode::E100)
                    .with_help("add a top-level `name: <pipeline name>` entry"),
            );
        }
        name.to_string()
    }

    /// Returns the trimmed node names in declaration order.
    fn declare_nodes(&mut self, document: &PipelineDocument) -> IndexSet<String> {
        let mut declared = IndexSet::new();
        // Declarations seen per name, to locate the nth one in the source
        let mut seen: IndexMap<&str, usize> = IndexMap::new();

        for entry in &document.nodes {
            let name = entry.name.trim();
            let occurrence = seen.entry(name).or_default();
            let current = *occurrence;
            *occurrence += 1;

            if name.is_empty() {
                self.diagnostics.emit(
                    Diagnostic::error("node name is empty")
                        .with_code(ErrorCode::E101)
                        .with_help("every node needs a non-blank `name`"),
                );
                continue;
            }

            if !declared.insert(name.to_string()) {
                let mut diag = Diagnostic::error(format!("node `{name}` is declared more than once"))
                    .with_code(ErrorCode::E102)
                    .with_help("node names must be unique within a pipeline");
                if let Some(span) = self.locator.declaration(name, current) {
                    diag = diag.with_label(span, "duplicate declaration");
                }
                if let Some(span) = self.locator.declaration(name, 0) {
                    diag = diag.with_secondary_label(span, "first declared here");
                }
                self.diagnostics.emit(diag);
            }
        }

        declared
    }

    /// Returns every distinct `(parent, child)` edge in first-declaration
    /// order: explicit mapping first, then the per-node forms.
    ///
    /// An edge may appear in several forms. Only a repeat within the same
    /// list is reported.
    fn collect_edges(&mut self, document: &PipelineDocument) -> IndexSet<(String, String)> {
        let mut raw: Vec<(EdgeSource<'_>, &str, &str)> = Vec::new();
        for (parent, children) in &document.dependencies {
            let source = EdgeSource::Mapping(parent.as_str());
            raw.extend(children.iter().map(|child| (source, parent.as_str(), child)));
        }
        for (idx, entry) in document.nodes.iter().enumerate() {
            raw.extend(
                entry
                    .nexts
                    .iter()
                    .map(|child| (EdgeSource::Nexts(idx), entry.name.as_str(), child.as_str())),
            );
            raw.extend(
                entry
                    .depends
                    .iter()
                    .map(|parent| (EdgeSource::Depends(idx), parent.as_str(), entry.name.as_str())),
            );
        }

        let mut edges = IndexSet::new();
        let mut listed = HashSet::new();
        for (source, parent, child) in raw {
            let (parent, child) = (parent.trim(), child.trim());
            if parent.is_empty() || child.is_empty() {
                self.diagnostics.emit(
                    Diagnostic::error("dependency refers to an empty node name")
                        .with_code(ErrorCode::E101)
                        .with_help("remove the blank entry"),
                );
                continue;
            }

            if !listed.insert((source, parent, child)) {
                self.diagnostics.emit(
                    Diagnostic::warning(format!(
                        "dependency `{parent}` -> `{child}` is listed more than once in `{}`",
                        source.key()
                    ))
                    .with_code(ErrorCode::E103),
                );
            }
            edges.insert((parent.to_string(), child.to_string()));
        }

        edges
    }

    fn check_references(
        &mut self,
        declared: &mut IndexSet<String>,
        edges: &IndexSet<(String, String)>,
    ) {
        let mut reported = BTreeSet::new();

        for name in edges.iter().flat_map(|(parent, child)| [parent, child]) {
            if declared.contains(name) {
                continue;
            }

            match self.cfg.undeclared {
                UndeclaredNodePolicy::Implicit => {
                    debug!(node = name.as_str(); "Declaring referenced node implicitly");
                    declared.insert(name.clone());
                }
                UndeclaredNodePolicy::Error => {
                    if !reported.insert(name.as_str()) {
                        continue;
                    }
                    let mut diag = Diagnostic::error(format!("node `{name}` is not declared"))
                        .with_code(ErrorCode::E200)
                        .with_help(format!("add `- name: {name}` to `nodes`"));
                    if let Some(span) = self.locator.reference(name) {
                        diag = diag.with_label(span, "referenced here");
                    }
                    self.diagnostics.emit(diag);
                }
            }
        }
    }
}

/// The list an edge was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeSource<'a> {
    /// A parent's entry in the `dependencies` mapping.
    Mapping(&'a str),
    /// The `nexts` of the node at this position.
    Nexts(usize),
    /// The `depends` of the node at this position.
    Depends(usize),
}

impl EdgeSource<'_> {
    fn key(self) -> &'static str {
        match self {
            EdgeSource::Mapping(_) => "dependencies",
            EdgeSource::Nexts(_) => "nexts",
            EdgeSource::Depends(_) => "depends",
        }
    }
}

/// Finds node names in the document text.
///
/// The structured document carries no positions, so names are located by
/// searching the source for whole-word occurrences.
struct SourceLocator<'a> {
    source: Option<&'a str>,
}

impl SourceLocator<'_> {
    /// Span of the `nth` (0-based) `name: <name>` declaration.
    fn declaration(&self, name: &str, nth: usize) -> Option<Span> {
        let source = self.source?;
        self.occurrences(name)
            .filter(|span| {
                let line_start = source[..span.start()].rfind('\n').map_or(0, |i| i + 1);
                let prefix = source[line_start..span.start()].trim_end();
                let prefix = prefix.trim_end_matches(['"', '\'']).trim_end();
                prefix.ends_with("name:")
            })
            .nth(nth)
    }

    /// Span of the first occurrence of `name`.
    fn reference(&self, name: &str) -> Option<Span> {
        self.occurrences(name).next()
    }

    fn occurrences<'s>(&'s self, name: &'s str) -> impl Iterator<Item = Span> + 's {
        let source = self.source.unwrap_or_default();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';

        source
            .match_indices(name)
            .filter(move |(start, _)| {
                let end = start + name.len();
                let before = source[..*start].chars().next_back();
                let after = source[end..].chars().next();
                !name.is_empty() && !before.is_some_and(is_word) && !after.is_some_and(is_word)
            })
            .map(move |(start, _)| Span::new(start..start + name.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;
    use crate::document::{NodeEntry, OneOrMany};

    fn build(document: &PipelineDocument, policy: UndeclaredNodePolicy) -> Result<Pipeline, ParseError> {
        Builder::new(ParseConfig::new(policy), None).build(document)
    }

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.diagnostics().iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_styles_are_unioned() {
        let document = PipelineDocument::new("pipe")
            .with_node(NodeEntry::new("A").with_nexts(["B"]))
            .with_node(NodeEntry::new("B"))
            .with_node(NodeEntry::new("C").with_depends(["B"]))
            .with_dependencies("A", ["C"]);

        let pipeline = build(&document, UndeclaredNodePolicy::Error).unwrap();
        let edges: Vec<_> = pipeline.edges().collect();
        assert_eq!(edges, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut document = PipelineDocument::new("  pipe ")
            .with_node(NodeEntry::new(" A ").with_nexts(["B "]))
            .with_node(NodeEntry::new("B"));
        document
            .dependencies
            .insert(" A".to_string(), OneOrMany::One("B".to_string()));

        let pipeline = build(&document, UndeclaredNodePolicy::Error).unwrap();
        assert_eq!(pipeline.name(), "pipe");
        assert_eq!(pipeline.edges().collect::<Vec<_>>(), vec![("A", "B")]);
    }

    #[test]
    fn test_every_problem_is_reported() {
        let document = PipelineDocument::default()
            .with_node(NodeEntry::new("A").with_nexts(["X", "Y"]))
            .with_node(NodeEntry::new("  "))
            .with_node(NodeEntry::new("A "));

        let err = build(&document, UndeclaredNodePolicy::Error).unwrap_err();
        assert_eq!(
            codes(&err),
            vec![
                ErrorCode::E100,
                ErrorCode::E101,
                ErrorCode::E102,
                ErrorCode::E200,
                ErrorCode::E200
            ]
        );
    }

    #[test]
    fn test_undeclared_reference_reported_once() {
        let document = PipelineDocument::new("pipe")
            .with_node(NodeEntry::new("A").with_nexts(["X"]))
            .with_node(NodeEntry::new("B").with_nexts(["X"]));

        let err = build(&document, UndeclaredNodePolicy::Error).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E200]);
    }

    #[test]
    fn test_implicit_policy_appends_nodes_in_reference_order() {
        let document = PipelineDocument::new("pipe")
            .with_node(NodeEntry::new("A").with_nexts(["Z", "Y"]))
            .with_dependencies("W", ["A"]);

        let pipeline = build(&document, UndeclaredNodePolicy::Implicit).unwrap();
        let names: Vec<_> = pipeline.nodes().iter().map(Node::name).collect();
        assert_eq!(names, vec!["A", "W", "Z", "Y"]);
    }

    #[test]
    fn test_redundant_edge_is_only_a_warning() {
        let document = PipelineDocument::new("pipe")
            .with_node(NodeEntry::new("A").with_nexts(["B"]))
            .with_node(NodeEntry::new("B").with_depends(["A"]));

        let pipeline = build(&document, UndeclaredNodePolicy::Error).unwrap();
        assert_eq!(pipeline.edges().count(), 1);
    }

    #[test]
    fn test_edge_in_several_forms_is_not_reported() {
        let document = PipelineDocument::default()
            .with_node(NodeEntry::new("A").with_nexts(["B"]))
            .with_node(NodeEntry::new("B").with_depends(["A"]))
            .with_dependencies("A", ["B"]);

        let err = build(&document, UndeclaredNodePolicy::Error).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E100]);
    }

    #[test]
    fn test_edge_repeated_in_one_list_is_reported() {
        let document = PipelineDocument::default()
            .with_node(NodeEntry::new("A").with_nexts(["B", "B "]))
            .with_node(NodeEntry::new("B").with_depends(["A"]))
            .with_dependencies("A", ["B", "B"]);

        let err = build(&document, UndeclaredNodePolicy::Error).unwrap_err();
        assert_eq!(
            codes(&err),
            vec![ErrorCode::E100, ErrorCode::E103, ErrorCode::E103]
        );
        let messages: Vec<_> = err.diagnostics().iter().map(Diagnostic::message).collect();
        assert!(messages[1].ends_with("more than once in `dependencies`"));
        assert!(messages[2].ends_with("more than once in `nexts`"));
    }

    #[test]
    fn test_locator_finds_declarations() {
        let source = "name: p\nnodes:\n  - name: A\n    nexts: [AB]\n  - name: 'A'\n";
        let locator = SourceLocator {
            source: Some(source),
        };

        let first = locator.declaration("A", 0).unwrap();
        assert_eq!(&source[Range::from(first)], "A");
        assert_eq!(first.start(), source.find("name: A").unwrap() + 6);

        let second = locator.declaration("A", 1).unwrap();
        assert!(second.start() > source.find("AB").unwrap());

        assert_eq!(locator.reference("AB").unwrap().len(), 2);
        assert!(locator.reference("C").is_none());
    }
}
