//! Semantic pipeline model types.
//!
//! This module contains the semantic representation of a pipeline after the
//! document has been parsed and its three dependency declaration styles have
//! been merged.
//!
//! # Pipeline Position
//!
//! ```text
//! YAML Document
//!     ↓ strata-parser
//! Semantic Model (these types) - unique names, canonical dependency mapping
//!     ↓ structure
//! Pipeline Graph (index arena)
//!     ↓ layout
//! Levels → Positioned Nodes → Arrow Routes
//!     ↓ export
//! SVG / HTML
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Canonical dependency mapping: parent name to the set of children that
/// must run after it.
pub type Dependencies = BTreeMap<String, BTreeSet<String>>;

/// A single step of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    name: String,
}

impl Node {
    /// Creates a node; surrounding whitespace of the name is discarded.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
        }
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node<{}>", self.name)
    }
}

/// A named pipeline: declared nodes plus the canonical dependency mapping.
///
/// Two pipelines are equal when their names, their *sets* of node names and
/// their dependency mappings are equal. Declaration order does not matter.
///
/// # Examples
///
/// ```
/// use strata_core::semantic::{Node, Pipeline};
///
/// let a = Pipeline::new("pipe", vec![Node::new("A"), Node::new("B")], Default::default())
///     .with_dependency("A", "B");
/// let b = Pipeline::new("pipe", vec![Node::new("B"), Node::new("A")], Default::default())
///     .with_dependency("A", "B");
///
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    name: String,
    nodes: Vec<Node>,
    dependencies: Dependencies,
}

impl Pipeline {
    /// Creates a pipeline from its parts.
    ///
    /// No validation happens here: undeclared references are reported when
    /// the pipeline graph is built. Parents with an empty set of children are
    /// dropped so that the mapping stays canonical.
    pub fn new(name: impl Into<String>, nodes: Vec<Node>, mut dependencies: Dependencies) -> Self {
        dependencies.retain(|_, children| !children.is_empty());
        Self {
            name: name.into(),
            nodes,
            dependencies,
        }
    }

    /// Adds the edge `parent → child` (builder style).
    pub fn with_dependency(mut self, parent: impl AsRef<str>, child: impl AsRef<str>) -> Self {
        self.add_dependency(parent, child);
        self
    }

    /// Adds the edge `parent → child`. Adding an existing edge is a no-op.
    pub fn add_dependency(&mut self, parent: impl AsRef<str>, child: impl AsRef<str>) {
        self.dependencies
            .entry(parent.as_ref().trim().to_string())
            .or_default()
            .insert(child.as_ref().trim().to_string());
    }

    /// Returns the pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the canonical dependency mapping.
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    /// Iterates over every `(parent, child)` edge in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    /// Returns the node names as a set.
    pub fn node_names(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(Node::name).collect()
    }
}

impl PartialEq for Pipeline {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.node_names() == other.node_names()
            && self.dependencies == other.dependencies
    }
}

impl Eq for Pipeline {}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipeline<{}>", self.name)
    }
}

/// What to do with a dependency that names a node which was never declared.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UndeclaredNodePolicy {
    /// Reject the pipeline (default)
    #[default]
    Error,
    /// Declare the referenced node implicitly
    Implicit,
}

impl FromStr for UndeclaredNodePolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "implicit" => Ok(Self::Implicit),
            _ => Err("Unsupported undeclared node policy"),
        }
    }
}

impl From<UndeclaredNodePolicy> for &'static str {
    fn from(val: UndeclaredNodePolicy) -> Self {
        match val {
            UndeclaredNodePolicy::Error => "error",
            UndeclaredNodePolicy::Implicit => "implicit",
        }
    }
}
