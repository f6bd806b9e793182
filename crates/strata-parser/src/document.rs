//! Structured form of a pipeline document, before validation.
//!
//! These types mirror the YAML input one to one:
//!
//! ```yaml
//! name: etl
//! nodes:
//!   - name: Extract
//!     nexts: [Transform]
//!   - name: Transform
//!   - name: Load
//!     depends: [Transform]
//! dependencies:
//!   Extract: Audit        # a single child
//!   Transform: [Audit]    # or a list of children
//! ```
//!
//! No name is checked here; [`build`](crate::build) does that.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A pipeline document as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    /// Explicit `parent → children` mapping, in document order.
    #[serde(default)]
    pub dependencies: IndexMap<String, OneOrMany>,
}

impl PipelineDocument {
    /// Creates a document with a name and no nodes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Appends a node entry (builder style).
    pub fn with_node(mut self, node: NodeEntry) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds `children` to the explicit mapping entry of `parent` (builder style).
    pub fn with_dependencies<I, S>(mut self, parent: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children.into_iter().map(Into::into);
        match self.dependencies.entry(parent.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().extend(children),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(OneOrMany::Many(children.collect()));
            }
        }
        self
    }
}

/// One entry of the `nodes` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeEntry {
    pub name: String,
    /// Children of this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nexts: Vec<String>,
    /// Parents of this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

impl NodeEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_nexts<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nexts.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn with_depends<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends.extend(parents.into_iter().map(Into::into));
        self
    }
}

/// A mapping value that is either one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Iterates over the names in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }

    fn extend(&mut self, names: impl Iterator<Item = String>) {
        if let Self::One(name) = self {
            *self = Self::Many(vec![std::mem::take(name)]);
        }
        if let Self::Many(existing) = self {
            existing.extend(names);
        }
    }
}
