//! Selector parsing and node selection
//!
//! Supports dbt-style selectors:
//! - `stg_orders` / `model.shop.stg_orders` - node name or id
//! - `+fct_orders` - node and all ancestors
//! - `stg_orders+` - node and all descendants
//! - `2+fct_orders`, `stg_orders+1` - depth-limited ancestors/descendants
//! - `tag:finance`, `package:shop`, `resource_type:source`
//! - `path:models/staging/*` - nodes matching a path pattern
//! - `source.raw.orders` - source table by schema and table
//! - `a,b` - intersection, `a b` - union (intersection binds tighter)
//!
//! An empty selector selects every node.

mod parser;

use crate::error::{CoreError, CoreResult};
use crate::graph::GraphStore;
use crate::node::{Node, NodeKind};
use crate::node_id::NodeId;
use glob::{MatchOptions, Pattern};
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// How far a graph operator expands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDepth {
    /// Full transitive closure (`+x`)
    Unbounded,
    /// At most n hops (`2+x`)
    Bounded(usize),
}

impl TraversalDepth {
    /// Hop limit, `None` for the full closure
    pub fn max_hops(&self) -> Option<usize> {
        match self {
            TraversalDepth::Unbounded => None,
            TraversalDepth::Bounded(n) => Some(*n),
        }
    }
}

/// A predicate over a single node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// Bare name or full node id
    Name(String),
    /// `tag:<tag>`
    Tag(String),
    /// `path:<pattern>`, compiled at parse time
    Path(Pattern),
    /// `package:<package>`
    Package(String),
    /// `resource_type:<kind>`
    ResourceType(NodeKind),
    /// `source.<schema>.<table>`
    Source { schema: String, table: String },
}

impl Atom {
    /// Check whether a node satisfies this atom
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Atom::Name(name) => node.name == *name || node.id == *name,
            Atom::Tag(tag) => node.tags.contains(tag),
            Atom::Path(pattern) => matches_path_pattern(&node.path, pattern),
            Atom::Package(package) => node.package == *package,
            Atom::ResourceType(kind) => node.resource_type() == *kind,
            Atom::Source { schema, table } => {
                node.source_table() == Some((schema.as_str(), table.as_str()))
            }
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Name(name) => write!(f, "{}", name),
            Atom::Tag(tag) => write!(f, "tag:{}", tag),
            Atom::Path(pattern) => write!(f, "path:{}", pattern),
            Atom::Package(package) => write!(f, "package:{}", package),
            Atom::ResourceType(kind) => write!(f, "resource_type:{}", kind),
            Atom::Source { schema, table } => write!(f, "source.{}.{}", schema, table),
        }
    }
}

/// An atom with its graph operators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTerm {
    /// The node predicate
    pub atom: Atom,
    /// Leading `+`
    pub ancestors: Option<TraversalDepth>,
    /// Trailing `+`
    pub descendants: Option<TraversalDepth>,
}

impl SelectorTerm {
    /// A term with no graph operators
    pub fn atom(atom: Atom) -> Self {
        Self {
            atom,
            ancestors: None,
            descendants: None,
        }
    }

    /// Resolve the atom, then expand each graph operator from the atom's own
    /// matches.
    fn resolve(&self, store: &GraphStore) -> BTreeSet<NodeIndex> {
        let seeds: BTreeSet<NodeIndex> = store
            .indices()
            .filter(|&idx| self.atom.matches(store.node_at(idx)))
            .collect();

        if seeds.is_empty() {
            log::debug!("Selector '{}' matched no nodes", self.atom);
            return seeds;
        }

        let mut selected = seeds.clone();
        if let Some(depth) = self.ancestors {
            selected.extend(store.expand(&seeds, Direction::Incoming, depth.max_hops()));
        }
        if let Some(depth) = self.descendants {
            selected.extend(store.expand(&seeds, Direction::Outgoing, depth.max_hops()));
        }
        selected
    }
}

impl fmt::Display for SelectorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ancestors {
            Some(TraversalDepth::Unbounded) => write!(f, "+")?,
            Some(TraversalDepth::Bounded(n)) => write!(f, "{}+", n)?,
            None => {}
        }
        write!(f, "{}", self.atom)?;
        match self.descendants {
            Some(TraversalDepth::Unbounded) => write!(f, "+"),
            Some(TraversalDepth::Bounded(n)) => write!(f, "+{}", n),
            None => Ok(()),
        }
    }
}

/// Parsed selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionQuery {
    /// Every node (the empty selector)
    All,
    /// A single atom with graph operators
    Term(SelectorTerm),
    /// Comma-separated terms
    Intersect(Vec<SelectionQuery>),
    /// Whitespace-separated terms
    Union(Vec<SelectionQuery>),
}

impl SelectionQuery {
    /// Parse a selector string.
    ///
    /// Fails with [`CoreError::SelectorSyntax`] naming the offending fragment
    /// and byte position; a malformed selector is never partially applied.
    pub fn parse(selector: &str) -> CoreResult<Self> {
        parser::parse(selector)
    }

    /// Evaluate against a graph store
    pub fn evaluate(&self, store: &GraphStore) -> Selection {
        Selection::from_indices(store, self.resolve(store))
    }

    fn resolve(&self, store: &GraphStore) -> BTreeSet<NodeIndex> {
        match self {
            SelectionQuery::All => store.indices().collect(),
            SelectionQuery::Term(term) => term.resolve(store),
            SelectionQuery::Intersect(children) => {
                let mut children = children.iter();
                let Some(first) = children.next() else {
                    return BTreeSet::new();
                };
                let mut acc = first.resolve(store);
                for child in children {
                    if acc.is_empty() {
                        break;
                    }
                    let other = child.resolve(store);
                    acc.retain(|idx| other.contains(idx));
                }
                acc
            }
            SelectionQuery::Union(children) => {
                children.iter().flat_map(|c| c.resolve(store)).collect()
            }
        }
    }
}

impl fmt::Display for SelectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionQuery::All => Ok(()),
            SelectionQuery::Term(term) => write!(f, "{}", term),
            SelectionQuery::Intersect(children) => write_joined(f, children, ","),
            SelectionQuery::Union(children) => write_joined(f, children, " "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[SelectionQuery], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Union several selector strings.
///
/// Every selector is parsed before any is evaluated. An empty list selects
/// all nodes.
pub fn select<S: AsRef<str>>(store: &GraphStore, selectors: &[S]) -> CoreResult<Selection> {
    let mut queries = selectors
        .iter()
        .map(|s| SelectionQuery::parse(s.as_ref()))
        .collect::<CoreResult<Vec<_>>>()?;

    let query = match queries.len() {
        0 => SelectionQuery::All,
        1 => queries.swap_remove(0),
        _ => SelectionQuery::Union(queries),
    };
    Ok(query.evaluate(store))
}

/// A concrete, deduplicated set of node ids in graph order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl Selection {
    /// Every node in the store
    pub fn all(store: &GraphStore) -> Self {
        Self::from_indices(store, store.indices().collect())
    }

    /// Select an explicit list of node ids, bypassing the parser.
    ///
    /// Unknown ids fail with [`CoreError::NodeNotFound`]; an empty list
    /// selects all nodes.
    pub fn from_ids<S: AsRef<str>>(store: &GraphStore, ids: &[S]) -> CoreResult<Self> {
        if ids.is_empty() {
            return Ok(Self::all(store));
        }
        let indices = ids
            .iter()
            .map(|id| {
                store
                    .index_of(id.as_ref())
                    .ok_or_else(|| CoreError::NodeNotFound {
                        id: id.as_ref().to_string(),
                    })
            })
            .collect::<CoreResult<BTreeSet<_>>>()?;
        Ok(Self::from_indices(store, indices))
    }

    fn from_indices(store: &GraphStore, indices: BTreeSet<NodeIndex>) -> Self {
        let ids: Vec<NodeId> = indices
            .into_iter()
            .map(|idx| store.node_at(idx).id.clone())
            .collect();
        let members = ids.iter().cloned().collect();
        Self { ids, members }
    }

    /// Check membership by node id
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Selected ids in graph order
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of selected nodes
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected nodes, resolved against the store they were selected from
    pub fn nodes<'g>(&'g self, store: &'g GraphStore) -> impl Iterator<Item = &'g Node> + 'g {
        self.ids.iter().filter_map(move |id| store.get(id))
    }
}

/// `*` and `?` stay within one path segment; `**` spans directories
const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Check if a path matches a `path:` pattern.
///
/// A pattern without wildcards matches as a substring, so `path:staging`
/// selects everything under a `staging` directory.
pub(crate) fn matches_path_pattern(path: &str, pattern: &Pattern) -> bool {
    let raw = pattern.as_str();
    if !raw.contains(['*', '?', '[']) {
        return path.contains(raw);
    }
    pattern.matches_with(path, PATH_MATCH)
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
