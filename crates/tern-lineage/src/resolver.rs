//! Column lineage resolution
//!
//! Ancestors follow each node's own `column_lineage` map. Descendants follow
//! a reverse index built the first time a downstream query runs and kept for
//! the resolver's lifetime.

use crate::column::{ColumnKey, Direction, LineageEdge, LineageEntry, LineageResult};
use crate::error::{LineageError, ResolveResult};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::OnceLock;
use tern_core::{CoreError, EdgeKind, GraphStore, LineageConfig, Node, NodeId, Selection};

/// Consumers of each upstream column: node -> column -> downstream columns
type ReverseIndex = HashMap<NodeId, BTreeMap<String, Vec<(ColumnKey, EdgeKind)>>>;

/// Traversal options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Follow filter and join edges as well as data edges
    pub include_structural: bool,
    /// Stop expanding after this many hops
    pub max_depth: Option<usize>,
}

impl From<&LineageConfig> for ResolveOptions {
    fn from(config: &LineageConfig) -> Self {
        Self {
            include_structural: config.include_structural,
            max_depth: config.max_depth,
        }
    }
}

/// Resolves column lineage over a graph store.
///
/// Read-only over the store; one resolver can be shared across threads.
#[derive(Debug)]
pub struct LineageResolver<'g> {
    store: &'g GraphStore,
    scope: Option<Selection>,
    options: ResolveOptions,
    reverse: OnceLock<ReverseIndex>,
}

impl<'g> LineageResolver<'g> {
    pub fn new(store: &'g GraphStore) -> Self {
        Self {
            store,
            scope: None,
            options: ResolveOptions::default(),
            reverse: OnceLock::new(),
        }
    }

    /// Restrict traversal to the selected nodes.
    ///
    /// Columns of nodes outside the scope are neither reported nor expanded.
    pub fn with_scope(mut self, scope: Selection) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve the ancestors or descendants of `node.column`.
    ///
    /// `node` is an id or a unique node name. Each `(node, column)` pair is
    /// visited at most once, so cycles terminate. The starting pair is not
    /// part of the result.
    pub fn resolve(
        &self,
        node: &str,
        column: &str,
        direction: Direction,
    ) -> ResolveResult<LineageResult> {
        let start = self.start_node(node)?;
        let column = start
            .resolve_column(column)
            .ok_or_else(|| LineageError::ColumnNotFound {
                node: start.id.to_string(),
                column: column.to_string(),
            })?;
        let root = ColumnKey::new(start.id.clone(), column);

        let mut visited: HashSet<ColumnKey> = HashSet::from([root.clone()]);
        let mut queue: VecDeque<(ColumnKey, usize)> = VecDeque::from([(root.clone(), 0)]);
        let mut columns: Vec<LineageEntry> = Vec::new();
        let mut edges: Vec<LineageEdge> = Vec::new();
        let mut seen_edges: HashSet<LineageEdge> = HashSet::new();

        while let Some((current, depth)) = queue.pop_front() {
            let steps = self.steps(&current, direction);

            if current != root {
                columns.push(LineageEntry {
                    key: current.clone(),
                    depth,
                    terminal: steps.is_empty(),
                });
            }

            if self.options.max_depth.is_some_and(|max| depth >= max) {
                continue;
            }

            for (next, kind) in steps {
                let edge = match direction {
                    Direction::Ancestors => LineageEdge {
                        from: next.clone(),
                        to: current.clone(),
                        kind,
                    },
                    Direction::Descendants => LineageEdge {
                        from: current.clone(),
                        to: next.clone(),
                        kind,
                    },
                };
                if seen_edges.insert(edge.clone()) {
                    edges.push(edge);
                }
                if visited.insert(next.clone()) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        log::debug!(
            "Resolved {} of {}: {} columns, {} edges",
            direction,
            root,
            columns.len(),
            edges.len()
        );

        Ok(LineageResult {
            root,
            direction,
            columns,
            edges,
        })
    }

    /// Nodes related to `node` through column lineage.
    ///
    /// Without `recursive` only direct neighbors are returned. Nodes come back
    /// in the order they are first reached; `node` itself is never included.
    pub fn related_nodes(
        &self,
        node: &str,
        direction: Direction,
        recursive: bool,
    ) -> ResolveResult<Vec<&'g NodeId>> {
        let start = self.start_node(node)?;

        let mut visited: HashSet<&NodeId> = HashSet::from([&start.id]);
        let mut queue: VecDeque<&'g Node> = VecDeque::from([start]);
        let mut related = Vec::new();

        while let Some(current) = queue.pop_front() {
            for id in self.neighbor_nodes(current, direction) {
                if !visited.insert(id) {
                    continue;
                }
                related.push(id);
                if recursive {
                    if let Some(next) = self.store.get(id) {
                        queue.push_back(next);
                    }
                }
            }
        }

        Ok(related)
    }

    fn start_node(&self, node: &str) -> ResolveResult<&'g Node> {
        let start = self.store.resolve(node).map_err(|e| match e {
            CoreError::NodeNotFound { id } => LineageError::NodeNotFound { id },
            other => LineageError::Core(other),
        })?;
        if !self.in_scope(&start.id) {
            return Err(LineageError::NodeOutOfScope {
                id: start.id.to_string(),
            });
        }
        Ok(start)
    }

    fn in_scope(&self, id: &str) -> bool {
        self.scope.as_ref().map_or(true, |s| s.contains(id))
    }

    fn follows(&self, kind: EdgeKind) -> bool {
        self.options.include_structural || !kind.is_structural()
    }

    /// One-hop neighbors of a column that pass the scope and edge filters
    fn steps(&self, key: &ColumnKey, direction: Direction) -> Vec<(ColumnKey, EdgeKind)> {
        let candidates: Vec<(ColumnKey, EdgeKind)> = match direction {
            Direction::Ancestors => self
                .store
                .get(&key.node)
                .and_then(|node| node.column_lineage.sources(&key.column))
                .unwrap_or_default()
                .iter()
                .map(|source| (self.canonical(&source.node, &source.column), source.kind))
                .collect(),
            Direction::Descendants => self
                .reverse_index()
                .get(&key.node)
                .and_then(|columns| columns.get(&key.column))
                .cloned()
                .unwrap_or_default(),
        };

        candidates
            .into_iter()
            .filter(|(next, kind)| self.follows(*kind) && self.in_scope(&next.node))
            .collect()
    }

    fn neighbor_nodes(&self, node: &'g Node, direction: Direction) -> Vec<&'g NodeId> {
        let mut ids: Vec<&'g NodeId> = Vec::new();
        let mut push = |id: &'g NodeId| {
            if id != &node.id && self.in_scope(id) && !ids.contains(&id) {
                ids.push(id);
            }
        };

        match direction {
            Direction::Ancestors => {
                for (_, refs) in node.column_lineage.entries() {
                    for source in refs.iter().filter(|s| self.follows(s.kind)) {
                        push(&source.node);
                    }
                }
            }
            Direction::Descendants => {
                let consumers = self
                    .reverse_index()
                    .get(&node.id)
                    .into_iter()
                    .flat_map(|columns| columns.values())
                    .flatten();
                for (downstream, kind) in consumers {
                    if !self.follows(*kind) {
                        continue;
                    }
                    // Borrow the id from the store, not from the index
                    if let Some(found) = self.store.get(&downstream.node) {
                        push(&found.id);
                    }
                }
            }
        }
        ids
    }

    /// Spell a referenced column the way its node does
    fn canonical(&self, node: &NodeId, column: &str) -> ColumnKey {
        let column = self
            .store
            .get(node)
            .and_then(|n| n.resolve_column(column))
            .unwrap_or(column);
        ColumnKey::new(node.clone(), column)
    }

    fn reverse_index(&self) -> &ReverseIndex {
        self.reverse.get_or_init(|| {
            let mut index = ReverseIndex::new();
            let mut edges = 0usize;
            for node in self.store.nodes() {
                for (column, refs) in node.column_lineage.entries() {
                    let downstream = ColumnKey::new(node.id.clone(), column.clone());
                    for source in refs {
                        let upstream = self.canonical(&source.node, &source.column);
                        index
                            .entry(upstream.node)
                            .or_default()
                            .entry(upstream.column)
                            .or_default()
                            .push((downstream.clone(), source.kind));
                        edges += 1;
                    }
                }
            }
            log::debug!("Built column reverse index: {} edges", edges);
            index
        })
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
