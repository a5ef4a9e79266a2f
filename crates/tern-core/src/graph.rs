//! Immutable graph store over nodes and their dependencies

use crate::error::{CoreError, CoreResult, MalformedGraphError, ReferenceOrigin};
use crate::node::{ColumnLineage, Node};
use crate::node_id::NodeId;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Read-only store of nodes, dependency edges and direct column lineage.
///
/// Edges point from a dependency to its dependent, so `Incoming` walks
/// ancestors and `Outgoing` walks descendants. Both adjacency directions are
/// built once in [`GraphStore::build`]; nothing mutates the store afterwards,
/// which is what allows concurrent readers without locking.
///
/// Node indices follow input order, which gives every traversal a stable
/// output order.
#[derive(Debug)]
pub struct GraphStore {
    /// Dependency graph, weights are node ids
    graph: DiGraph<NodeId, ()>,

    /// Map from node id to graph index
    index: HashMap<NodeId, NodeIndex>,

    /// Nodes, positioned by graph index
    nodes: Vec<Node>,

    /// References dropped during the build
    malformed: Vec<MalformedGraphError>,
}

impl GraphStore {
    /// Build the store, dropping references to unknown nodes.
    ///
    /// Every dropped reference is logged and kept in [`malformed`](Self::malformed).
    /// Duplicate node ids abort the build.
    pub fn build(nodes: Vec<Node>) -> CoreResult<Self> {
        Self::build_with(nodes, false)
    }

    /// Build the store, failing on the first reference to an unknown node
    pub fn build_strict(nodes: Vec<Node>) -> CoreResult<Self> {
        Self::build_with(nodes, true)
    }

    fn build_with(mut nodes: Vec<Node>, strict: bool) -> CoreResult<Self> {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in &nodes {
            if node.id.is_empty() {
                return Err(CoreError::EmptyNodeId {
                    context: format!("node named '{}'", node.name),
                });
            }
            if index.contains_key(&node.id) {
                return Err(CoreError::DuplicateNode {
                    id: node.id.to_string(),
                });
            }
            let idx = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), idx);
        }

        let mut malformed = Vec::new();

        for node in &mut nodes {
            let dependent = index[&node.id];

            let mut seen = HashSet::new();
            let mut kept = Vec::with_capacity(node.depends_on.len());
            for dep in std::mem::take(&mut node.depends_on) {
                match index.get(&dep) {
                    Some(&dependency) => {
                        if seen.insert(dependency) {
                            graph.add_edge(dependency, dependent, ());
                            kept.push(dep);
                        }
                    }
                    None => record(
                        &mut malformed,
                        MalformedGraphError {
                            from: node.id.clone(),
                            target: dep,
                            origin: ReferenceOrigin::DependsOn,
                        },
                        strict,
                    )?,
                }
            }
            node.depends_on = kept;

            if let ColumnLineage::Known(map) = &mut node.column_lineage {
                for (column, refs) in map.iter_mut() {
                    let mut kept = Vec::with_capacity(refs.len());
                    for source in std::mem::take(refs) {
                        if !index.contains_key(&source.node) {
                            record(
                                &mut malformed,
                                MalformedGraphError {
                                    from: node.id.clone(),
                                    target: source.node,
                                    origin: ReferenceOrigin::ColumnLineage {
                                        column: column.clone(),
                                    },
                                },
                                strict,
                            )?;
                        } else if !kept.contains(&source) {
                            kept.push(source);
                        }
                    }
                    *refs = kept;
                }
            }
        }

        log::debug!(
            "Built graph store: {} nodes, {} edges, {} dropped references",
            graph.node_count(),
            graph.edge_count(),
            malformed.len()
        );

        Ok(Self {
            graph,
            index,
            nodes,
            malformed,
        })
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> CoreResult<&Node> {
        self.get(id).ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })
    }

    /// Look up a node by id, returning `None` if absent
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| self.node_at(idx))
    }

    /// Check if a node exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes in input order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of dependency edges kept
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// References dropped during the build
    pub fn malformed(&self) -> &[MalformedGraphError] {
        &self.malformed
    }

    /// Resolve a node from its id or, failing that, its name.
    ///
    /// A name shared by nodes in several packages is an error listing every
    /// candidate id.
    pub fn resolve(&self, name_or_id: &str) -> CoreResult<&Node> {
        if let Some(node) = self.get(name_or_id) {
            return Ok(node);
        }
        let matches = self.nodes_named(name_or_id);
        match matches.as_slice() {
            [] => Err(CoreError::NodeNotFound {
                id: name_or_id.to_string(),
            }),
            [node] => Ok(*node),
            many => Err(CoreError::AmbiguousNode {
                name: name_or_id.to_string(),
                candidates: many
                    .iter()
                    .map(|n| n.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// All nodes with the given name, in input order
    pub fn nodes_named(&self, name: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.name == name).collect()
    }

    /// Get direct dependencies of a node
    pub fn dependencies(&self, id: &str) -> CoreResult<Vec<&NodeId>> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Get direct dependents of a node
    pub fn dependents(&self, id: &str) -> CoreResult<Vec<&NodeId>> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Get all ancestors (transitive dependencies) of a node
    pub fn ancestors(&self, id: &str) -> CoreResult<Vec<&NodeId>> {
        self.reachable(id, Direction::Incoming, None)
    }

    /// Get ancestors up to `max_depth` hops away
    pub fn ancestors_bounded(&self, id: &str, max_depth: usize) -> CoreResult<Vec<&NodeId>> {
        self.reachable(id, Direction::Incoming, Some(max_depth))
    }

    /// Get all descendants (transitive dependents) of a node
    pub fn descendants(&self, id: &str) -> CoreResult<Vec<&NodeId>> {
        self.reachable(id, Direction::Outgoing, None)
    }

    /// Get descendants up to `max_depth` hops away
    pub fn descendants_bounded(&self, id: &str, max_depth: usize) -> CoreResult<Vec<&NodeId>> {
        self.reachable(id, Direction::Outgoing, Some(max_depth))
    }

    fn neighbors(&self, id: &str, direction: Direction) -> CoreResult<Vec<&NodeId>> {
        let idx = self.require_index(id)?;
        let neighbors: BTreeSet<NodeIndex> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                Direction::Incoming => e.source(),
                Direction::Outgoing => e.target(),
            })
            .collect();
        Ok(neighbors.into_iter().map(|n| &self.graph[n]).collect())
    }

    fn reachable(
        &self,
        id: &str,
        direction: Direction,
        max_depth: Option<usize>,
    ) -> CoreResult<Vec<&NodeId>> {
        let start = self.require_index(id)?;
        let seeds = BTreeSet::from([start]);
        let mut reached = self.expand(&seeds, direction, max_depth);
        // A node on a cycle reaches itself; the closure excludes the start
        reached.remove(&start);
        Ok(reached.into_iter().map(|n| &self.graph[n]).collect())
    }

    fn require_index(&self, id: &str) -> CoreResult<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| CoreError::NodeNotFound { id: id.to_string() })
    }

    /// Graph index of a node id
    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Node at a graph index
    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.index()]
    }

    /// All graph indices in input order
    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// BFS from every seed along `direction`, up to `max_depth` hops.
    ///
    /// The result contains everything reached, not the seeds themselves
    /// (unless a cycle leads back to one). The visited set is the result set,
    /// so cycles terminate and nothing is reported twice.
    pub(crate) fn expand(
        &self,
        seeds: &BTreeSet<NodeIndex>,
        direction: Direction,
        max_depth: Option<usize>,
    ) -> BTreeSet<NodeIndex> {
        let mut reached = BTreeSet::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = seeds.iter().map(|&s| (s, 0)).collect();

        while let Some((current, depth)) = queue.pop_front() {
            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            for edge in self.graph.edges_directed(current, direction) {
                let neighbor = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                if reached.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        reached
    }
}

fn record(
    malformed: &mut Vec<MalformedGraphError>,
    error: MalformedGraphError,
    strict: bool,
) -> CoreResult<()> {
    if strict {
        return Err(error.into());
    }
    log::warn!("{}; dropping reference", error);
    malformed.push(error);
    Ok(())
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
