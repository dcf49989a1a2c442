use super::edge_writer::EdgeWriter;
use super::error::{Result, SimulationError};
use super::{ArticleId, Edge};
use fxhash::{FxHashMap, FxHashSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NodeInfo {
    id: ArticleId,
    in_degree: usize,
    out_degree: usize,
}

/// Directed citation graph. Nodes are kept in creation order and carry incrementally
/// maintained degree counters; edges form a set, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CitationGraph {
    nodes: Vec<NodeInfo>,
    index: FxHashMap<ArticleId, usize>,
    edges: Vec<Edge>,
    edge_set: FxHashSet<Edge>,
}

/// Node and edge lists of a graph, e.g. for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<ArticleId>,
    pub edges: Vec<Edge>,
}

impl CitationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(num_nodes),
            index: FxHashMap::with_capacity_and_hasher(num_nodes, Default::default()),
            ..Default::default()
        }
    }

    /// Adds a node; re-adding an existing id is a no-op. Returns whether the node is new.
    pub fn add_node(&mut self, id: ArticleId) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }

        self.index.insert(id, self.nodes.len());
        self.nodes.push(NodeInfo {
            id,
            ..Default::default()
        });
        true
    }

    /// Adds the edge `from -> to`; adding an existing edge is a no-op.
    /// Returns whether the edge is new.
    pub fn add_edge(&mut self, from: ArticleId, to: ArticleId) -> Result<bool> {
        let u = self.position(from)?;
        let v = self.position(to)?;

        if u == v {
            return Err(SimulationError::SelfCitation(from));
        }

        if !self.edge_set.insert((from, to)) {
            return Ok(false);
        }

        self.edges.push((from, to));
        self.nodes[u].out_degree += 1;
        self.nodes[v].in_degree += 1;
        Ok(true)
    }

    pub fn contains_node(&self, id: ArticleId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn contains_edge(&self, from: ArticleId, to: ArticleId) -> bool {
        self.edge_set.contains(&(from, to))
    }

    /// Total degree (in + out) at the current moment.
    pub fn degree(&self, id: ArticleId) -> Result<usize> {
        let info = self.node(id)?;
        Ok(info.in_degree + info.out_degree)
    }

    /// Number of times the article has been cited.
    pub fn in_degree(&self, id: ArticleId) -> Result<usize> {
        Ok(self.node(id)?.in_degree)
    }

    pub fn out_degree(&self, id: ArticleId) -> Result<usize> {
        Ok(self.node(id)?.out_degree)
    }

    /// Node ids in creation order.
    pub fn all_node_ids(&self) -> impl Iterator<Item = ArticleId> + '_ {
        self.nodes.iter().map(|info| info.id)
    }

    /// Total degrees aligned with `all_node_ids`.
    pub fn degrees(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .map(|info| info.in_degree + info.out_degree)
            .collect()
    }

    pub fn in_degrees(&self) -> Vec<usize> {
        self.nodes.iter().map(|info| info.in_degree).collect()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn write_edges(&self, writer: &mut impl EdgeWriter) {
        for &(u, v) in &self.edges {
            writer.add_edge(u, v);
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.all_node_ids().collect(),
            edges: self.edges.clone(),
        }
    }

    fn position(&self, id: ArticleId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(SimulationError::UnknownNode(id))
    }

    fn node(&self, id: ArticleId) -> Result<&NodeInfo> {
        Ok(&self.nodes[self.position(id)?])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edge_writer::EdgeListWriter;

    fn path_graph(n: usize) -> CitationGraph {
        let mut graph = CitationGraph::new();
        for u in 0..n {
            graph.add_node(u);
        }
        for u in 1..n {
            graph.add_edge(u, u - 1).unwrap();
        }
        graph
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut graph = CitationGraph::new();
        assert!(graph.add_node(3));
        assert!(graph.add_node(1));
        assert!(!graph.add_node(3));

        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(graph.all_node_ids().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut graph = path_graph(3);
        assert!(!graph.add_edge(1, 0).unwrap());
        assert!(graph.add_edge(0, 1).unwrap());

        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.edges(), &[(1, 0), (2, 1), (0, 1)]);
        assert!(graph.contains_edge(0, 1));
        assert!(!graph.contains_edge(0, 2));
        assert_eq!(graph.degree(1).unwrap(), 3);
        assert_eq!(graph.in_degree(1).unwrap(), 2);
        assert_eq!(graph.out_degree(1).unwrap(), 1);
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut graph = path_graph(2);
        assert_eq!(graph.add_edge(0, 7), Err(SimulationError::UnknownNode(7)));
        assert_eq!(graph.add_edge(5, 0), Err(SimulationError::UnknownNode(5)));
        assert_eq!(graph.degree(9), Err(SimulationError::UnknownNode(9)));
        assert_eq!(graph.in_degree(9), Err(SimulationError::UnknownNode(9)));
        assert_eq!(graph.out_degree(9), Err(SimulationError::UnknownNode(9)));
        assert_eq!(graph.number_of_edges(), 1);
    }

    #[test]
    fn self_loops_are_rejected() {
        let mut graph = path_graph(2);
        assert_eq!(graph.add_edge(1, 1), Err(SimulationError::SelfCitation(1)));
        assert_eq!(graph.degree(1).unwrap(), 1);
    }

    #[test]
    fn degrees_of_path() {
        let graph = path_graph(5);
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(graph.degrees(), vec![1, 2, 2, 2, 1]);
        assert_eq!(graph.in_degrees(), vec![1, 1, 1, 1, 0]);
        assert_eq!(
            graph.degrees(),
            graph
                .all_node_ids()
                .map(|id| graph.degree(id).unwrap())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn write_edges_in_insertion_order() {
        let mut graph = path_graph(3);
        graph.add_edge(0, 2).unwrap();

        let mut writer = EdgeListWriter::new(Vec::new()).unwrap();
        graph.write_edges(&mut writer);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "citing,cited\n1,0\n2,1\n0,2\n");
    }

    #[test]
    fn snapshot_lists_nodes_and_edges() {
        let graph = path_graph(3);
        let snapshot = graph.snapshot();
        assert_eq!(snapshot.nodes, vec![0, 1, 2]);
        assert_eq!(snapshot.edges, vec![(1, 0), (2, 1)]);
    }
}
