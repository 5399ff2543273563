//! Nodes and edges of the currently open roadmap.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{Edge, ExpansionState, ExplorationState, NodeFlag, NodeId, TopicNode};

#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: Vec<TopicNode>,
	index: HashMap<NodeId, usize>,
	edges: Vec<Edge>,
	edge_ids: HashSet<String>,
	generation: u64,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the whole graph. Duplicate node ids keep their first
	/// occurrence; edges to unknown nodes are dropped.
	pub fn load_graph(&mut self, nodes: Vec<TopicNode>, edges: Vec<Edge>) {
		self.reset();
		for node in nodes {
			if self.index.contains_key(&node.id) {
				warn!("duplicate node {} in loaded graph", node.id);
				continue;
			}
			self.insert_node(node);
		}
		for edge in edges {
			if !self.index.contains_key(&edge.source) || !self.index.contains_key(&edge.target) {
				warn!("dropping edge {} with a missing endpoint", edge.id);
				continue;
			}
			self.insert_edge(edge);
		}
		debug!(
			"loaded roadmap graph: {} nodes, {} edges",
			self.nodes.len(),
			self.edges.len()
		);
	}

	/// Discard everything, e.g. when the roadmap is closed or deleted.
	pub fn clear(&mut self) {
		self.reset();
	}

	/// Attach `children` under `parent_id` and mark the parent expanded.
	///
	/// Children whose id is already present are skipped, so replaying a
	/// payload is harmless. Returns how many nodes were inserted; an unknown
	/// parent makes the whole call a no-op.
	pub fn merge_subgraph(&mut self, parent_id: &NodeId, children: Vec<TopicNode>) -> usize {
		let Some(&parent_idx) = self.index.get(parent_id) else {
			warn!("merge into unknown parent {parent_id} ignored");
			return 0;
		};
		self.nodes[parent_idx].expansion = ExpansionState::Expanded;

		let mut inserted = 0;
		for mut child in children {
			if child.id == *parent_id || self.index.contains_key(&child.id) {
				continue;
			}
			child.parent_id = Some(parent_id.clone());
			let edge = Edge::new(parent_id.clone(), child.id.clone());
			self.insert_node(child);
			self.insert_edge(edge);
			inserted += 1;
		}
		inserted
	}

	/// Toggle one transient flag on one node. Returns false for unknown ids.
	///
	/// Clearing `Expanding` reverts the node to unexpanded; clearing
	/// `Exploring` leaves an already explored node explored.
	pub fn set_node_flag(&mut self, node_id: &NodeId, flag: NodeFlag, value: bool) -> bool {
		let Some(node) = self.node_mut(node_id) else {
			return false;
		};
		match (flag, value) {
			(NodeFlag::Expanding, true) => node.expansion = ExpansionState::Expanding,
			(NodeFlag::Expanding, false) => {
				if node.expansion == ExpansionState::Expanding {
					node.expansion = ExpansionState::Unexpanded;
				}
			}
			(NodeFlag::Exploring, true) => {
				if node.exploration == ExplorationState::Explored {
					node.explore_in_flight = true;
				} else {
					node.exploration = ExplorationState::Exploring;
				}
			}
			(NodeFlag::Exploring, false) => {
				node.explore_in_flight = false;
				if node.exploration == ExplorationState::Exploring {
					node.exploration = ExplorationState::Unexplored;
				}
			}
		}
		true
	}

	pub fn mark_expanded(&mut self, node_id: &NodeId) -> bool {
		let Some(node) = self.node_mut(node_id) else {
			return false;
		};
		node.expansion = ExpansionState::Expanded;
		true
	}

	pub fn mark_explored(&mut self, node_id: &NodeId) -> bool {
		let Some(node) = self.node_mut(node_id) else {
			return false;
		};
		node.exploration = ExplorationState::Explored;
		node.explore_in_flight = false;
		true
	}

	pub fn node(&self, node_id: &NodeId) -> Option<&TopicNode> {
		self.index.get(node_id).map(|&i| &self.nodes[i])
	}

	fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut TopicNode> {
		self.index.get(node_id).map(|&i| &mut self.nodes[i])
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[TopicNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn root(&self) -> Option<&TopicNode> {
		self.nodes.iter().find(|n| n.parent_id.is_none())
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn max_depth(&self) -> u32 {
		self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
	}

	/// Bumped whenever the graph is replaced or cleared.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	fn reset(&mut self) {
		self.nodes.clear();
		self.index.clear();
		self.edges.clear();
		self.edge_ids.clear();
		self.generation += 1;
	}

	fn insert_node(&mut self, node: TopicNode) {
		self.index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
	}

	fn insert_edge(&mut self, edge: Edge) {
		if self.edge_ids.insert(edge.id.clone()) {
			self.edges.push(edge);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::roadmap::types::Position;

	fn node(id: &str, depth: u32) -> TopicNode {
		TopicNode::new(id.into(), format!("topic {id}"), depth, Position::default())
	}

	fn store_with_root() -> GraphStore {
		let mut store = GraphStore::new();
		store.load_graph(vec![node("1", 0)], Vec::new());
		store
	}

	#[test]
	fn load_graph_replaces_contents_and_bumps_generation() {
		let mut store = store_with_root();
		let first = store.generation();
		store.merge_subgraph(&"1".into(), vec![node("2", 1)]);

		store.load_graph(
			vec![node("a", 0), node("b", 1).with_parent("a".into())],
			vec![Edge::new("a".into(), "b".into())],
		);
		assert_eq!(store.len(), 2);
		assert!(store.node(&"1".into()).is_none());
		assert_eq!(store.edges().len(), 1);
		assert!(store.generation() > first);
	}

	#[test]
	fn load_graph_drops_dangling_edges() {
		let mut store = GraphStore::new();
		store.load_graph(vec![node("a", 0)], vec![Edge::new("a".into(), "missing".into())]);
		assert!(store.edges().is_empty());
	}

	#[test]
	fn merge_inserts_children_with_parent_edges() {
		let mut store = store_with_root();
		let inserted = store.merge_subgraph(&"1".into(), vec![node("2", 1), node("3", 1)]);

		assert_eq!(inserted, 2);
		assert_eq!(store.node(&"1".into()).unwrap().expansion, ExpansionState::Expanded);
		assert_eq!(store.node(&"2".into()).unwrap().parent_id, Some("1".into()));
		let edges: Vec<&str> = store.edges().iter().map(|e| e.id.as_str()).collect();
		assert_eq!(edges, ["1->2", "1->3"]);
	}

	#[test]
	fn overlapping_merges_never_duplicate() {
		let mut store = store_with_root();
		let batches = [
			vec!["2", "3"],
			vec!["2", "3"],
			vec!["3", "4"],
			vec!["4", "5", "2"],
		];
		for batch in batches {
			let children = batch.iter().map(|id| node(id, 1)).collect();
			store.merge_subgraph(&"1".into(), children);
		}
		// root plus four distinct children, one edge each
		assert_eq!(store.len(), 5);
		assert_eq!(store.edges().len(), 4);
	}

	#[test]
	fn merge_into_unknown_parent_is_a_noop() {
		let mut store = store_with_root();
		assert_eq!(store.merge_subgraph(&"nope".into(), vec![node("2", 1)]), 0);
		assert_eq!(store.len(), 1);
		assert!(store.edges().is_empty());
	}

	#[test]
	fn set_node_flag_touches_only_its_node() {
		let mut store = store_with_root();
		store.merge_subgraph(&"1".into(), vec![node("2", 1)]);

		assert!(store.set_node_flag(&"2".into(), NodeFlag::Expanding, true));
		assert!(store.node(&"2".into()).unwrap().is_expanding());
		assert!(!store.node(&"1".into()).unwrap().is_expanding());

		store.set_node_flag(&"2".into(), NodeFlag::Expanding, false);
		assert_eq!(store.node(&"2".into()).unwrap().expansion, ExpansionState::Unexpanded);
		assert!(!store.set_node_flag(&"zzz".into(), NodeFlag::Exploring, true));
	}

	#[test]
	fn clearing_exploring_keeps_explored_nodes_explored() {
		let mut store = store_with_root();
		let id: NodeId = "1".into();
		store.mark_explored(&id);
		store.set_node_flag(&id, NodeFlag::Exploring, true);
		assert!(store.node(&id).unwrap().is_exploring());

		store.set_node_flag(&id, NodeFlag::Exploring, false);
		let root = store.node(&id).unwrap();
		assert!(!root.is_exploring());
		assert!(root.is_explored());
	}

	#[test]
	fn stats_follow_local_expansion() {
		let mut store = store_with_root();
		store.merge_subgraph(&"1".into(), vec![node("2", 1)]);
		store.merge_subgraph(&"2".into(), vec![node("3", 2), node("4", 2)]);
		assert_eq!(store.len(), 4);
		assert_eq!(store.max_depth(), 2);
		assert_eq!(store.root().map(|n| n.id.as_str()), Some("1"));
	}
}
