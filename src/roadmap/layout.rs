//! Deterministic tree placement.
//!
//! Children are centred in a row under their parent. The gap between a parent
//! and its children grows geometrically with the parent's depth, so deeper
//! levels get more room. Placement never consults or moves any other node:
//! a late expansion can overlap a distant subtree.

use std::collections::{HashMap, HashSet, VecDeque};

use log::warn;

use super::types::{NodeId, Position, TopicNode};
use crate::config::LayoutConfig;

#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
	config: LayoutConfig,
}

impl LayoutEngine {
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Row gap below a parent at `depth`.
	pub fn vertical_gap(&self, depth: u32) -> f64 {
		self.config.vertical_spacing * self.config.growth_factor.powi(depth as i32)
	}

	/// Positions for `child_count` siblings under a parent.
	pub fn compute_child_positions(
		&self,
		parent: Position,
		parent_depth: u32,
		child_count: usize,
	) -> Vec<Position> {
		if child_count == 0 {
			return Vec::new();
		}
		let h = self.config.horizontal_spacing;
		let start_x = parent.x - (child_count - 1) as f64 * h / 2.0;
		let y = parent.y + self.vertical_gap(parent_depth);
		(0..child_count)
			.map(|i| Position::new(start_x + i as f64 * h, y))
			.collect()
	}

	/// Place a whole tree received from the backend.
	///
	/// Roots (no parent, or a parent absent from `nodes`) go to the configured
	/// root position, extra roots spread to the right. Children are then laid
	/// out breadth-first in the order they appear in `nodes`.
	pub fn place_tree(&self, nodes: &mut [TopicNode]) {
		let index: HashMap<NodeId, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();

		let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
		let mut roots = Vec::new();
		for (i, node) in nodes.iter().enumerate() {
			match node.parent_id.as_ref().and_then(|p| index.get(p)) {
				Some(&parent) if parent != i => children.entry(parent).or_default().push(i),
				_ => roots.push(i),
			}
		}

		let root = self.config.root_position;
		let root_spacing = self.config.horizontal_spacing * 4.0;
		let mut placed = HashSet::new();
		let mut queue = VecDeque::new();
		for (n, &i) in roots.iter().enumerate() {
			nodes[i].position = Position::new(root.x + n as f64 * root_spacing, root.y);
			placed.insert(i);
			queue.push_back(i);
		}

		while let Some(parent) = queue.pop_front() {
			let Some(kids) = children.get(&parent) else {
				continue;
			};
			let positions =
				self.compute_child_positions(nodes[parent].position, nodes[parent].depth, kids.len());
			for (&child, position) in kids.iter().zip(positions) {
				if placed.insert(child) {
					nodes[child].position = position;
					queue.push_back(child);
				}
			}
		}

		if placed.len() < nodes.len() {
			warn!(
				"{} roadmap nodes are unreachable from any root and keep their default position",
				nodes.len() - placed.len()
			);
		}
	}
}
