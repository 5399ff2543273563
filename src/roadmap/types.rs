use std::fmt;

/// Backend-assigned node identifier, unique within one roadmap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplorationState {
	#[default]
	Unexplored,
	Exploring,
	Explored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpansionState {
	#[default]
	Unexpanded,
	Expanding,
	Expanded,
}

impl ExpansionState {
	/// Map the backend's `expansion_status` string. A node the backend still
	/// reports as mid-expansion stays retryable on the client.
	pub fn from_backend(status: Option<&str>) -> Self {
		match status {
			Some("expanded" | "completed") => Self::Expanded,
			_ => Self::Unexpanded,
		}
	}
}

/// Transient per-node UI flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeFlag {
	Expanding,
	Exploring,
}

/// Badge shown on a node; explored wins over expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeBadge {
	Explored,
	Expanded,
	Unexplored,
}

impl NodeBadge {
	pub fn label(self) -> &'static str {
		match self {
			Self::Explored => "explored",
			Self::Expanded => "expanded",
			Self::Unexplored => "unexplored",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopicNode {
	pub id: NodeId,
	pub parent_id: Option<NodeId>,
	pub label: String,
	pub description: Option<String>,
	pub depth: u32,
	pub exploration: ExplorationState,
	pub expansion: ExpansionState,
	pub position: Position,
	// Set while a refresh of an already explored node is pending.
	pub(crate) explore_in_flight: bool,
}

impl TopicNode {
	pub fn new(id: NodeId, label: impl Into<String>, depth: u32, position: Position) -> Self {
		Self {
			id,
			parent_id: None,
			label: label.into(),
			description: None,
			depth,
			exploration: ExplorationState::Unexplored,
			expansion: ExpansionState::Unexpanded,
			position,
			explore_in_flight: false,
		}
	}

	pub fn with_parent(mut self, parent_id: NodeId) -> Self {
		self.parent_id = Some(parent_id);
		self
	}

	pub fn with_description(mut self, description: Option<String>) -> Self {
		self.description = description;
		self
	}

	pub fn is_expanding(&self) -> bool {
		self.expansion == ExpansionState::Expanding
	}

	pub fn is_exploring(&self) -> bool {
		self.exploration == ExplorationState::Exploring || self.explore_in_flight
	}

	pub fn is_explored(&self) -> bool {
		self.exploration == ExplorationState::Explored
	}

	/// Whether the Expand affordance is still offered.
	pub fn can_expand(&self) -> bool {
		self.expansion != ExpansionState::Expanded
	}

	pub fn badge(&self) -> NodeBadge {
		if self.is_explored() {
			NodeBadge::Explored
		} else if self.expansion == ExpansionState::Expanded {
			NodeBadge::Expanded
		} else {
			NodeBadge::Unexplored
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub id: String,
	pub source: NodeId,
	pub target: NodeId,
}

impl Edge {
	pub fn new(source: NodeId, target: NodeId) -> Self {
		Self {
			id: Self::id_for(&source, &target),
			source,
			target,
		}
	}

	pub fn id_for(source: &NodeId, target: &NodeId) -> String {
		format!("{source}->{target}")
	}
}

/// Backend summary of a roadmap as listed for the user.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadmapSummary {
	pub id: String,
	pub title: String,
	pub root_topic: String,
	pub total_nodes: u32,
	pub max_depth_reached: u32,
	pub created_at: Option<String>,
}

/// Explanation returned by an explore call, shown in the side panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Explanation {
	pub node_id: Option<NodeId>,
	pub topic_name: String,
	pub description: Option<String>,
	pub ai_explanation: Option<String>,
	pub why_important: Option<String>,
	pub key_concepts: Vec<String>,
	pub real_world_examples: Vec<String>,
	pub learning_tips: Option<String>,
	pub exploration_count: u32,
}

/// Kind of user-triggered node action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
	Expand,
	Explore,
}

/// Event emitted by the view when a node button is clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAction {
	pub node_id: NodeId,
	pub kind: ActionKind,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn badge_priority_prefers_explored() {
		let mut node = TopicNode::new("1".into(), "Rust", 0, Position::default());
		assert_eq!(node.badge(), NodeBadge::Unexplored);
		node.expansion = ExpansionState::Expanded;
		assert_eq!(node.badge(), NodeBadge::Expanded);
		node.exploration = ExplorationState::Explored;
		assert_eq!(node.badge(), NodeBadge::Explored);
	}

	#[test]
	fn backend_expansion_status_mapping() {
		assert_eq!(ExpansionState::from_backend(Some("expanded")), ExpansionState::Expanded);
		assert_eq!(ExpansionState::from_backend(Some("completed")), ExpansionState::Expanded);
		assert_eq!(
			ExpansionState::from_backend(Some("expanding")),
			ExpansionState::Unexpanded
		);
		assert_eq!(ExpansionState::from_backend(None), ExpansionState::Unexpanded);
	}

	#[test]
	fn edge_id_is_derived_from_endpoints() {
		let edge = Edge::new("1".into(), "7".into());
		assert_eq!(edge.id, "1->7");
	}
}
