//! Roadmap graph model: store, layout and the expand/explore workflows.

mod controller;
mod layout;
mod store;
mod types;

pub use controller::{
	ActionOutcome, ExpandOutcome, ExpansionController, ExploreOutcome, OpenOutcome,
};
pub use layout::LayoutEngine;
pub use store::GraphStore;
pub use types::{
	ActionKind, Edge, ExpansionState, ExplorationState, Explanation, NodeAction, NodeBadge,
	NodeFlag, NodeId, Position, RoadmapSummary, TopicNode,
};
