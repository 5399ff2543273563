//! Wire shapes of the roadmap backend and their conversion into graph types.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::roadmap::{
	Edge, ExpansionState, ExplorationState, Explanation, NodeId, Position, RoadmapSummary,
	TopicNode,
};

/// Ids arrive as JSON numbers or strings depending on the endpoint.
fn id_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Num(i64),
		Str(String),
	}
	Ok(match Raw::deserialize(de)? {
		Raw::Num(n) => n.to_string(),
		Raw::Str(s) => s,
	})
}

fn opt_id_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
	#[derive(Deserialize)]
	struct Wrap(#[serde(deserialize_with = "id_string")] String);
	Ok(Option::<Wrap>::deserialize(de)?.map(|w| w.0))
}

#[derive(Debug, Serialize)]
pub struct CreateRoadmapRequest<'a> {
	pub user_id: &'a str,
	pub root_topic: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoadmapResponse {
	#[serde(deserialize_with = "id_string")]
	pub roadmap_id: String,
	pub root_node: RootNodeDto,
}

#[derive(Debug, Deserialize)]
pub struct RootNodeDto {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	pub topic_name: String,
	#[serde(default)]
	pub description: Option<String>,
}

impl RootNodeDto {
	pub fn into_node(self) -> TopicNode {
		TopicNode::new(NodeId(self.id), self.topic_name, 0, Position::default())
			.with_description(self.description)
	}
}

#[derive(Debug, Deserialize)]
pub struct UserRoadmapsResponse {
	#[serde(default)]
	pub roadmaps: Vec<RoadmapSummaryDto>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapSummaryDto {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub root_topic: Option<String>,
	#[serde(default)]
	pub total_nodes: u32,
	#[serde(default)]
	pub max_depth_reached: u32,
	#[serde(default)]
	pub created_at: Option<String>,
}

impl From<RoadmapSummaryDto> for RoadmapSummary {
	fn from(dto: RoadmapSummaryDto) -> Self {
		Self {
			root_topic: dto.root_topic.unwrap_or_else(|| dto.title.clone()),
			id: dto.id,
			title: dto.title,
			total_nodes: dto.total_nodes,
			max_depth_reached: dto.max_depth_reached,
			created_at: dto.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeDto {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default, deserialize_with = "opt_id_string")]
	pub parent_id: Option<String>,
	pub topic_name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub depth_level: u32,
	#[serde(default)]
	pub is_explored: bool,
	#[serde(default)]
	pub expansion_status: Option<String>,
}

impl NodeDto {
	/// Position is left at the origin; callers lay the node out.
	pub fn into_node(self) -> TopicNode {
		let mut node =
			TopicNode::new(NodeId(self.id), self.topic_name, self.depth_level, Position::default())
				.with_description(self.description);
		node.parent_id = self.parent_id.map(NodeId);
		node.expansion = ExpansionState::from_backend(self.expansion_status.as_deref());
		if self.is_explored {
			node.exploration = ExplorationState::Explored;
		}
		node
	}
}

#[derive(Debug, Deserialize)]
pub struct EdgeDto {
	#[serde(deserialize_with = "id_string")]
	pub parent_id: String,
	#[serde(deserialize_with = "id_string")]
	pub child_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapGraphResponse {
	#[serde(default)]
	pub nodes: Vec<NodeDto>,
	#[serde(default)]
	pub edges: Vec<EdgeDto>,
}

impl RoadmapGraphResponse {
	/// Convert to graph types, deriving each node's parent from the edge list.
	pub fn into_parts(self) -> (Vec<TopicNode>, Vec<Edge>) {
		let parents: HashMap<&str, &str> = self
			.edges
			.iter()
			.map(|e| (e.child_id.as_str(), e.parent_id.as_str()))
			.collect();
		let nodes = self
			.nodes
			.into_iter()
			.map(|dto| {
				let parent = parents.get(dto.id.as_str()).map(|p| NodeId::new(*p));
				let mut node = dto.into_node();
				if parent.is_some() {
					node.parent_id = parent;
				}
				node
			})
			.collect();
		let edges = self
			.edges
			.into_iter()
			.map(|e| Edge::new(NodeId(e.parent_id), NodeId(e.child_id)))
			.collect();
		(nodes, edges)
	}
}

#[derive(Debug, Deserialize)]
pub struct ExpandResponse {
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub child_nodes: Vec<NodeDto>,
}

impl ExpandResponse {
	pub fn already_expanded(&self) -> bool {
		self.status.as_deref() == Some("already_expanded")
	}
}

#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
	pub node: ExplanationDto,
}

#[derive(Debug, Deserialize)]
pub struct ExplanationDto {
	pub topic_name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub ai_explanation: Option<String>,
	#[serde(default)]
	pub why_important: Option<String>,
	#[serde(default)]
	pub key_concepts: Option<Vec<String>>,
	#[serde(default)]
	pub real_world_examples: Option<Vec<String>>,
	#[serde(default)]
	pub learning_tips: Option<String>,
	#[serde(default)]
	pub exploration_count: u32,
}

impl From<ExplanationDto> for Explanation {
	fn from(dto: ExplanationDto) -> Self {
		Self {
			node_id: None,
			topic_name: dto.topic_name,
			description: dto.description,
			ai_explanation: dto.ai_explanation,
			why_important: dto.why_important,
			key_concepts: dto.key_concepts.unwrap_or_default(),
			real_world_examples: dto.real_world_examples.unwrap_or_default(),
			learning_tips: dto.learning_tips,
			exploration_count: dto.exploration_count,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
	pub detail: String,
}
