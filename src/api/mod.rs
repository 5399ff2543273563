//! Backend access for the roadmap explorer.

mod http;
pub mod types;

use async_trait::async_trait;

pub use http::HttpRoadmapApi;
pub use types::{CreateRoadmapResponse, ExpandResponse, RoadmapGraphResponse};

use crate::error::ApiError;
use crate::roadmap::{Explanation, NodeId, RoadmapSummary};

/// Calls the explorer makes against the roadmap service.
///
/// Futures are `!Send`: everything runs on the browser's event loop.
#[async_trait(?Send)]
pub trait RoadmapApi {
	/// Create a roadmap with a single root topic for the signed-in user.
	async fn create_roadmap(&self, root_topic: &str) -> Result<CreateRoadmapResponse, ApiError>;

	/// Roadmaps owned by the signed-in user.
	async fn user_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError>;

	/// Every node and edge of one roadmap.
	async fn roadmap_graph(&self, roadmap_id: &str) -> Result<RoadmapGraphResponse, ApiError>;

	/// Ask the backend to generate children for a node.
	async fn expand_node(&self, node_id: &NodeId) -> Result<ExpandResponse, ApiError>;

	/// Fetch (or regenerate) the explanation for a node.
	async fn explore_node(&self, node_id: &NodeId) -> Result<Explanation, ApiError>;

	async fn delete_roadmap(&self, roadmap_id: &str) -> Result<(), ApiError>;
}
