use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::RoadmapApi;
use super::types::{
	CreateRoadmapRequest, CreateRoadmapResponse, ErrorBody, ExpandResponse, ExploreResponse,
	RoadmapGraphResponse, UserRoadmapsResponse,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::roadmap::{Explanation, NodeId, RoadmapSummary};
use crate::session::Session;

/// JSON-over-HTTP client for the roadmap service.
#[derive(Clone, Debug)]
pub struct HttpRoadmapApi {
	client: Client,
	config: ApiConfig,
	session: Option<Session>,
}

impl HttpRoadmapApi {
	pub fn new(config: ApiConfig, session: Option<Session>) -> Self {
		Self {
			client: Client::new(),
			config,
			session,
		}
	}

	fn session(&self) -> Result<&Session, ApiError> {
		self.session.as_ref().ok_or(ApiError::Unauthenticated)
	}

	fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
		Ok(request.bearer_auth(&self.session()?.token))
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
		let response = self.authorized(request)?.send().await?;
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let detail = match response.json::<ErrorBody>().await {
			Ok(body) => body.detail,
			Err(_) => status
				.canonical_reason()
				.unwrap_or("request failed")
				.to_string(),
		};
		Err(ApiError::Status {
			status: status.as_u16(),
			detail,
		})
	}

	async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
		Ok(self.send(request).await?.json::<T>().await?)
	}
}

#[async_trait(?Send)]
impl RoadmapApi for HttpRoadmapApi {
	async fn create_roadmap(&self, root_topic: &str) -> Result<CreateRoadmapResponse, ApiError> {
		let body = CreateRoadmapRequest {
			user_id: &self.session()?.user_id,
			root_topic,
		};
		debug!("creating roadmap for {root_topic:?}");
		let request = self
			.client
			.post(self.config.url("create_knowledge_roadmap"))
			.json(&body);
		self.send_json(request).await
	}

	async fn user_roadmaps(&self) -> Result<Vec<RoadmapSummary>, ApiError> {
		let user_id = self.session()?.user_id.as_str();
		let request = self
			.client
			.get(self.config.url("get_user_roadmaps"))
			.query(&[("user_id", user_id)]);
		let response: UserRoadmapsResponse = self.send_json(request).await?;
		Ok(response.roadmaps.into_iter().map(Into::into).collect())
	}

	async fn roadmap_graph(&self, roadmap_id: &str) -> Result<RoadmapGraphResponse, ApiError> {
		let request = self
			.client
			.get(self.config.url(&format!("get_roadmap_graph/{roadmap_id}")));
		self.send_json(request).await
	}

	async fn expand_node(&self, node_id: &NodeId) -> Result<ExpandResponse, ApiError> {
		debug!("expanding node {node_id}");
		let request = self
			.client
			.post(self.config.url(&format!("expand_knowledge_node/{node_id}")));
		self.send_json(request).await
	}

	async fn explore_node(&self, node_id: &NodeId) -> Result<Explanation, ApiError> {
		debug!("exploring node {node_id}");
		let request = self
			.client
			.post(self.config.url(&format!("explore_node/{node_id}")));
		let response: ExploreResponse = self.send_json(request).await?;
		Ok(response.node.into())
	}

	async fn delete_roadmap(&self, roadmap_id: &str) -> Result<(), ApiError> {
		let request = self
			.client
			.delete(self.config.url(&format!("delete_roadmap/{roadmap_id}")));
		self.send(request).await.map(|_| ())
	}
}
