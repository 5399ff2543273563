//! Per-node expand/explore workflows and roadmap lifecycle.
//!
//! Each node has two independent tracks. Expansion is one-shot:
//! `Unexpanded -> Expanding -> Expanded`, reverting to `Unexpanded` on error.
//! Exploration may be repeated: a node that is not currently exploring can
//! always be explored again. The node's own state is the guard, so a second
//! click while a request is pending never reaches the network.
//!
//! Every request is abortable. Opening, creating or deleting a roadmap (and
//! unmounting the view) aborts whatever is still pending, and results that
//! land after the store has been replaced are dropped.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use log::{debug, info, warn};

use super::layout::LayoutEngine;
use super::store::GraphStore;
use super::types::{
	ActionKind, ExpansionState, Explanation, NodeAction, NodeFlag, NodeId, RoadmapSummary,
	TopicNode,
};
use crate::api::RoadmapApi;
use crate::error::{Result, RoadmapError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandOutcome {
	/// Already expanding or expanded; no request was made.
	Ignored,
	/// The backend had expanded the node before; nothing was added.
	AlreadyExpanded,
	Expanded { added: usize },
	/// The roadmap changed before the response arrived.
	Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExploreOutcome {
	Ignored,
	Explored(Explanation),
	Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
	Expand(ExpandOutcome),
	Explore(ExploreOutcome),
}

/// Result of opening or creating a roadmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
	Opened { roadmap_id: String, nodes: usize },
	/// Superseded by a later open, or cancelled.
	Cancelled,
}

pub struct ExpansionController<A> {
	api: A,
	store: Rc<RefCell<GraphStore>>,
	layout: LayoutEngine,
	roadmap_id: RefCell<Option<String>>,
	in_flight: RefCell<HashMap<u64, AbortHandle>>,
	next_request: Cell<u64>,
	open_seq: Cell<u64>,
}

impl<A: RoadmapApi> ExpansionController<A> {
	pub fn new(api: A, store: Rc<RefCell<GraphStore>>, layout: LayoutEngine) -> Self {
		Self {
			api,
			store,
			layout,
			roadmap_id: RefCell::new(None),
			in_flight: RefCell::new(HashMap::new()),
			next_request: Cell::new(0),
			open_seq: Cell::new(0),
		}
	}

	pub fn store(&self) -> &Rc<RefCell<GraphStore>> {
		&self.store
	}

	/// Id of the roadmap currently loaded into the store.
	pub fn roadmap_id(&self) -> Option<String> {
		self.roadmap_id.borrow().clone()
	}

	/// Number of requests still awaiting a response.
	pub fn pending_requests(&self) -> usize {
		self.in_flight.borrow().len()
	}

	/// Abort every pending request. Their results will never touch the store.
	pub fn cancel_all(&self) {
		let handles: Vec<_> = self.in_flight.borrow_mut().drain().map(|(_, h)| h).collect();
		if !handles.is_empty() {
			debug!("aborting {} pending roadmap requests", handles.len());
		}
		for handle in handles {
			handle.abort();
		}
	}

	/// Route a click on a node button to the matching workflow.
	pub async fn dispatch(&self, action: NodeAction) -> Result<ActionOutcome> {
		match action.kind {
			ActionKind::Expand => self.expand(&action.node_id).await.map(ActionOutcome::Expand),
			ActionKind::Explore => self.explore(&action.node_id).await.map(ActionOutcome::Explore),
		}
	}

	pub async fn expand(&self, node_id: &NodeId) -> Result<ExpandOutcome> {
		let generation = {
			let mut store = self.store.borrow_mut();
			let node = store
				.node(node_id)
				.ok_or_else(|| RoadmapError::UnknownNode(node_id.clone()))?;
			if node.expansion != ExpansionState::Unexpanded {
				debug!("expand of {node_id} skipped: {:?}", node.expansion);
				return Ok(ExpandOutcome::Ignored);
			}
			store.set_node_flag(node_id, NodeFlag::Expanding, true);
			store.generation()
		};

		let Some(response) = self.abortable(self.api.expand_node(node_id)).await else {
			self.release(node_id, NodeFlag::Expanding, generation);
			return Ok(ExpandOutcome::Cancelled);
		};

		let mut store = self.store.borrow_mut();
		if store.generation() != generation {
			warn!("dropping expansion of {node_id}: roadmap changed");
			return Ok(ExpandOutcome::Cancelled);
		}

		let response = match response {
			Ok(response) => response,
			Err(err) => {
				warn!("expanding {node_id} failed: {err}");
				store.set_node_flag(node_id, NodeFlag::Expanding, false);
				return Err(err.into());
			}
		};

		if response.already_expanded() {
			store.mark_expanded(node_id);
			return Ok(ExpandOutcome::AlreadyExpanded);
		}

		let Some(parent) = store.node(node_id) else {
			return Ok(ExpandOutcome::Cancelled);
		};
		let (origin, depth) = (parent.position, parent.depth);
		let positions =
			self.layout
				.compute_child_positions(origin, depth, response.child_nodes.len());
		let children: Vec<TopicNode> = response
			.child_nodes
			.into_iter()
			.zip(positions)
			.map(|(dto, position)| {
				let mut child = dto.into_node();
				child.depth = depth + 1;
				child.parent_id = Some(node_id.clone());
				child.position = position;
				child
			})
			.collect();

		let added = store.merge_subgraph(node_id, children);
		info!("expanded {node_id}: {added} new topics");
		Ok(ExpandOutcome::Expanded { added })
	}

	pub async fn explore(&self, node_id: &NodeId) -> Result<ExploreOutcome> {
		let generation = {
			let mut store = self.store.borrow_mut();
			let node = store
				.node(node_id)
				.ok_or_else(|| RoadmapError::UnknownNode(node_id.clone()))?;
			if node.is_exploring() {
				debug!("explore of {node_id} skipped: already in flight");
				return Ok(ExploreOutcome::Ignored);
			}
			store.set_node_flag(node_id, NodeFlag::Exploring, true);
			store.generation()
		};

		let Some(response) = self.abortable(self.api.explore_node(node_id)).await else {
			self.release(node_id, NodeFlag::Exploring, generation);
			return Ok(ExploreOutcome::Cancelled);
		};

		let mut store = self.store.borrow_mut();
		if store.generation() != generation {
			warn!("dropping explanation of {node_id}: roadmap changed");
			return Ok(ExploreOutcome::Cancelled);
		}

		match response {
			Ok(mut explanation) => {
				explanation.node_id = Some(node_id.clone());
				store.mark_explored(node_id);
				Ok(ExploreOutcome::Explored(explanation))
			}
			Err(err) => {
				warn!("exploring {node_id} failed: {err}");
				store.set_node_flag(node_id, NodeFlag::Exploring, false);
				Err(err.into())
			}
		}
	}

	pub async fn list_roadmaps(&self) -> Result<Vec<RoadmapSummary>> {
		Ok(self.api.user_roadmaps().await?)
	}

	/// Load an existing roadmap, replacing whatever is open.
	pub async fn open_roadmap(&self, roadmap_id: &str) -> Result<OpenOutcome> {
		let seq = self.begin_open();
		let Some(response) = self.abortable(self.api.roadmap_graph(roadmap_id)).await else {
			return Ok(OpenOutcome::Cancelled);
		};
		let response = response?;
		if self.open_seq.get() != seq {
			return Ok(OpenOutcome::Cancelled);
		}

		let (mut nodes, edges) = response.into_parts();
		self.layout.place_tree(&mut nodes);
		let count = nodes.len();
		self.store.borrow_mut().load_graph(nodes, edges);
		*self.roadmap_id.borrow_mut() = Some(roadmap_id.to_string());
		info!("opened roadmap {roadmap_id} with {count} topics");
		Ok(OpenOutcome::Opened {
			roadmap_id: roadmap_id.to_string(),
			nodes: count,
		})
	}

	/// Create a roadmap and open it with just its root.
	pub async fn create_roadmap(&self, root_topic: &str) -> Result<OpenOutcome> {
		let seq = self.begin_open();
		let Some(response) = self.abortable(self.api.create_roadmap(root_topic)).await else {
			return Ok(OpenOutcome::Cancelled);
		};
		let response = response?;
		if self.open_seq.get() != seq {
			return Ok(OpenOutcome::Cancelled);
		}

		let mut root = response.root_node.into_node();
		root.position = self.layout.config().root_position;
		self.store.borrow_mut().load_graph(vec![root], Vec::new());
		*self.roadmap_id.borrow_mut() = Some(response.roadmap_id.clone());
		info!("created roadmap {} for {root_topic:?}", response.roadmap_id);
		Ok(OpenOutcome::Opened {
			roadmap_id: response.roadmap_id,
			nodes: 1,
		})
	}

	/// Delete a roadmap; closes it first when it is the one on screen.
	pub async fn delete_roadmap(&self, roadmap_id: &str) -> Result<()> {
		self.api.delete_roadmap(roadmap_id).await?;
		if self.roadmap_id().as_deref() == Some(roadmap_id) {
			self.close_roadmap();
		}
		info!("deleted roadmap {roadmap_id}");
		Ok(())
	}

	/// Drop the open roadmap and everything pending against it.
	pub fn close_roadmap(&self) {
		self.open_seq.set(self.open_seq.get() + 1);
		self.cancel_all();
		self.store.borrow_mut().clear();
		self.roadmap_id.borrow_mut().take();
	}

	fn begin_open(&self) -> u64 {
		let seq = self.open_seq.get() + 1;
		self.open_seq.set(seq);
		self.cancel_all();
		seq
	}

	/// Clear a flag left behind by an aborted request, unless the graph it
	/// was set on has since been replaced.
	fn release(&self, node_id: &NodeId, flag: NodeFlag, generation: u64) {
		let mut store = self.store.borrow_mut();
		if store.generation() == generation {
			store.set_node_flag(node_id, flag, false);
		}
	}

	/// Run `fut`, returning `None` if it was aborted by [`Self::cancel_all`].
	async fn abortable<F: Future>(&self, fut: F) -> Option<F::Output> {
		let id = self.next_request.get();
		self.next_request.set(id + 1);
		let (handle, registration) = AbortHandle::new_pair();
		self.in_flight.borrow_mut().insert(id, handle);

		let result = Abortable::new(fut, registration).await;
		self.in_flight.borrow_mut().remove(&id);
		result.ok()
	}
}
