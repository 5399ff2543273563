use std::collections::HashMap;

use crate::roadmap::{ActionKind, GraphStore, NodeAction, NodeId, Position, TopicNode};

pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 96.0;
pub const BUTTON_WIDTH: f64 = 84.0;
pub const BUTTON_HEIGHT: f64 = 24.0;
const BUTTON_INSET: f64 = 10.0;
const BUTTON_TOP: f64 = 62.0;
const LABEL_CHARS: usize = 24;
// Pointer travel below this still counts as a click.
const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub offset_start: (f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	pub node: Option<NodeId>,
	pub button: Option<ActionKind>,
}

/// A button press waiting for its release.
#[derive(Clone, Debug, PartialEq)]
pub struct PressState {
	pub node: NodeId,
	pub kind: ActionKind,
	pub start_x: f64,
	pub start_y: f64,
}

/// What lies under a screen point.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
	Button(NodeId, ActionKind),
	Node(NodeId),
	Background,
}

/// Camera, pointer interaction and per-node drag offsets for the canvas.
///
/// Layout positions in the store are never modified; dragging only moves
/// the node on screen.
pub struct RoadmapViewState {
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub press: Option<PressState>,
	pub width: f64,
	pub height: f64,
	offsets: HashMap<NodeId, (f64, f64)>,
}

impl RoadmapViewState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			press: None,
			width,
			height,
			offsets: HashMap::new(),
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Top-centre of the node's box, including any drag offset.
	pub fn node_origin(&self, node: &TopicNode) -> Position {
		let (dx, dy) = self.offsets.get(&node.id).copied().unwrap_or_default();
		Position::new(node.position.x + dx, node.position.y + dy)
	}

	pub fn node_rect(&self, node: &TopicNode) -> Rect {
		let origin = self.node_origin(node);
		Rect {
			x: origin.x - NODE_WIDTH / 2.0,
			y: origin.y,
			w: NODE_WIDTH,
			h: NODE_HEIGHT,
		}
	}

	/// Button geometry; an expanded node has no Expand button.
	pub fn button_rect(&self, node: &TopicNode, kind: ActionKind) -> Option<Rect> {
		let rect = self.node_rect(node);
		let x = match kind {
			ActionKind::Explore => rect.x + BUTTON_INSET,
			ActionKind::Expand if node.can_expand() => rect.x + rect.w - BUTTON_INSET - BUTTON_WIDTH,
			ActionKind::Expand => return None,
		};
		Some(Rect {
			x,
			y: rect.y + BUTTON_TOP,
			w: BUTTON_WIDTH,
			h: BUTTON_HEIGHT,
		})
	}

	/// A button is disabled while its own action is in flight.
	pub fn button_enabled(node: &TopicNode, kind: ActionKind) -> bool {
		match kind {
			ActionKind::Expand => node.can_expand() && !node.is_expanding(),
			ActionKind::Explore => !node.is_exploring(),
		}
	}

	/// Topmost element under a screen point. Disabled buttons count as node body.
	pub fn hit_test(&self, store: &GraphStore, sx: f64, sy: f64) -> Hit {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		for node in store.nodes().iter().rev() {
			if !self.node_rect(node).contains(gx, gy) {
				continue;
			}
			for kind in [ActionKind::Explore, ActionKind::Expand] {
				let on_button = self
					.button_rect(node, kind)
					.is_some_and(|r| r.contains(gx, gy));
				if on_button && Self::button_enabled(node, kind) {
					return Hit::Button(node.id.clone(), kind);
				}
			}
			return Hit::Node(node.id.clone());
		}
		Hit::Background
	}

	pub fn pointer_down(&mut self, store: &GraphStore, x: f64, y: f64) {
		match self.hit_test(store, x, y) {
			Hit::Button(node, kind) => {
				self.press = Some(PressState {
					node,
					kind,
					start_x: x,
					start_y: y,
				});
			}
			Hit::Node(node) => {
				self.drag = DragState {
					active: true,
					offset_start: self.offsets.get(&node).copied().unwrap_or_default(),
					node: Some(node),
					start_x: x,
					start_y: y,
				};
			}
			Hit::Background => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, store: &GraphStore, x: f64, y: f64) {
		if self.drag.active {
			if let Some(node) = self.drag.node.clone() {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (ox, oy) = self.drag.offset_start;
				self.offsets.insert(node, (ox + dx, oy + dy));
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		} else {
			self.hover = match self.hit_test(store, x, y) {
				Hit::Button(node, kind) => HoverState {
					node: Some(node),
					button: Some(kind),
				},
				Hit::Node(node) => HoverState {
					node: Some(node),
					button: None,
				},
				Hit::Background => HoverState::default(),
			};
		}
	}

	/// Finish a gesture. A press released on the same enabled button, without
	/// wandering off, becomes an action.
	pub fn pointer_up(&mut self, store: &GraphStore, x: f64, y: f64) -> Option<NodeAction> {
		self.drag = DragState::default();
		self.pan.active = false;
		let press = self.press.take()?;
		let moved = (x - press.start_x).hypot(y - press.start_y);
		if moved > CLICK_SLOP {
			return None;
		}
		match self.hit_test(store, x, y) {
			Hit::Button(node, kind) if node == press.node && kind == press.kind => {
				Some(NodeAction { node_id: node, kind })
			}
			_ => None,
		}
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.press = None;
		self.hover = HoverState::default();
	}

	/// Zoom by one wheel notch, keeping the point under the cursor fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Reset the camera so the root sits centred near the top edge.
	pub fn fit_to(&mut self, store: &GraphStore) {
		self.offsets.clear();
		self.hover = HoverState::default();
		self.press = None;
		self.transform.k = 1.0;
		let root = store.root().map(|n| n.position).unwrap_or_default();
		self.transform.x = self.width / 2.0 - root.x;
		self.transform.y = 40.0 - root.y;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Shorten a label to fit a node box.
pub fn fit_label(label: &str) -> String {
	if label.chars().count() <= LABEL_CHARS {
		return label.to_string();
	}
	let mut short: String = label.chars().take(LABEL_CHARS - 1).collect();
	short.push('…');
	short
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::roadmap::{ExpansionState, NodeFlag};

	fn store() -> GraphStore {
		let mut store = GraphStore::new();
		store.load_graph(
			vec![TopicNode::new("1".into(), "Rust", 0, Position::new(400.0, 50.0))],
			Vec::new(),
		);
		store
	}

	fn view(store: &GraphStore) -> RoadmapViewState {
		let mut view = RoadmapViewState::new(800.0, 600.0);
		view.fit_to(store);
		view
	}

	/// Screen coordinates of the centre of a node's button.
	fn button_center(view: &RoadmapViewState, store: &GraphStore, kind: ActionKind) -> (f64, f64) {
		let node = store.node(&"1".into()).unwrap();
		let r = view.button_rect(node, kind).unwrap();
		let (gx, gy) = (r.x + r.w / 2.0, r.y + r.h / 2.0);
		(
			gx * view.transform.k + view.transform.x,
			gy * view.transform.k + view.transform.y,
		)
	}

	#[test]
	fn fit_centres_the_root() {
		let store = store();
		let view = view(&store);
		let node = store.node(&"1".into()).unwrap();
		let rect = view.node_rect(node);
		assert_eq!(rect.x + rect.w / 2.0 + view.transform.x, 400.0);
		assert_eq!(rect.y + view.transform.y, 40.0);
	}

	#[test]
	fn hit_test_finds_buttons_body_and_background() {
		let store = store();
		let view = view(&store);
		let (ex, ey) = button_center(&view, &store, ActionKind::Expand);
		assert_eq!(view.hit_test(&store, ex, ey), Hit::Button("1".into(), ActionKind::Expand));
		let (px, py) = button_center(&view, &store, ActionKind::Explore);
		assert_eq!(view.hit_test(&store, px, py), Hit::Button("1".into(), ActionKind::Explore));
		assert_eq!(view.hit_test(&store, 400.0, 50.0), Hit::Node("1".into()));
		assert_eq!(view.hit_test(&store, 5.0, 590.0), Hit::Background);
	}

	#[test]
	fn disabled_buttons_are_not_hit() {
		let mut store = store();
		let view = view(&store);
		let (ex, ey) = button_center(&view, &store, ActionKind::Expand);
		store.set_node_flag(&"1".into(), NodeFlag::Expanding, true);
		assert_eq!(view.hit_test(&store, ex, ey), Hit::Node("1".into()));
	}

	#[test]
	fn expanded_nodes_lose_the_expand_button() {
		let mut store = store();
		store.mark_expanded(&"1".into());
		let node = store.node(&"1".into()).unwrap();
		assert_eq!(node.expansion, ExpansionState::Expanded);
		let view = view(&store);
		assert!(view.button_rect(node, ActionKind::Expand).is_none());
		assert!(view.button_rect(node, ActionKind::Explore).is_some());
	}

	#[test]
	fn click_on_button_emits_action() {
		let store = store();
		let mut view = view(&store);
		let (x, y) = button_center(&view, &store, ActionKind::Explore);
		view.pointer_down(&store, x, y);
		let action = view.pointer_up(&store, x + 1.0, y);
		assert_eq!(
			action,
			Some(NodeAction {
				node_id: "1".into(),
				kind: ActionKind::Explore
			})
		);
	}

	#[test]
	fn press_dragged_off_the_button_is_not_a_click() {
		let store = store();
		let mut view = view(&store);
		let (x, y) = button_center(&view, &store, ActionKind::Expand);
		view.pointer_down(&store, x, y);
		assert_eq!(view.pointer_up(&store, x + 60.0, y + 60.0), None);
	}

	#[test]
	fn dragging_a_node_moves_only_the_view() {
		let store = store();
		let mut view = view(&store);
		view.pointer_down(&store, 400.0, 50.0);
		view.pointer_move(&store, 430.0, 70.0);
		view.pointer_up(&store, 430.0, 70.0);

		let node = store.node(&"1".into()).unwrap();
		assert_eq!(node.position, Position::new(400.0, 50.0));
		assert_eq!(view.node_origin(node), Position::new(430.0, 70.0));
	}

	#[test]
	fn panning_moves_the_camera() {
		let store = store();
		let mut view = view(&store);
		let before = view.transform.clone();
		view.pointer_down(&store, 10.0, 500.0);
		view.pointer_move(&store, 60.0, 480.0);
		assert_eq!(view.transform.x, before.x + 50.0);
		assert_eq!(view.transform.y, before.y - 20.0);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let store = store();
		let mut view = view(&store);
		let before = view.screen_to_graph(300.0, 200.0);
		view.zoom_at(300.0, 200.0, -1.0);
		let after = view.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!((view.transform.k - 1.1).abs() < 1e-9);
	}

	#[test]
	fn long_labels_are_shortened() {
		assert_eq!(fit_label("Ownership"), "Ownership");
		let long = fit_label("An extremely long topic name that overflows");
		assert_eq!(long.chars().count(), 24);
		assert!(long.ends_with('…'));
	}
}
