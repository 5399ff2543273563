use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_HEIGHT, Rect, RoadmapViewState, fit_label};
use crate::roadmap::{ActionKind, GraphStore, NodeBadge, TopicNode};

const BACKGROUND: &str = "#1a1a2e";
const EDGE_COLOR: &str = "rgba(100, 180, 255, 0.7)";
const NODE_FILL: &str = "#24243e";
const NODE_FILL_HOVER: &str = "#2e2e52";
const CORNER: f64 = 10.0;

fn badge_color(badge: NodeBadge) -> &'static str {
	match badge {
		NodeBadge::Explored => "#2ca02c",
		NodeBadge::Expanded => "#1f77b4",
		NodeBadge::Unexplored => "#7f7f7f",
	}
}

pub fn render(state: &RoadmapViewState, store: &GraphStore, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, store, ctx);
	draw_nodes(state, store, ctx);
	ctx.restore();
}

fn draw_edges(state: &RoadmapViewState, store: &GraphStore, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow = 8.0 / k.max(0.5);
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_fill_style_str(EDGE_COLOR);
	ctx.set_line_width(1.5 / k.max(0.5));

	for edge in store.edges() {
		let (Some(parent), Some(child)) = (store.node(&edge.source), store.node(&edge.target))
		else {
			continue;
		};
		let from = state.node_origin(parent);
		let to = state.node_origin(child);
		let (x1, y1) = (from.x, from.y + NODE_HEIGHT);
		let (x2, y2) = (to.x, to.y - arrow);
		let bend = (y2 - y1).abs() / 2.0;

		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.bezier_curve_to(x1, y1 + bend, x2, y2 - bend, x2, y2);
		ctx.stroke();

		// Curve ends vertically, so the arrowhead points straight down.
		ctx.begin_path();
		ctx.move_to(to.x, to.y);
		ctx.line_to(to.x - arrow * 0.5, y2);
		ctx.line_to(to.x + arrow * 0.5, y2);
		ctx.close_path();
		ctx.fill();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let (x, y, w, h) = (r.x, r.y, r.w, r.h);
	ctx.begin_path();
	ctx.move_to(x + radius, y);
	ctx.line_to(x + w - radius, y);
	ctx.quadratic_curve_to(x + w, y, x + w, y + radius);
	ctx.line_to(x + w, y + h - radius);
	ctx.quadratic_curve_to(x + w, y + h, x + w - radius, y + h);
	ctx.line_to(x + radius, y + h);
	ctx.quadratic_curve_to(x, y + h, x, y + h - radius);
	ctx.line_to(x, y + radius);
	ctx.quadratic_curve_to(x, y, x + radius, y);
	ctx.close_path();
}

fn draw_nodes(state: &RoadmapViewState, store: &GraphStore, ctx: &CanvasRenderingContext2d) {
	for node in store.nodes() {
		let hovered = state.hover.node.as_ref() == Some(&node.id);
		let rect = state.node_rect(node);
		let badge = node.badge();

		rounded_rect(ctx, &rect, CORNER);
		ctx.set_fill_style_str(if hovered { NODE_FILL_HOVER } else { NODE_FILL });
		ctx.fill();
		ctx.set_stroke_style_str(badge_color(badge));
		ctx.set_line_width(if hovered { 2.5 } else { 1.5 });
		// Dashed outline while a request for this node is pending.
		if node.is_expanding() || node.is_exploring() {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str("white");
		ctx.set_font("bold 14px sans-serif");
		let _ = ctx.fill_text(&fit_label(&node.label), rect.x + 12.0, rect.y + 24.0);

		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&format!("Level {}", node.depth), rect.x + 12.0, rect.y + 44.0);

		draw_badge(ctx, &rect, badge);
		draw_button(state, ctx, node, ActionKind::Explore);
		draw_button(state, ctx, node, ActionKind::Expand);
	}
}

fn draw_badge(ctx: &CanvasRenderingContext2d, node_rect: &Rect, badge: NodeBadge) {
	let (cx, cy) = (node_rect.x + node_rect.w - 14.0, node_rect.y + 14.0);
	ctx.begin_path();
	let _ = ctx.arc(cx, cy, 5.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(badge_color(badge));
	ctx.fill();

	ctx.set_font("10px sans-serif");
	ctx.set_text_align("right");
	let _ = ctx.fill_text(badge.label(), cx - 9.0, cy + 3.5);
	ctx.set_text_align("start");
}

fn draw_button(
	state: &RoadmapViewState,
	ctx: &CanvasRenderingContext2d,
	node: &TopicNode,
	kind: ActionKind,
) {
	let Some(rect) = state.button_rect(node, kind) else {
		return;
	};
	let enabled = RoadmapViewState::button_enabled(node, kind);
	let hovered =
		enabled && state.hover.node.as_ref() == Some(&node.id) && state.hover.button == Some(kind);
	let text = match kind {
		ActionKind::Explore if node.is_exploring() => "Exploring…",
		ActionKind::Explore => "Explore",
		ActionKind::Expand if node.is_expanding() => "Expanding…",
		ActionKind::Expand => "Expand",
	};

	rounded_rect(ctx, &rect, 6.0);
	ctx.set_fill_style_str(match (enabled, hovered) {
		(false, _) => "rgba(255, 255, 255, 0.08)",
		(true, true) => "rgba(100, 180, 255, 0.45)",
		(true, false) => "rgba(100, 180, 255, 0.25)",
	});
	ctx.fill();

	ctx.set_fill_style_str(if enabled {
		"white"
	} else {
		"rgba(255, 255, 255, 0.4)"
	});
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(text, rect.x + rect.w / 2.0, rect.y + rect.h / 2.0 + 4.0);
	ctx.set_text_align("start");
}
