use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::RoadmapViewState;
use crate::roadmap::{GraphStore, NodeAction};

/// Receives node button clicks from the canvas.
pub type ActionHandler = Rc<dyn Fn(NodeAction)>;

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Window `resize` subscription; the listener is removed when this drops.
struct ResizeListener {
	window: Window,
	callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
	fn attach(window: &Window, callback: Closure<dyn FnMut()>) -> Option<Self> {
		window
			.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self {
			window: window.clone(),
			callback,
		})
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
	}
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Pannable, zoomable canvas view of the open roadmap.
///
/// The graph is redrawn every animation frame straight from `store`, so
/// merges made by the controller show up without any signal plumbing.
/// `fit_key` re-centres the camera on the root whenever it changes.
#[component]
pub fn RoadmapCanvas(
	store: Rc<RefCell<GraphStore>>,
	on_action: ActionHandler,
	#[prop(into)] fit_key: Signal<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let cursor = RwSignal::new("grab");
	let state: Rc<RefCell<Option<RoadmapViewState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize = StoredValue::new_local(None::<ResizeListener>);
	let (state_init, animate_init, store_init) = (state.clone(), animate.clone(), store.clone());

	on_cleanup(move || {
		resize.try_set_value(None);
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window; roadmap canvas disabled");
			return;
		};

		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("2d canvas context unavailable");
				return;
			}
		};

		let mut view = RoadmapViewState::new(w, h);
		view.fit_to(&store_init.borrow());
		*state_init.borrow_mut() = Some(view);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let on_resize = Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});
		// Replacing drops the previous listener, if the effect ran before.
		resize.set_value(ResizeListener::attach(&window, on_resize));

		let (state_anim, store_anim, animate_inner) =
			(state_init.clone(), store_init.clone(), animate_init.clone());
		let canvas_anim = canvas.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Stop once the canvas has been unmounted.
			if !canvas_anim.is_connected() {
				return;
			}
			if let Some(ref s) = *state_anim.borrow() {
				render::render(s, &store_anim.borrow(), &ctx);
			}
			let window: Option<Window> = web_sys::window();
			if let (Some(window), Some(cb)) = (window, animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_fit, store_fit) = (state.clone(), store.clone());
	Effect::new(move |_| {
		fit_key.track();
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit_to(&store_fit.borrow());
		}
	});

	let (state_md, store_md) = (state.clone(), store.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(&store_md.borrow(), x, y);
			if s.drag.active || s.pan.active {
				cursor.set("grabbing");
			}
		}
	};

	let (state_mm, store_mm) = (state.clone(), store.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(&store_mm.borrow(), x, y);
			let next = if s.drag.active || s.pan.active {
				"grabbing"
			} else if s.hover.button.is_some() {
				"pointer"
			} else {
				"grab"
			};
			if cursor.get_untracked() != next {
				cursor.set(next);
			}
		}
	};

	let (state_mu, store_mu) = (state.clone(), store.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let action = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(&store_mu.borrow(), x, y),
			None => None,
		};
		cursor.set("grab");
		if let Some(action) = action {
			on_action(action);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
		cursor.set("grab");
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="roadmap-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style:display="block"
			style:cursor=move || cursor.get()
		/>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use std::cell::Cell;

	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn fire_resize(window: &Window) {
		let event = web_sys::Event::new("resize").unwrap();
		window.dispatch_event(&event).unwrap();
	}

	#[wasm_bindgen_test]
	fn dropped_resize_listener_stops_firing() {
		let window = web_sys::window().unwrap();
		let fired = Rc::new(Cell::new(0));
		let counter = fired.clone();
		let listener = ResizeListener::attach(
			&window,
			Closure::new(move || counter.set(counter.get() + 1)),
		)
		.unwrap();

		fire_resize(&window);
		assert_eq!(fired.get(), 1);

		drop(listener);
		fire_resize(&window);
		assert_eq!(fired.get(), 1);
	}
}
