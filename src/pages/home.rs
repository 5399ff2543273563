use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info};

use crate::api::HttpRoadmapApi;
use crate::components::explanation_panel::ExplanationPanel;
use crate::components::roadmap_graph::{ActionHandler, RoadmapCanvas};
use crate::components::roadmap_list::RoadmapList;
use crate::config::{ApiConfig, LayoutConfig};
use crate::roadmap::{
	ActionOutcome, ExpandOutcome, ExpansionController, ExploreOutcome, Explanation, GraphStore,
	LayoutEngine, NodeAction, OpenOutcome, RoadmapSummary,
};
use crate::session::Session;

type Controller = ExpansionController<HttpRoadmapApi>;

/// Drop what belongs to the roadmap on screen before another one loads, so
/// a failed switch never leaves an explanation over the old graph.
fn begin_switch(explanation: RwSignal<Option<Explanation>>, busy: RwSignal<bool>) {
	explanation.set(None);
	busy.set(true);
}

/// Landing page: the roadmap explorer for a signed-in user.
#[component]
pub fn Home() -> impl IntoView {
	let session = expect_context::<RwSignal<Option<Session>>>();

	view! {
		<Show
			when=move || session.with(|s| s.is_some())
			fallback=|| {
				view! {
					<div class="signed-out">
						<h1>"Knowledge Roadmaps"</h1>
						<p>"Sign in to explore your knowledge roadmaps."</p>
					</div>
				}
			}
		>
			<RoadmapExplorer />
		</Show>
	}
}

#[component]
fn RoadmapExplorer() -> impl IntoView {
	let session = expect_context::<RwSignal<Option<Session>>>().get_untracked();
	let store = Rc::new(RefCell::new(GraphStore::new()));
	let api = HttpRoadmapApi::new(ApiConfig::default(), session);
	let controller: StoredValue<Rc<Controller>, LocalStorage> = StoredValue::new_local(Rc::new(
		ExpansionController::new(api, store.clone(), LayoutEngine::new(LayoutConfig::default())),
	));

	let roadmaps = RwSignal::new(Vec::<RoadmapSummary>::new());
	let open_id = RwSignal::new(None::<String>);
	// Sole owner of the side panel's content.
	let explanation = RwSignal::new(None::<Explanation>);
	let notice = RwSignal::new(None::<String>);
	let stats = RwSignal::new((0usize, 0u32));
	let busy = RwSignal::new(false);
	let fit_key = RwSignal::new(0u64);

	on_cleanup(move || {
		if let Some(ctl) = controller.try_get_value() {
			ctl.cancel_all();
		}
	});

	// Counts come from the local graph so they stay current between reloads.
	let refresh_stats = move || {
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		let (nodes, depth) = {
			let store = ctl.store().borrow();
			(store.len(), store.max_depth())
		};
		stats.set((nodes, depth));
		if let Some(id) = ctl.roadmap_id() {
			roadmaps.update(|list| {
				if let Some(r) = list.iter_mut().find(|r| r.id == id) {
					r.total_nodes = nodes as u32;
					r.max_depth_reached = depth;
				}
			});
		}
	};

	let reload_list = move || {
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match ctl.list_roadmaps().await {
				Ok(list) => {
					debug!("{} roadmaps listed", list.len());
					roadmaps.set(list);
				}
				Err(err) => notice.set(Some(err.message())),
			}
		});
	};

	let opened = move |outcome: OpenOutcome| {
		if let OpenOutcome::Opened { roadmap_id, .. } = outcome {
			open_id.set(Some(roadmap_id));
			fit_key.update(|k| *k += 1);
			refresh_stats();
		}
	};

	let on_open = Callback::new(move |roadmap_id: String| {
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		begin_switch(explanation, busy);
		spawn_local(async move {
			match ctl.open_roadmap(&roadmap_id).await {
				Ok(outcome) => opened(outcome),
				Err(err) => notice.set(Some(err.message())),
			}
			busy.set(false);
		});
	});

	let on_create = Callback::new(move |root_topic: String| {
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		begin_switch(explanation, busy);
		spawn_local(async move {
			match ctl.create_roadmap(&root_topic).await {
				Ok(outcome) => {
					opened(outcome);
					reload_list();
				}
				Err(err) => notice.set(Some(err.message())),
			}
			busy.set(false);
		});
	});

	let on_delete = Callback::new(move |roadmap_id: String| {
		let confirmed = window()
			.confirm_with_message("Delete this roadmap and all of its topics?")
			.unwrap_or(false);
		if !confirmed {
			return;
		}
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match ctl.delete_roadmap(&roadmap_id).await {
				Ok(()) => {
					if open_id.get_untracked().as_deref() == Some(roadmap_id.as_str()) {
						open_id.set(None);
						explanation.set(None);
						refresh_stats();
					}
					roadmaps.update(|list| list.retain(|r| r.id != roadmap_id));
				}
				Err(err) => notice.set(Some(err.message())),
			}
		});
	});

	let on_action: ActionHandler = Rc::new(move |action: NodeAction| {
		let Some(ctl) = controller.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match ctl.dispatch(action).await {
				Ok(ActionOutcome::Explore(ExploreOutcome::Explored(e))) => {
					explanation.set(Some(e));
				}
				Ok(ActionOutcome::Expand(ExpandOutcome::Expanded { added })) => {
					info!("{added} topics added to the roadmap");
					refresh_stats();
				}
				Ok(ActionOutcome::Expand(ExpandOutcome::AlreadyExpanded)) => refresh_stats(),
				Ok(_) => {}
				Err(err) => notice.set(Some(err.message())),
			}
		});
	});

	reload_list();

	view! {
		<div class="roadmap-explorer">
			<RoadmapList
				roadmaps=roadmaps
				active=open_id
				busy=busy
				on_open=on_open
				on_create=on_create
				on_delete=on_delete
			/>
			<main class="roadmap-stage">
				<header class="roadmap-toolbar">
					<span class="roadmap-stats">
						{move || {
							open_id
								.get()
								.map(|_| {
									let (nodes, depth) = stats.get();
									format!("{nodes} topics · max depth {depth}")
								})
						}}
					</span>
					<button on:click=move |_| fit_key.update(|k| *k += 1)>"Recenter"</button>
				</header>
				{move || {
					notice
						.get()
						.map(|message| {
							view! {
								<div class="notice" role="alert">
									<span>{message}</span>
									<button on:click=move |_| notice.set(None)>"Dismiss"</button>
								</div>
							}
						})
				}}
				<Show when=move || open_id.with(|id| id.is_none())>
					<p class="roadmap-hint">"Open a roadmap or start a new one."</p>
				</Show>
				<div class="roadmap-canvas-wrap">
					<RoadmapCanvas store=store on_action=on_action fit_key=fit_key />
				</div>
			</main>
			<ExplanationPanel explanation=explanation />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn switching_roadmaps_closes_the_panel_up_front() {
		let explanation = RwSignal::new(Some(Explanation {
			topic_name: "Ownership".into(),
			..Explanation::default()
		}));
		let busy = RwSignal::new(false);

		begin_switch(explanation, busy);
		assert!(explanation.get_untracked().is_none());
		assert!(busy.get_untracked());
	}
}
