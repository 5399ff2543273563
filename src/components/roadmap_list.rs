use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::roadmap::RoadmapSummary;

fn summary_meta(roadmap: &RoadmapSummary) -> String {
	let mut meta = format!(
		"{} topics · depth {}",
		roadmap.total_nodes, roadmap.max_depth_reached
	);
	if let Some(day) = roadmap
		.created_at
		.as_deref()
		.and_then(|c| c.split('T').next())
	{
		meta.push_str(" · ");
		meta.push_str(day);
	}
	meta
}

/// The user's roadmaps, plus a form to start a new one.
#[component]
pub fn RoadmapList(
	#[prop(into)] roadmaps: Signal<Vec<RoadmapSummary>>,
	#[prop(into)] active: Signal<Option<String>>,
	#[prop(into)] busy: Signal<bool>,
	on_open: Callback<String>,
	on_create: Callback<String>,
	on_delete: Callback<String>,
) -> impl IntoView {
	let topic = RwSignal::new(String::new());

	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let value = topic.get_untracked().trim().to_string();
		if value.is_empty() {
			return;
		}
		topic.set(String::new());
		on_create.run(value);
	};

	view! {
		<nav class="roadmap-list">
			<form on:submit=submit>
				<input
					type="text"
					placeholder="Start a roadmap, e.g. Rust"
					prop:value=move || topic.get()
					on:input=move |ev| topic.set(event_target_value(&ev))
				/>
				<button type="submit" disabled=move || busy.get()>
					"Create"
				</button>
			</form>
			<Show when=move || roadmaps.with(|r| r.is_empty())>
				<p class="empty">"No roadmaps yet."</p>
			</Show>
			<ul>
				<For
					each=move || roadmaps.get()
					key=|r| (r.id.clone(), r.total_nodes, r.max_depth_reached)
					children=move |roadmap: RoadmapSummary| {
						let meta = summary_meta(&roadmap);
						let (id, open_id, delete_id) =
							(roadmap.id.clone(), roadmap.id.clone(), roadmap.id.clone());
						let is_active = move || active.with(|a| a.as_deref() == Some(id.as_str()));
						view! {
							<li class:active=is_active>
								<button class="open" on:click=move |_| on_open.run(open_id.clone())>
									{roadmap.title}
								</button>
								<span class="meta">{meta}</span>
								<button
									class="delete"
									disabled=move || busy.get()
									on:click=move |_| on_delete.run(delete_id.clone())
								>
									"Delete"
								</button>
							</li>
						}
					}
				/>
			</ul>
		</nav>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn meta_includes_creation_day() {
		let roadmap = RoadmapSummary {
			id: "1".into(),
			title: "Rust".into(),
			root_topic: "Rust".into(),
			total_nodes: 12,
			max_depth_reached: 3,
			created_at: Some("2024-05-02T08:30:00".into()),
		};
		assert_eq!(summary_meta(&roadmap), "12 topics · depth 3 · 2024-05-02");
	}
}
