use leptos::prelude::*;

use crate::roadmap::Explanation;

fn text_section(title: &'static str, body: Option<String>) -> impl IntoView {
	body.filter(|b| !b.trim().is_empty()).map(|body| {
		view! {
			<section>
				<h3>{title}</h3>
				<p>{body}</p>
			</section>
		}
	})
}

fn list_section(title: &'static str, items: Vec<String>) -> impl IntoView {
	(!items.is_empty()).then(|| {
		view! {
			<section>
				<h3>{title}</h3>
				<ul>{items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}</ul>
			</section>
		}
	})
}

/// Side panel with the most recent exploration result. Closing clears it.
#[component]
pub fn ExplanationPanel(explanation: RwSignal<Option<Explanation>>) -> impl IntoView {
	move || {
		explanation.get().map(|e| {
			let explored = match e.exploration_count {
				1 => "Explored once".to_string(),
				n => format!("Explored {n} times"),
			};
			view! {
				<aside class="explanation-panel">
					<header>
						<h2>{e.topic_name}</h2>
						<button class="close" on:click=move |_| explanation.set(None)>
							"×"
						</button>
					</header>
					{e.description.map(|d| view! { <p class="description">{d}</p> })}
					{text_section("Explanation", e.ai_explanation)}
					{text_section("Why it matters", e.why_important)}
					{list_section("Key concepts", e.key_concepts)}
					{list_section("Real-world examples", e.real_world_examples)}
					{text_section("Learning tips", e.learning_tips)}
					<footer>{explored}</footer>
				</aside>
			}
		})
	}
}
