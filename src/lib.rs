//! Leptos client-side app for exploring knowledge roadmaps.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod config;
pub mod error;
pub mod roadmap;
pub mod session;

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::session::Session;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Signed-in user bar; logging out forgets the persisted session.
#[component]
fn SessionBar(session: RwSignal<Option<Session>>) -> impl IntoView {
	let logout = move |_| {
		Session::clear();
		session.set(None);
		info!("signed out");
	};

	view! {
		<header class="session-bar">
			<span class="brand">"Knowledge Roadmaps"</span>
			{move || {
				session
					.get()
					.map(|s| {
						view! {
							<span class="user">{s.display_name().to_string()}</span>
							<button on:click=logout>"Log out"</button>
						}
					})
			}}
		</header>
	}
}

/// An app router which renders the roadmap explorer and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let session = RwSignal::new(Session::load());
	provide_context(session);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Knowledge Roadmaps" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<SessionBar session=session />
		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
