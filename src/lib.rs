//! Album bubble canvas: a Leptos client-side app with a force-directed
//! canvas of album covers and genre labels.

use leptos::prelude::*;
use leptos_meta::{Html, Meta, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Routes browser logs through `console_log` and reports panics to the
/// console. Call once before mounting.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("console logging ready");
}

/// Root view: document head plus the canvas page, with everything else
/// falling through to the 404 page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Album Bubbles" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=NotFound>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
