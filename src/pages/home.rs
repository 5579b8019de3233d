use leptos::prelude::*;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_sys::DragEvent;

use crate::components::bubble_canvas::config::LayoutConfig;
use crate::components::bubble_canvas::{
	AlbumRecord, BubbleCanvas, CanvasConfig, CanvasItem, DRAG_PAYLOAD_TYPE, GenreRecord, LayoutMode,
	PlacedItem,
};

/// Genre catalogue with halo colors.
const GENRES: [(&str, &str); 12] = [
	("Rock", "#FF6B6B"),
	("Funk", "#4ECDC4"),
	("Hip Hop", "#FFE66D"),
	("Electronic", "#A8E6CF"),
	("Jazz", "#FF8B94"),
	("Blues", "#95E1D3"),
	("Soul", "#F38181"),
	("Punk", "#AA96DA"),
	("Alternative", "#FCBAD3"),
	("Indie", "#FFD93D"),
	("Pop", "#6BCB77"),
	("R&B", "#FFD700"),
];

const ALBUMS_ON_CANVAS: usize = 24;
const ALBUMS_IN_LIBRARY: usize = 16;
const CATALOGUE_SEED: u64 = 1979;

fn genre_items() -> Vec<CanvasItem> {
	GENRES
		.iter()
		.map(|(label, color)| {
			CanvasItem::Genre(GenreRecord {
				id: format!("genre-{}", label.to_lowercase().replace(' ', "-")),
				label: label.to_string(),
				color: Some(color.to_string()),
				x: None,
				y: None,
			})
		})
		.collect()
}

/// Sample albums with picsum covers, each tagged with one or two genres.
/// The same seed always yields the same catalogue.
fn sample_albums(n: usize, seed: u64) -> Vec<CanvasItem> {
	let mut rng = SmallRng::seed_from_u64(seed);
	(0..n)
		.map(|i| {
			let first = rng.random_range(0..GENRES.len());
			let mut genres = vec![GENRES[first].0.to_string()];
			if rng.random_bool(0.4) {
				genres.push(GENRES[(first + 1) % GENRES.len()].0.to_string());
			}
			CanvasItem::Album(AlbumRecord {
				id: format!("album-{i}"),
				title: format!("Album {}", i + 1),
				artist_name: format!("Artist {}", i % 9 + 1),
				image: Some(format!("https://picsum.photos/seed/album-{i}/200/200")),
				link: Some(format!("https://music.example.com/album/{i}")),
				visual_size: f64::from(rng.random_range(80_u32..=140)),
				genres,
				x: None,
				y: None,
			})
		})
		.collect()
}

fn remove_by_id(items: &mut Vec<CanvasItem>, id: &str) -> Option<CanvasItem> {
	let idx = items.iter().position(|item| item.id() == id)?;
	Some(items.remove(idx))
}

fn describe(item: &CanvasItem) -> String {
	match item {
		CanvasItem::Album(a) => format!("{} · {}", a.title, a.artist_name),
		CanvasItem::Genre(g) => g.label.to_uppercase(),
	}
}

#[component]
fn LibraryEntry(item: CanvasItem) -> impl IntoView {
	let label = describe(&item);
	let cover = match &item {
		CanvasItem::Album(a) => a.image.clone(),
		CanvasItem::Genre(_) => None,
	};
	let on_dragstart = move |ev: DragEvent| {
		let Some(dt) = ev.data_transfer() else {
			return;
		};
		match item.to_payload() {
			Ok(payload) => {
				let _ = dt.set_data(DRAG_PAYLOAD_TYPE, &payload);
				dt.set_effect_allowed("move");
			}
			Err(err) => warn!("cannot drag {}: {err}", item.id()),
		}
	};

	view! {
		<li class="library-entry" draggable="true" on:dragstart=on_dragstart>
			{cover.map(|src| view! { <img src=src width="40" height="40" alt="" /> })}
			<span>{label}</span>
		</li>
	}
}

/// Library shelf beside the bubble canvas; items move between the two.
#[component]
pub fn Home() -> impl IntoView {
	let mut albums = sample_albums(ALBUMS_ON_CANVAS + ALBUMS_IN_LIBRARY, CATALOGUE_SEED);
	let shelved = albums.split_off(ALBUMS_ON_CANVAS);
	let mut initial = genre_items();
	initial.extend(albums);

	let canvas_items = RwSignal::new(initial);
	let library = RwSignal::new(shelved);
	let config = CanvasConfig {
		layout: LayoutConfig {
			mode: LayoutMode::GenreAffinity,
			..Default::default()
		},
		..Default::default()
	};

	let on_moved_out = move |(item, _): PlacedItem| {
		info!("{} moved to the library", item.id());
		canvas_items.update(|items| {
			remove_by_id(items, item.id());
		});
		library.update(|items| items.insert(0, item));
	};

	let on_dropped = move |(item, (x, y)): PlacedItem| {
		info!("{} dropped at ({x:.0}, {y:.0})", item.id());
		library.update(|items| {
			remove_by_id(items, item.id());
		});
		canvas_items.update(|items| match items.iter_mut().find(|i| i.id() == item.id()) {
			Some(existing) => existing.set_position(x, y),
			None => items.push(item),
		});
	};

	let on_persist = move |(item, (x, y)): PlacedItem| {
		canvas_items.update(|items| {
			if let Some(existing) = items.iter_mut().find(|i| i.id() == item.id()) {
				existing.set_position(x, y);
			}
		});
	};

	view! {
		<div class="workspace">
			<aside class="library">
				<h2>"Library"</h2>
				<ul>
					<For
						each=move || library.get()
						key=|item| item.id().to_string()
						let:item
					>
						<LibraryEntry item=item />
					</For>
				</ul>
			</aside>
			<div class="canvas-area">
				<BubbleCanvas
					data=canvas_items
					config=config
					on_item_moved_across_boundary=on_moved_out
					on_item_dropped_on_canvas=on_dropped
					on_position_persist=on_persist
				/>
				<div class="canvas-overlay">
					<h1>"Album Bubbles"</h1>
					<p class="subtitle">
						"Drag covers around, or onto the library to shelve them. Scroll to pan, ctrl+scroll to zoom. Double-click to open."
					</p>
				</div>
			</div>
		</div>
	}
}
