//! Genre-affinity seeding layout.
//!
//! Runs a short spring/charge simulation in which every album is tied to
//! the genre markers it lists, so new albums start out near their genres.
//! Nodes that already have a position take part as anchors. Only the
//! starting positions come from here; the collision simulation takes over
//! afterwards.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;
use rand::rngs::SmallRng;

use super::boundary::clamp_to_square;
use super::config::LayoutConfig;
use super::node::{Node, NodeKind};
use super::simulation::random_point;

const SEED_STEPS: usize = 240;
const SEED_DT: f32 = 0.016;
/// Share of the square kept clear around seeded positions.
const SEED_MARGIN: f64 = 0.05;

/// Returns a starting position for every node in `nodes` that is not yet
/// placed.
pub fn affinity_positions(
	nodes: &[Node],
	layout: &LayoutConfig,
	rng: &mut SmallRng,
) -> HashMap<String, (f64, f64)> {
	let side = layout.logical_size;
	if nodes.iter().all(Node::is_placed) {
		return HashMap::new();
	}

	let mut graph: ForceGraph<String> = ForceGraph::new(SimulationParameters {
		force_charge: 4000.0,
		force_spring: 0.3,
		force_max: 280.0,
		node_speed: 7000.0,
		damping_factor: 0.9,
	});

	let mut genre_idx = HashMap::new();
	let mut album_idx = Vec::new();
	for node in nodes {
		let anchored = node.is_placed();
		let (x, y) = if anchored {
			(node.x, node.y)
		} else {
			random_point(rng, node.boundary_radius(), side)
		};
		let idx = graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: 10.0,
			is_anchor: anchored,
			user_data: node.id.clone(),
		});
		match &node.kind {
			NodeKind::Genre(genre) => {
				genre_idx.insert(genre.label.to_lowercase(), idx);
			}
			NodeKind::Album(album) => album_idx.push((idx, &album.genres)),
		}
	}

	let mut links = 0;
	for (idx, genres) in album_idx {
		for genre in genres {
			if let Some(&target) = genre_idx.get(&genre.to_lowercase()) {
				graph.add_edge(idx, target, EdgeData::default());
				links += 1;
			}
		}
	}
	debug!("affinity seeding {} nodes with {links} genre links", nodes.len());

	for _ in 0..SEED_STEPS {
		graph.update(SEED_DT);
	}

	let radii: HashMap<&str, f64> = nodes
		.iter()
		.filter(|n| !n.is_placed())
		.map(|n| (n.id.as_str(), n.boundary_radius()))
		.collect();
	let mut seeded = Vec::with_capacity(radii.len());
	let mut reach: f64 = 0.0;
	let center = side / 2.0;
	graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		if !(x.is_finite() && y.is_finite()) {
			return;
		}
		reach = reach.max((x - center).abs()).max((y - center).abs());
		let id = node.data.user_data.as_str();
		if radii.contains_key(id) {
			seeded.push((id.to_string(), x, y));
		}
	});

	// Scale the whole layout about the square's center so its widest point
	// lands inside the margin. Anchors sit inside the square already, so
	// this only ever shrinks.
	let margin = radii.values().copied().fold(0.0, f64::max) + side * SEED_MARGIN;
	let half = (center - margin).max(0.0);
	let scale = if reach > half { half / reach } else { 1.0 };

	let mut positions: HashMap<String, (f64, f64)> = radii
		.keys()
		.map(|id| (id.to_string(), (center, center)))
		.collect();
	for (id, x, y) in seeded {
		let r = radii.get(id.as_str()).copied().unwrap_or(0.0);
		let (x, y) = (center + (x - center) * scale, center + (y - center) * scale);
		positions.insert(id, clamp_to_square(r, side, x, y));
	}
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bubble_canvas::node::tests::genre;
	use crate::components::bubble_canvas::types::{AlbumRecord, CanvasItem};
	use rand::SeedableRng;

	fn tagged_album(id: &str, genres: &[&str]) -> CanvasItem {
		CanvasItem::Album(AlbumRecord {
			id: id.into(),
			visual_size: 120.0,
			genres: genres.iter().map(|g| g.to_string()).collect(),
			..Default::default()
		})
	}

	#[test]
	fn seeds_only_unplaced_nodes_inside_the_square() {
		let layout = LayoutConfig::default();
		let items = vec![
			genre("Rock", Some((400.0, 400.0))),
			genre("Jazz", Some((1500.0, 1500.0))),
			tagged_album("a", &["rock"]),
			tagged_album("b", &["Jazz", "Rock"]),
			tagged_album("c", &[]),
		];
		let nodes: Vec<Node> = items
			.iter()
			.map(|i| Node::from_item(i, &layout).unwrap())
			.collect();
		let mut rng = SmallRng::seed_from_u64(1);

		let positions = affinity_positions(&nodes, &layout, &mut rng);

		assert_eq!(positions.len(), 3);
		assert!(!positions.contains_key("genre-Rock"));
		for (x, y) in positions.values() {
			assert!((66.0..=1854.0).contains(x));
			assert!((66.0..=1854.0).contains(y));
		}
	}

	#[test]
	fn seeds_keep_clear_of_the_walls() {
		let layout = LayoutConfig::default();
		let labels = [
			"Rock", "Funk", "Hip Hop", "Electronic", "Jazz", "Blues", "Soul", "Punk", "Alternative",
			"Indie", "Pop", "R&B",
		];
		let mut items: Vec<CanvasItem> = labels.iter().map(|l| genre(l, None)).collect();
		for i in 0..24 {
			let first = labels[i % labels.len()];
			let second = labels[(i * 5 + 1) % labels.len()];
			let id = format!("album-{i}");
			items.push(tagged_album(&id, &[first, second]));
		}
		let nodes: Vec<Node> = items
			.iter()
			.map(|i| Node::from_item(i, &layout).unwrap())
			.collect();
		let mut rng = SmallRng::seed_from_u64(7);

		let positions = affinity_positions(&nodes, &layout, &mut rng);

		assert_eq!(positions.len(), 36);
		for node in &nodes {
			let (x, y) = positions[&node.id];
			let r = node.boundary_radius();
			for v in [x, y] {
				assert!(v > r + 1.0 && v < 1920.0 - r - 1.0, "{} on a wall at ({x}, {y})", node.id);
			}
		}
	}

	#[test]
	fn nothing_to_seed_when_all_placed() {
		let layout = LayoutConfig::default();
		let nodes = vec![Node::from_item(&genre("Pop", Some((5.0, 5.0))), &layout).unwrap()];
		let mut rng = SmallRng::seed_from_u64(1);
		assert!(affinity_positions(&nodes, &layout, &mut rng).is_empty());
	}
}
