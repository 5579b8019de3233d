//! Collision-only force simulation.
//!
//! Each tick resolves overlaps between every pair of nearby nodes by nudging
//! their velocities apart, then integrates velocity into position for every
//! node without a fixed position. There are no attractive forces: the layout
//! is whatever non-overlapping arrangement the nodes relax into.

use std::collections::HashMap;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::boundary::{clamp_to_square, enforce_boundaries};
use super::config::{CanvasConfig, LayoutConfig, LayoutMode, SimulationConfig};
use super::layout::affinity_positions;
use super::node::Node;
use super::store::{NodeStore, ReconcileSummary};
use super::types::CanvasItem;

pub struct Simulation {
	store: NodeStore,
	config: SimulationConfig,
	layout: LayoutConfig,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	rng: SmallRng,
}

impl Simulation {
	pub fn new(config: &CanvasConfig, seed: u64) -> Self {
		Self {
			store: NodeStore::new(),
			config: config.simulation.clone(),
			layout: config.layout.clone(),
			alpha: config.simulation.restart_alpha,
			alpha_target: 0.0,
			running: false,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Builds a simulation over `items`, albums and genres together so
	/// cross-kind collisions are resolved in one pass.
	pub fn with_items(items: &[CanvasItem], config: &CanvasConfig, seed: u64) -> Self {
		let mut sim = Self::new(config, seed);
		sim.set_items(items);
		info!("simulation created with {} nodes", sim.store.len());
		sim
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn side(&self) -> f64 {
		self.layout.logical_size
	}

	pub fn layout(&self) -> &LayoutConfig {
		&self.layout
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn nodes(&self) -> &[Node] {
		self.store.nodes()
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.store.get(id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.store.get_mut(id)
	}

	pub fn len(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Converts host records and replaces the node set with them. Records
	/// that cannot become nodes are skipped with a warning.
	pub fn set_items(&mut self, items: &[CanvasItem]) -> ReconcileSummary {
		let nodes = items
			.iter()
			.filter_map(|item| match Node::from_item(item, &self.layout) {
				Ok(node) => Some(node),
				Err(err) => {
					warn!("skipping record: {err}");
					None
				}
			})
			.collect();
		self.set_nodes(nodes)
	}

	/// Replaces the working node set without a full restart. Surviving ids
	/// keep their state, new nodes are placed, removed nodes are forgotten.
	pub fn set_nodes(&mut self, nodes: Vec<Node>) -> ReconcileSummary {
		let summary = self.store.reconcile(nodes);
		for id in &summary.duplicates {
			warn!("dropping duplicate node {id}");
		}
		self.place_unplaced();
		info!(
			"node set replaced: {} kept, {} added, {} removed",
			summary.kept, summary.added, summary.removed
		);
		if summary.added > 0 || summary.removed > 0 {
			self.restart(self.config.restart_alpha);
		}
		summary
	}

	pub fn remove(&mut self, id: &str) -> Option<Node> {
		let node = self.store.remove(id)?;
		self.restart(self.config.restart_alpha);
		Some(node)
	}

	/// Re-energizes the simulation so the layout visibly resettles.
	pub fn restart(&mut self, alpha: f64) {
		self.alpha = alpha;
		self.running = true;
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Advances one step. Inert on an empty node set.
	pub fn tick(&mut self) {
		if self.is_empty() {
			return;
		}
		self.place_unplaced();
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_collisions();

		let keep = 1.0 - self.config.velocity_decay;
		for node in self.store.nodes_mut() {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}

		enforce_boundaries(self.store.nodes_mut(), self.layout.logical_size);

		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
	}

	/// Symmetric soft collision between every overlapping pair.
	///
	/// Overlap is measured on predicted positions (`x + vx`). The correction
	/// is split between the two nodes weighted by the other node's squared
	/// radius, so small nodes yield more. A node with a fixed position takes
	/// no share and its partner takes all of it.
	fn apply_collisions(&mut self) {
		let strength = self.config.collision_strength;
		let nodes = self.store.nodes_mut();
		let n = nodes.len();
		let max_r = nodes
			.iter()
			.map(Node::collision_radius)
			.fold(0.0_f64, f64::max);
		if n < 2 || max_r <= 0.0 {
			return;
		}

		// Any overlapping pair lies in the same or an adjacent cell.
		let cell = 2.0 * max_r;
		let key = |x: f64, y: f64| ((x / cell).floor() as i32, (y / cell).floor() as i32);
		let mut bins: HashMap<(i32, i32), Vec<usize>> = HashMap::with_capacity(n * 2);
		for (i, node) in nodes.iter().enumerate() {
			bins.entry(key(node.x + node.vx, node.y + node.vy))
				.or_default()
				.push(i);
		}

		for i in 0..n {
			let (xi, yi) = (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy);
			let ri = nodes[i].collision_radius();
			let (gx, gy) = key(xi, yi);
			for (ox, oy) in NEIGHBORS {
				let Some(bucket) = bins.get(&(gx + ox, gy + oy)) else {
					continue;
				};
				for &j in bucket {
					if j <= i {
						continue;
					}
					let (free_i, free_j) = (!nodes[i].is_fixed(), !nodes[j].is_fixed());
					if !free_i && !free_j {
						continue;
					}
					let rj = nodes[j].collision_radius();
					let r = ri + rj;
					let mut dx = xi - nodes[j].x - nodes[j].vx;
					let mut dy = yi - nodes[j].y - nodes[j].vy;
					let mut l = dx * dx + dy * dy;
					if l >= r * r {
						continue;
					}
					if dx == 0.0 {
						dx = jiggle(&mut self.rng);
						l += dx * dx;
					}
					if dy == 0.0 {
						dy = jiggle(&mut self.rng);
						l += dy * dy;
					}
					let d = l.sqrt();
					let k = (r - d) / d * strength;
					dx *= k;
					dy *= k;

					let (share_i, share_j) = match (free_i, free_j) {
						(true, true) => {
							let w = rj * rj / (ri * ri + rj * rj);
							(w, 1.0 - w)
						}
						(true, false) => (1.0, 0.0),
						_ => (0.0, 1.0),
					};
					nodes[i].vx += dx * share_i;
					nodes[i].vy += dy * share_i;
					nodes[j].vx -= dx * share_j;
					nodes[j].vy -= dy * share_j;
				}
			}
		}
	}

	/// Gives every node without a position one, according to the layout mode.
	fn place_unplaced(&mut self) {
		if self.store.iter().all(Node::is_placed) {
			return;
		}
		let side = self.layout.logical_size;
		let seeded = match self.layout.mode {
			LayoutMode::GenreAffinity => {
				affinity_positions(self.store.nodes(), &self.layout, &mut self.rng)
			}
			LayoutMode::Random => HashMap::new(),
		};
		for node in self.store.nodes_mut() {
			if node.is_placed() {
				continue;
			}
			let r = node.boundary_radius();
			let (x, y) = match seeded.get(&node.id) {
				Some(&(x, y)) => clamp_to_square(r, side, x, y),
				None => random_point(&mut self.rng, r, side),
			};
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}

const NEIGHBORS: [(i32, i32); 9] = [
	(-1, -1),
	(0, -1),
	(1, -1),
	(-1, 0),
	(0, 0),
	(1, 0),
	(-1, 1),
	(0, 1),
	(1, 1),
];

fn jiggle(rng: &mut SmallRng) -> f64 {
	(rng.random::<f64>() - 0.5) * 1e-6
}

/// Uniform point in the square inset by `inset` on every side.
pub(crate) fn random_point(rng: &mut SmallRng, inset: f64, side: f64) -> (f64, f64) {
	let span = (side - 2.0 * inset).max(0.0);
	(
		rng.random::<f64>() * span + inset.min(side / 2.0),
		rng.random::<f64>() * span + inset.min(side / 2.0),
	)
}
