//! Per-pointer node dragging.
//!
//! A node is either free or held by exactly one pointer. While held it is
//! pinned (`fx`/`fy`) to the pointer, clamped to the square, and keeps
//! pushing free nodes out of its way; releasing it unpins it and lets the
//! simulation cool down on its own.

use std::collections::HashMap;

use log::{debug, warn};

use super::boundary::clamp_to_square;
use super::error::CanvasError;
use super::simulation::Simulation;

/// Identifies one input pointer: the mouse or a single touch.
pub type PointerId = i32;

pub const MOUSE_POINTER: PointerId = -1;

#[derive(Clone, Debug, PartialEq)]
struct DragSession {
	node_id: String,
	/// Node center minus pointer position at grab time.
	offset: (f64, f64),
	moved: bool,
}

/// Where a dragged node was let go.
#[derive(Clone, Debug, PartialEq)]
pub struct DragRelease {
	pub node_id: String,
	pub x: f64,
	pub y: f64,
	/// False when the pointer was released without moving.
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
	sessions: HashMap<PointerId, DragSession>,
}

impl DragController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_active(&self) -> bool {
		!self.sessions.is_empty()
	}

	pub fn holds(&self, pointer: PointerId) -> bool {
		self.sessions.contains_key(&pointer)
	}

	pub fn is_dragging(&self, node_id: &str) -> bool {
		self.sessions.values().any(|s| s.node_id == node_id)
	}

	/// Grabs `node_id` with `pointer` at logical point `(lx, ly)`. Returns
	/// false if the node is gone or already held by another pointer.
	pub fn start(
		&mut self,
		sim: &mut Simulation,
		pointer: PointerId,
		node_id: &str,
		lx: f64,
		ly: f64,
	) -> bool {
		if self.is_dragging(node_id) {
			return false;
		}
		let Some(node) = sim.node_mut(node_id) else {
			warn!("drag start: {}", CanvasError::UnknownNode(node_id.to_string()));
			return false;
		};
		node.vx = 0.0;
		node.vy = 0.0;
		node.fx = Some(node.x);
		node.fy = Some(node.y);
		node.dragging = true;
		let offset = (node.x - lx, node.y - ly);
		debug!("drag start {node_id} at ({:.1}, {:.1})", node.x, node.y);

		self.sessions.insert(
			pointer,
			DragSession {
				node_id: node_id.to_string(),
				offset,
				moved: false,
			},
		);
		let (target, alpha) = (sim.config().drag_alpha_target, sim.config().restart_alpha);
		sim.set_alpha_target(target);
		sim.restart(alpha);
		true
	}

	/// Moves the held node toward the pointer, clamped to the square.
	/// Returns the applied position, or `None` if nothing is held or the
	/// node vanished mid-gesture (the session is then dropped).
	pub fn move_to(
		&mut self,
		sim: &mut Simulation,
		pointer: PointerId,
		lx: f64,
		ly: f64,
	) -> Option<(f64, f64)> {
		let (node_id, offset) = {
			let session = self.sessions.get(&pointer)?;
			(session.node_id.clone(), session.offset)
		};
		let side = sim.side();
		let Some(node) = sim.node_mut(&node_id) else {
			warn!("dropping drag: {}", CanvasError::UnknownNode(node_id.clone()));
			self.sessions.remove(&pointer);
			return None;
		};
		let (x, y) = clamp_to_square(node.boundary_radius(), side, lx + offset.0, ly + offset.1);
		// Writing x/y as well as fx/fy keeps collisions from seeing a stale
		// position for one tick.
		node.x = x;
		node.y = y;
		node.fx = Some(x);
		node.fy = Some(y);
		node.vx = 0.0;
		node.vy = 0.0;
		if let Some(session) = self.sessions.get_mut(&pointer) {
			session.moved = true;
		}

		let alpha = sim.config().restart_alpha;
		sim.restart(alpha);
		Some((x, y))
	}

	/// Lets go of whatever `pointer` holds.
	pub fn end(&mut self, sim: &mut Simulation, pointer: PointerId) -> Option<DragRelease> {
		let session = self.sessions.remove(&pointer)?;
		if self.sessions.is_empty() {
			sim.set_alpha_target(0.0);
		}
		let Some(node) = sim.node_mut(&session.node_id) else {
			warn!("drag end: {}", CanvasError::UnknownNode(session.node_id.clone()));
			return None;
		};
		node.fx = None;
		node.fy = None;
		node.dragging = false;
		debug!("drag end {} at ({:.1}, {:.1})", node.id, node.x, node.y);
		Some(DragRelease {
			node_id: session.node_id,
			x: node.x,
			y: node.y,
			moved: session.moved,
		})
	}

	/// Drops sessions whose node is no longer in the simulation.
	pub fn prune(&mut self, sim: &mut Simulation) {
		let before = self.sessions.len();
		self.sessions.retain(|_, s| sim.node(&s.node_id).is_some());
		if before != self.sessions.len() && self.sessions.is_empty() {
			sim.set_alpha_target(0.0);
		}
	}

	/// Link to open for a double-clicked album, if it has one.
	pub fn open_link(sim: &Simulation, node_id: &str) -> Option<String> {
		sim.node(node_id)?.link().map(str::to_string)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bubble_canvas::config::CanvasConfig;
	use crate::components::bubble_canvas::node::tests::{album, genre};
	use crate::components::bubble_canvas::types::{AlbumRecord, CanvasItem};

	fn sim_with(items: &[CanvasItem]) -> Simulation {
		Simulation::with_items(items, &CanvasConfig::default(), 3)
	}

	#[test]
	fn grab_and_release_in_place_is_idempotent() {
		let mut sim = sim_with(&[album("a", 140.0, Some((300.0, 300.0)))]);
		let mut drag = DragController::new();

		assert!(drag.start(&mut sim, MOUSE_POINTER, "a", 310.0, 290.0));
		let held = sim.node("a").unwrap();
		assert_eq!((held.fx, held.fy), (Some(300.0), Some(300.0)));
		assert!(held.dragging);

		let release = drag.end(&mut sim, MOUSE_POINTER).unwrap();
		assert!(!release.moved);
		let node = sim.node("a").unwrap();
		assert_eq!((node.x, node.y), (300.0, 300.0));
		assert_eq!((node.fx, node.fy), (None, None));
		assert!(!node.dragging);
	}

	#[test]
	fn drag_toward_corner_is_clamped() {
		let mut sim = sim_with(&[album("a", 140.0, Some((300.0, 300.0)))]);
		let mut drag = DragController::new();
		drag.start(&mut sim, MOUSE_POINTER, "a", 300.0, 300.0);

		let pos = drag.move_to(&mut sim, MOUSE_POINTER, 1850.0, 1850.0);

		assert_eq!(pos, Some((1844.0, 1844.0)));
		let node = sim.node("a").unwrap();
		assert_eq!((node.x, node.y), (1844.0, 1844.0));
		assert_eq!((node.fx, node.fy), (Some(1844.0), Some(1844.0)));
		assert_eq!((node.vx, node.vy), (0.0, 0.0));
	}

	#[test]
	fn grab_offset_is_preserved() {
		let mut sim = sim_with(&[genre("Soul", Some((500.0, 500.0)))]);
		let mut drag = DragController::new();
		drag.start(&mut sim, 4, "genre-Soul", 510.0, 495.0);
		assert_eq!(drag.move_to(&mut sim, 4, 610.0, 595.0), Some((600.0, 600.0)));
	}

	#[test]
	fn held_node_stays_put_while_others_yield() {
		let mut sim = sim_with(&[
			album("held", 140.0, Some((700.0, 700.0))),
			album("other", 140.0, Some((900.0, 700.0))),
		]);
		let mut drag = DragController::new();
		drag.start(&mut sim, MOUSE_POINTER, "held", 700.0, 700.0);
		drag.move_to(&mut sim, MOUSE_POINTER, 850.0, 700.0);
		for _ in 0..100 {
			sim.tick();
		}
		let held = sim.node("held").unwrap();
		assert_eq!((held.x, held.y), (850.0, 700.0));
		let other = sim.node("other").unwrap();
		let d = ((other.x - 850.0).powi(2) + (other.y - 700.0).powi(2)).sqrt();
		assert!(d >= 150.0, "distance {d}");
	}

	#[test]
	fn a_node_is_held_by_one_pointer_at_most() {
		let mut sim = sim_with(&[album("a", 100.0, Some((300.0, 300.0)))]);
		let mut drag = DragController::new();
		assert!(drag.start(&mut sim, 1, "a", 300.0, 300.0));
		assert!(!drag.start(&mut sim, 2, "a", 300.0, 300.0));
		assert!(!drag.holds(2));
	}

	#[test]
	fn vanished_node_is_a_safe_no_op() {
		let mut sim = sim_with(&[album("a", 100.0, Some((300.0, 300.0)))]);
		let mut drag = DragController::new();
		drag.start(&mut sim, MOUSE_POINTER, "a", 300.0, 300.0);
		sim.remove("a");

		assert_eq!(drag.move_to(&mut sim, MOUSE_POINTER, 400.0, 400.0), None);
		assert!(!drag.is_active());
		assert_eq!(drag.end(&mut sim, MOUSE_POINTER), None);
		assert!(!drag.start(&mut sim, MOUSE_POINTER, "missing", 0.0, 0.0));
	}

	#[test]
	fn release_lets_alpha_decay() {
		let mut sim = sim_with(&[album("a", 100.0, Some((300.0, 300.0)))]);
		let mut drag = DragController::new();
		drag.start(&mut sim, MOUSE_POINTER, "a", 300.0, 300.0);
		for _ in 0..400 {
			sim.tick();
		}
		assert!(sim.is_running());
		drag.end(&mut sim, MOUSE_POINTER);
		for _ in 0..400 {
			sim.tick();
		}
		assert!(!sim.is_running());
	}

	#[test]
	fn open_link_only_for_albums_with_links() {
		let linked = CanvasItem::Album(AlbumRecord {
			id: "l".into(),
			visual_size: 100.0,
			link: Some("https://open.example/album/l".into()),
			..Default::default()
		});
		let sim = sim_with(&[linked, album("plain", 100.0, None), genre("Funk", None)]);
		assert_eq!(
			DragController::open_link(&sim, "l").as_deref(),
			Some("https://open.example/album/l")
		);
		assert_eq!(DragController::open_link(&sim, "plain"), None);
		assert_eq!(DragController::open_link(&sim, "genre-Funk"), None);
	}
}
