//! Interaction state for one mounted canvas.
//!
//! Owns the simulation, camera, drag controller and gesture trackers, and
//! translates raw pointer input (viewport pixels relative to the canvas)
//! into node drags, pans and zooms. Anything the host must hear about is
//! returned as [`CanvasEvent`]s rather than called back directly, so the
//! caller can release its borrow first.

use std::collections::HashMap;

use log::{debug, warn};

use super::camera::{Camera, ViewTransform, WheelIntent};
use super::config::CanvasConfig;
use super::coords::CanvasFrame;
use super::drag::{DragController, MOUSE_POINTER, PointerId};
use super::node::{Node, NodeKind};
use super::scrollbar::{self, Axis, ScrollbarGeometry, ThumbDrag};
use super::simulation::Simulation;
use super::store::ReconcileSummary;
use super::types::CanvasItem;

const DOUBLE_TAP_MS: f64 = 300.0;
const DOUBLE_TAP_SLOP: f64 = 24.0;
/// Travel in pixels after which a touch no longer counts as a tap.
const TAP_SLOP: f64 = 8.0;

/// Notifications for the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	/// A node was dragged out of the canvas and removed from it.
	ItemMovedAcrossBoundary { item: CanvasItem, x: f64, y: f64 },
	/// A library item was dropped inside the square at logical `(x, y)`.
	ItemDroppedOnCanvas { item: CanvasItem, x: f64, y: f64 },
	/// A node settled somewhere worth remembering.
	PositionPersist { item: CanvasItem, x: f64, y: f64 },
	OpenExternalLink(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	Default,
	Grab,
	Grabbing,
}

impl Cursor {
	pub fn css(self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub pointer: PointerId,
	pub last_x: f64,
	pub last_y: f64,
}

#[derive(Clone, Copy, Debug)]
struct PinchState {
	pointers: (PointerId, PointerId),
	distance: f64,
	mid: (f64, f64),
}

pub struct BubbleCanvasState {
	pub sim: Simulation,
	pub drag: DragController,
	pub pan: PanState,
	pub hover: Option<String>,
	camera: Camera,
	config: CanvasConfig,
	scrollbars: ScrollbarGeometry,
	thumb_drag: Option<ThumbDrag>,
	touches: HashMap<PointerId, (f64, f64)>,
	pinch: Option<PinchState>,
	/// Where each touch that may still turn out to be a tap went down.
	tap_starts: HashMap<PointerId, (f64, f64)>,
	/// Time (ms) and place of the last single tap.
	last_tap: Option<(f64, f64, f64)>,
}

impl BubbleCanvasState {
	pub fn new(items: &[CanvasItem], width: f64, height: f64, config: CanvasConfig, seed: u64) -> Self {
		let frame = CanvasFrame::new(width, height, &config.layout);
		let camera = Camera::new(frame, config.zoom.clone());
		let scrollbars = scrollbar::geometry(&camera, &config.scrollbar);
		Self {
			sim: Simulation::with_items(items, &config, seed),
			drag: DragController::new(),
			pan: PanState::default(),
			hover: None,
			camera,
			config,
			scrollbars,
			thumb_drag: None,
			touches: HashMap::new(),
			pinch: None,
			tap_starts: HashMap::new(),
			last_tap: None,
		}
	}

	#[cfg(test)]
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	pub fn transform(&self) -> ViewTransform {
		self.camera.transform()
	}

	pub fn frame(&self) -> &CanvasFrame {
		self.camera.frame()
	}

	#[cfg(test)]
	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	pub fn scrollbars(&self) -> ScrollbarGeometry {
		self.scrollbars
	}

	/// Replaces the on-canvas records, keeping state for surviving ids.
	pub fn set_items(&mut self, items: &[CanvasItem]) -> ReconcileSummary {
		let summary = self.sim.set_items(items);
		self.drag.prune(&mut self.sim);
		if self.hover.as_deref().is_some_and(|id| self.sim.node(id).is_none()) {
			self.hover = None;
		}
		summary
	}

	/// Advances the simulation if it is awake. Returns whether it ticked.
	pub fn tick(&mut self) -> bool {
		if !self.sim.is_running() {
			return false;
		}
		self.sim.tick();
		true
	}

	/// Applies a camera change and refreshes scrollbar geometry in the same
	/// call, so the two never disagree.
	fn update_camera(&mut self, f: impl FnOnce(&mut Camera) -> ViewTransform) -> ViewTransform {
		let t = f(&mut self.camera);
		self.scrollbars = scrollbar::geometry(&self.camera, &self.config.scrollbar);
		t
	}

	#[cfg(test)]
	pub fn set_transform(&mut self, t: ViewTransform) -> ViewTransform {
		self.update_camera(|cam| cam.set_transform(t))
	}

	/// New viewport size. Node state, including an in-flight drag, is left
	/// alone; only the pixel mapping changes.
	pub fn resize(&mut self, width: f64, height: f64) {
		let frame = CanvasFrame::new(width, height, &self.config.layout);
		self.update_camera(|cam| cam.resize(frame));
	}

	/// Topmost interactive node under a viewport pixel. Genre labels paint
	/// above album covers.
	pub fn node_at(&self, px: f64, py: f64) -> Option<String> {
		let (lx, ly) = self.camera.screen_to_logical(px, py);
		let nodes = self.sim.nodes();
		nodes
			.iter()
			.rev()
			.filter(|n| n.is_genre())
			.chain(nodes.iter().rev().filter(|n| !n.is_genre()))
			.find(|n| n.is_placed() && n.contains(lx, ly))
			.map(|n| n.id.clone())
	}

	pub fn cursor(&self) -> Cursor {
		if self.drag.is_active() || self.pan.active || self.thumb_drag.is_some() {
			Cursor::Grabbing
		} else if self.hover.is_some() {
			Cursor::Grab
		} else {
			Cursor::Default
		}
	}

	/// Press: grab the node under the pointer, or start panning when the
	/// press lands on empty space. A press on a node never pans, even when
	/// another pointer already holds it, and nothing pans while a node is
	/// held.
	pub fn pointer_down(&mut self, pointer: PointerId, px: f64, py: f64) {
		if let Some(id) = self.node_at(px, py) {
			let (lx, ly) = self.camera.screen_to_logical(px, py);
			self.drag.start(&mut self.sim, pointer, &id, lx, ly);
			return;
		}
		if self.drag.is_active() {
			return;
		}
		self.pan = PanState {
			active: true,
			pointer,
			last_x: px,
			last_y: py,
		};
	}

	pub fn pointer_move(&mut self, pointer: PointerId, px: f64, py: f64) {
		if self.drag.holds(pointer) {
			let (lx, ly) = self.camera.screen_to_logical(px, py);
			self.drag.move_to(&mut self.sim, pointer, lx, ly);
		} else if self.pan.active && self.pan.pointer == pointer {
			let (dx, dy) = (px - self.pan.last_x, py - self.pan.last_y);
			self.pan.last_x = px;
			self.pan.last_y = py;
			self.update_camera(|cam| cam.pan_by_pixels(dx, dy));
		} else if pointer == MOUSE_POINTER {
			self.hover = self.node_at(px, py);
		}
	}

	/// Release, possibly outside the canvas. A node let go outside the
	/// viewport leaves the canvas.
	pub fn pointer_up(&mut self, pointer: PointerId, px: f64, py: f64) -> Vec<CanvasEvent> {
		let mut events = Vec::new();
		if self.pan.active && self.pan.pointer == pointer {
			self.pan.active = false;
		}
		let Some(release) = self.drag.end(&mut self.sim, pointer) else {
			return events;
		};
		if !self.frame().contains(px, py) {
			if let Some(node) = self.sim.remove(&release.node_id) {
				debug!("{} dragged off the canvas", node.id);
				events.push(CanvasEvent::ItemMovedAcrossBoundary {
					item: node.to_item(),
					x: release.x,
					y: release.y,
				});
			}
			if self.hover.as_deref() == Some(release.node_id.as_str()) {
				self.hover = None;
			}
		} else if release.moved
			&& let Some(node) = self.sim.node(&release.node_id)
		{
			events.push(CanvasEvent::PositionPersist {
				item: node.to_item(),
				x: release.x,
				y: release.y,
			});
		}
		events
	}

	pub fn pointer_leave(&mut self) {
		self.hover = None;
	}

	pub fn double_click(&self, px: f64, py: f64) -> Vec<CanvasEvent> {
		self.node_at(px, py)
			.and_then(|id| DragController::open_link(&self.sim, &id))
			.map(CanvasEvent::OpenExternalLink)
			.into_iter()
			.collect()
	}

	/// A finished tap at `now` milliseconds. Two taps close in time and
	/// space count as a double click.
	pub fn tap(&mut self, px: f64, py: f64, now: f64) -> Vec<CanvasEvent> {
		if let Some((at, x, y)) = self.last_tap.take()
			&& now - at <= DOUBLE_TAP_MS
			&& (px - x).hypot(py - y) <= DOUBLE_TAP_SLOP
		{
			return self.double_click(px, py);
		}
		self.last_tap = Some((now, px, py));
		Vec::new()
	}

	/// Returns true when the event was consumed and its default should be
	/// prevented.
	pub fn wheel(&mut self, px: f64, py: f64, dx: f64, dy: f64, ctrl: bool, meta: bool) -> bool {
		match WheelIntent::from_modifiers(ctrl, meta) {
			WheelIntent::Zoom => self.update_camera(|cam| cam.zoom_wheel(dy, px, py)),
			WheelIntent::Pan => self.update_camera(|cam| cam.pan_by_pixels(-dx, -dy)),
		};
		true
	}

	/// Wheel over a scrollbar: zoom still targets the main view, anchored
	/// on the viewport center.
	pub fn scrollbar_wheel(&mut self, dx: f64, dy: f64, ctrl: bool, meta: bool) -> bool {
		match WheelIntent::from_modifiers(ctrl, meta) {
			WheelIntent::Zoom => {
				let step = self.config.zoom.wheel_step;
				let factor = if dy > 0.0 { 1.0 / step } else { step };
				self.update_camera(|cam| cam.zoom_centered(factor))
			}
			WheelIntent::Pan => self.update_camera(|cam| cam.pan_by_pixels(-dx, -dy)),
		};
		true
	}

	pub fn thumb_down(&mut self, axis: Axis, pointer: f64) {
		self.thumb_drag = Some(ThumbDrag::new(axis, pointer, &self.scrollbars));
	}

	pub fn thumb_move(&mut self, pointer: f64) -> bool {
		let Some(drag) = self.thumb_drag else {
			return false;
		};
		let cfg = self.config.scrollbar.clone();
		self.update_camera(|cam| drag.update(cam, &cfg, pointer));
		true
	}

	/// Ends a thumb drag, returning the axis that was held.
	pub fn thumb_up(&mut self) -> Option<Axis> {
		self.thumb_drag.take().map(|d| d.axis)
	}

	pub fn thumb_axis(&self) -> Option<Axis> {
		self.thumb_drag.map(|d| d.axis)
	}

	pub fn touch_start(&mut self, id: PointerId, px: f64, py: f64) {
		self.touches.insert(id, (px, py));
		self.tap_starts.insert(id, (px, py));
		let free: Vec<PointerId> = self
			.touches
			.keys()
			.copied()
			.filter(|&t| !self.drag.holds(t))
			.collect();
		if self.pinch.is_none() && free.len() == 2 && !self.drag.is_active() {
			let (a, b) = (free[0], free[1]);
			if self.pan.active {
				self.pan.active = false;
			}
			self.pinch = self.pinch_between(a, b);
			self.tap_starts.clear();
			return;
		}
		if self.pinch.is_none() {
			self.pointer_down(id, px, py);
		}
	}

	pub fn touch_move(&mut self, id: PointerId, px: f64, py: f64) {
		self.touches.insert(id, (px, py));
		if let Some(&(sx, sy)) = self.tap_starts.get(&id)
			&& (px - sx).hypot(py - sy) > TAP_SLOP
		{
			self.tap_starts.remove(&id);
		}
		match self.pinch {
			Some(pinch) if pinch.pointers.0 == id || pinch.pointers.1 == id => {
				let Some(next) = self.pinch_between(pinch.pointers.0, pinch.pointers.1) else {
					return;
				};
				if pinch.distance > 0.0 && next.distance > 0.0 {
					let factor = next.distance / pinch.distance;
					let (dx, dy) = (next.mid.0 - pinch.mid.0, next.mid.1 - pinch.mid.1);
					self.update_camera(|cam| {
						cam.pan_by_pixels(dx, dy);
						cam.zoom_at(factor, next.mid.0, next.mid.1)
					});
				}
				self.pinch = Some(next);
			}
			_ => self.pointer_move(id, px, py),
		}
	}

	/// Lifts a finger at `now` milliseconds. A lone touch that never moved
	/// counts as a tap.
	pub fn touch_end(&mut self, id: PointerId, px: f64, py: f64, now: f64) -> Vec<CanvasEvent> {
		let tapped =
			self.tap_starts.remove(&id).is_some() && self.touches.len() == 1 && self.pinch.is_none();
		let mut events = self.release_touch(id, px, py);
		if tapped {
			events.extend(self.tap(px, py, now));
		}
		events
	}

	pub fn touch_cancel(&mut self, id: PointerId, px: f64, py: f64) -> Vec<CanvasEvent> {
		self.tap_starts.remove(&id);
		self.release_touch(id, px, py)
	}

	fn release_touch(&mut self, id: PointerId, px: f64, py: f64) -> Vec<CanvasEvent> {
		self.touches.remove(&id);
		if let Some(pinch) = self.pinch
			&& (pinch.pointers.0 == id || pinch.pointers.1 == id)
		{
			self.pinch = None;
			return Vec::new();
		}
		self.pointer_up(id, px, py)
	}

	fn pinch_between(&self, a: PointerId, b: PointerId) -> Option<PinchState> {
		let (pa, pb) = (self.touches.get(&a)?, self.touches.get(&b)?);
		Some(PinchState {
			pointers: (a, b),
			distance: ((pa.0 - pb.0).powi(2) + (pa.1 - pb.1).powi(2)).sqrt(),
			mid: ((pa.0 + pb.0) / 2.0, (pa.1 + pb.1) / 2.0),
		})
	}

	/// Handles an external drag-and-drop payload landing at viewport pixel
	/// `(px, py)`. Unreadable payloads and drops outside the square are
	/// ignored.
	pub fn drop_payload(&mut self, payload: &str, px: f64, py: f64) -> Vec<CanvasEvent> {
		let item = match CanvasItem::from_payload(payload) {
			Ok(item) => item,
			Err(err) => {
				warn!("ignoring drop: {err}");
				return Vec::new();
			}
		};
		let node = match Node::from_item(&item, self.sim.layout()) {
			Ok(node) => node,
			Err(err) => {
				warn!("ignoring drop: {err}");
				return Vec::new();
			}
		};
		let side = self.sim.side();
		let (lx, ly) = self.camera.screen_to_logical(px, py);
		if !(0.0..=side).contains(&lx) || !(0.0..=side).contains(&ly) {
			debug!("drop of {} outside the square at ({lx:.1}, {ly:.1})", node.id);
			return Vec::new();
		}
		let (x, y) = super::boundary::clamp_to_square(node.boundary_radius(), side, lx, ly);
		let restart = self.sim.config().restart_alpha;
		if let Some(existing) = self.sim.node_mut(&node.id)
			&& !existing.dragging
		{
			existing.x = x;
			existing.y = y;
			existing.vx = 0.0;
			existing.vy = 0.0;
			self.sim.restart(restart);
		}
		let item = item.with_position(x, y);
		vec![
			CanvasEvent::ItemDroppedOnCanvas {
				item: item.clone(),
				x,
				y,
			},
			CanvasEvent::PositionPersist { item, x, y },
		]
	}

	/// Visual hint for the renderer: the label of the genre being hovered.
	pub fn hovered_genre(&self) -> Option<&str> {
		let node = self.sim.node(self.hover.as_deref()?)?;
		match &node.kind {
			NodeKind::Genre(genre) => Some(genre.label.as_str()),
			NodeKind::Album(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bubble_canvas::node::tests::{album, genre};
	use crate::components::bubble_canvas::types::AlbumRecord;

	/// Viewport 1920x1920 maps the square 1:1.5; the identity camera puts
	/// logical (x, y) at pixel (x, y) * 1.5 - 480.
	fn state(items: &[CanvasItem]) -> BubbleCanvasState {
		BubbleCanvasState::new(items, 1920.0, 1920.0, CanvasConfig::default(), 42)
	}

	fn px(st: &BubbleCanvasState, lx: f64, ly: f64) -> (f64, f64) {
		st.camera().logical_to_screen(lx, ly)
	}

	#[test]
	fn press_on_node_drags_it() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let (x, y) = px(&st, 900.0, 900.0);
		st.pointer_down(MOUSE_POINTER, x, y);
		assert!(st.drag.is_dragging("a"));
		assert!(!st.pan.active);
		assert_eq!(st.cursor(), Cursor::Grabbing);

		let (x2, y2) = px(&st, 1000.0, 950.0);
		st.pointer_move(MOUSE_POINTER, x2, y2);
		let node = st.sim.node("a").unwrap();
		assert!((node.x - 1000.0).abs() < 1e-9 && (node.y - 950.0).abs() < 1e-9);

		let events = st.pointer_up(MOUSE_POINTER, x2, y2);
		assert!(matches!(
			events.as_slice(),
			[CanvasEvent::PositionPersist { item, .. }] if item.id() == "a"
		));
		assert!(!st.drag.is_active());
	}

	#[test]
	fn press_on_empty_space_pans_and_moves_scrollbars() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let before = (st.transform(), st.scrollbars());
		st.pointer_down(MOUSE_POINTER, 10.0, 10.0);
		assert!(st.pan.active);
		st.pointer_move(MOUSE_POINTER, 60.0, 30.0);
		let events = st.pointer_up(MOUSE_POINTER, 60.0, 30.0);

		assert!(events.is_empty());
		assert_ne!(st.transform(), before.0);
		assert_ne!(st.scrollbars(), before.1);
		assert_eq!(st.scrollbars(), scrollbar::geometry(st.camera(), &st.config().scrollbar));
		let node = st.sim.node("a").unwrap();
		assert_eq!((node.x, node.y), (900.0, 900.0));
	}

	#[test]
	fn release_outside_viewport_hands_node_over() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let (x, y) = px(&st, 900.0, 900.0);
		st.pointer_down(MOUSE_POINTER, x, y);
		st.pointer_move(MOUSE_POINTER, -40.0, 700.0);
		let events = st.pointer_up(MOUSE_POINTER, -40.0, 700.0);

		assert!(matches!(
			events.as_slice(),
			[CanvasEvent::ItemMovedAcrossBoundary { item, .. }] if item.id() == "a"
		));
		assert!(st.sim.node("a").is_none());
	}

	#[test]
	fn genre_label_wins_over_album_beneath() {
		let st = state(&[
			album("a", 200.0, Some((900.0, 900.0))),
			genre("Rock", Some((900.0, 900.0))),
		]);
		let (x, y) = px(&st, 905.0, 900.0);
		assert_eq!(st.node_at(x, y).as_deref(), Some("genre-Rock"));
	}

	#[test]
	fn wheel_pans_unless_zoom_modifier_held() {
		let mut st = state(&[]);
		let k = st.transform().k;
		st.wheel(500.0, 500.0, 0.0, 120.0, false, false);
		assert_eq!(st.transform().k, k);
		assert!(st.transform().y < 0.0);

		st.wheel(500.0, 500.0, 0.0, -120.0, true, false);
		assert!(st.transform().k > k);
	}

	#[test]
	fn scrollbar_wheel_zooms_around_center() {
		let mut st = state(&[]);
		let (cx, cy) = st.frame().viewport_center();
		let before = st.camera().screen_to_logical(cx, cy);
		st.scrollbar_wheel(0.0, 100.0, false, true);
		let after = st.camera().screen_to_logical(cx, cy);
		assert!(st.transform().k < 1.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn thumb_drag_pans_through_camera() {
		let mut st = state(&[]);
		let t = st.transform();
		st.thumb_down(Axis::Horizontal, 100.0);
		assert!(st.thumb_move(140.0));
		assert_eq!(st.thumb_up(), Some(Axis::Horizontal));
		assert!(st.transform().x < t.x);
		assert_eq!(st.transform().y, t.y);
		assert!(!st.thumb_move(200.0));
	}

	#[test]
	fn drop_inside_square_reports_logical_position() {
		let mut st = state(&[]);
		st.set_transform(ViewTransform {
			x: 100.0,
			y: -50.0,
			k: 2.0,
		});
		let payload = CanvasItem::Album(AlbumRecord {
			id: "lib-1".into(),
			visual_size: 140.0,
			..Default::default()
		})
		.to_payload()
		.unwrap();
		let (x, y) = px(&st, 700.0, 400.0);

		let events = st.drop_payload(&payload, x, y);

		let [CanvasEvent::ItemDroppedOnCanvas { item, x, y }, CanvasEvent::PositionPersist { .. }] =
			events.as_slice()
		else {
			panic!("unexpected events {events:?}");
		};
		assert!((x - 700.0).abs() < 1e-6 && (y - 400.0).abs() < 1e-6);
		assert_eq!(item.position().map(|p| p.0.round()), Some(700.0));
	}

	#[test]
	fn bad_or_outside_drops_are_ignored() {
		let mut st = state(&[]);
		assert!(st.drop_payload("{broken", 500.0, 500.0).is_empty());
		let payload = genre("Jazz", None).to_payload().unwrap();
		// Pixel (0, 0) is logical (320, 320) at identity; shift the square away.
		st.set_transform(ViewTransform {
			x: 800.0,
			y: 0.0,
			k: 1.0,
		});
		assert!(st.drop_payload(&payload, 0.0, 0.0).is_empty());
	}

	#[test]
	fn resize_mid_drag_keeps_the_held_node() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let (x, y) = px(&st, 900.0, 900.0);
		st.pointer_down(MOUSE_POINTER, x, y);
		st.resize(800.0, 600.0);
		let node = st.sim.node("a").unwrap();
		assert_eq!((node.fx, node.fy), (Some(900.0), Some(900.0)));
		assert!(node.dragging);
	}

	#[test]
	fn items_removed_mid_drag_end_the_gesture() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let (x, y) = px(&st, 900.0, 900.0);
		st.pointer_down(MOUSE_POINTER, x, y);
		st.set_items(&[]);
		st.pointer_move(MOUSE_POINTER, x + 10.0, y);
		assert!(st.pointer_up(MOUSE_POINTER, x + 10.0, y).is_empty());
		assert!(!st.drag.is_active());
	}

	#[test]
	fn double_click_opens_album_link() {
		let linked = CanvasItem::Album(AlbumRecord {
			id: "l".into(),
			visual_size: 140.0,
			link: Some("https://open.example/album/l".into()),
			x: Some(600.0),
			y: Some(600.0),
			..Default::default()
		});
		let st = state(&[linked]);
		let (x, y) = px(&st, 600.0, 600.0);
		assert_eq!(
			st.double_click(x, y),
			vec![CanvasEvent::OpenExternalLink("https://open.example/album/l".into())]
		);
		assert!(st.double_click(5.0, 5.0).is_empty());
	}

	#[test]
	fn quick_second_tap_is_a_double_click() {
		let mut st = state(&[linked_album()]);
		let (x, y) = px(&st, 600.0, 600.0);
		assert!(st.tap(x, y, 1000.0).is_empty());
		assert!(st.tap(x, y, 1600.0).is_empty());
		assert_eq!(st.tap(x + 3.0, y, 1800.0).len(), 1);
	}

	#[test]
	fn pinch_zooms_and_single_touch_pans() {
		let mut st = state(&[]);
		st.touch_start(1, 400.0, 400.0);
		assert!(st.pan.active);
		st.touch_start(2, 600.0, 400.0);
		assert!(!st.pan.active);
		st.touch_move(2, 800.0, 400.0);
		assert!((st.transform().k - 2.0).abs() < 1e-9);
		assert!(st.touch_end(2, 800.0, 400.0, 0.0).is_empty());
		assert!(st.touch_end(1, 400.0, 400.0, 10.0).is_empty());
	}

	#[test]
	fn second_finger_on_a_held_node_does_not_pan() {
		let mut st = state(&[album("a", 140.0, Some((900.0, 900.0)))]);
		let (x, y) = px(&st, 900.0, 900.0);
		st.touch_start(1, x, y);
		assert!(st.drag.is_dragging("a"));
		let before = st.transform();

		st.touch_start(2, x + 10.0, y);
		st.touch_move(2, x + 210.0, y);
		assert!(!st.pan.active);
		assert_eq!(st.transform(), before);

		// Empty space while a node is held does not pan either.
		st.touch_start(3, 10.0, 10.0);
		st.touch_move(3, 210.0, 10.0);
		assert!(!st.pan.active);
		assert_eq!(st.transform(), before);
	}

	fn linked_album() -> CanvasItem {
		CanvasItem::Album(AlbumRecord {
			id: "l".into(),
			visual_size: 140.0,
			link: Some("https://open.example/album/l".into()),
			x: Some(600.0),
			y: Some(600.0),
			..Default::default()
		})
	}

	#[test]
	fn drag_release_is_not_a_tap() {
		let mut st = state(&[linked_album()]);
		let (x, y) = px(&st, 600.0, 600.0);
		st.touch_start(1, x, y);
		st.touch_move(1, x + 60.0, y);
		st.touch_move(1, x, y);
		assert!(st.touch_end(1, x, y, 1000.0).is_empty());
		st.touch_start(2, x, y);
		assert!(st.touch_end(2, x, y, 1100.0).is_empty());
	}

	#[test]
	fn two_still_touches_open_the_link() {
		let mut st = state(&[linked_album()]);
		let (x, y) = px(&st, 600.0, 600.0);
		st.touch_start(1, x, y);
		assert!(st.touch_end(1, x, y, 1000.0).is_empty());
		st.touch_start(2, x + 2.0, y);
		let events = st.touch_end(2, x + 2.0, y, 1200.0);
		assert_eq!(
			events,
			vec![CanvasEvent::OpenExternalLink("https://open.example/album/l".into())]
		);
	}

	#[test]
	fn hover_tracks_mouse_and_sets_cursor() {
		let mut st = state(&[genre("Indie", Some((960.0, 960.0)))]);
		let (x, y) = px(&st, 960.0, 960.0);
		st.pointer_move(MOUSE_POINTER, x, y);
		assert_eq!(st.hovered_genre(), Some("Indie"));
		assert_eq!(st.cursor(), Cursor::Grab);
		st.pointer_leave();
		assert_eq!(st.cursor(), Cursor::Default);
	}
}
