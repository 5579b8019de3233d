//! Pan/zoom transform of the whole node layer.
//!
//! The transform lives in layer space (logical units of the unzoomed square)
//! and is changed only through [`Camera::set_transform`], which applies the
//! zoom limits and the optional pan bounds. Nothing here touches nodes.

use log::debug;

use super::config::ZoomConfig;
use super::coords::CanvasFrame;

/// `translate(x, y) scale(k)` applied to the node layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Logical point to layer point.
	pub fn apply(&self, lx: f64, ly: f64) -> (f64, f64) {
		(self.x + lx * self.k, self.y + ly * self.k)
	}

	/// Layer point to logical point.
	pub fn invert(&self, vx: f64, vy: f64) -> (f64, f64) {
		((vx - self.x) / self.k, (vy - self.y) / self.k)
	}
}

/// What a wheel event should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelIntent {
	Zoom,
	Pan,
}

impl WheelIntent {
	/// Only an explicit modifier (ctrl, or cmd on macOS; browsers also set
	/// ctrl for trackpad pinches) zooms. Plain scrolling pans.
	pub fn from_modifiers(ctrl: bool, meta: bool) -> Self {
		if ctrl || meta { Self::Zoom } else { Self::Pan }
	}
}

#[derive(Clone, Debug)]
pub struct Camera {
	transform: ViewTransform,
	frame: CanvasFrame,
	zoom: ZoomConfig,
}

impl Camera {
	pub fn new(frame: CanvasFrame, zoom: ZoomConfig) -> Self {
		let mut camera = Self {
			transform: ViewTransform::default(),
			frame,
			zoom,
		};
		camera.set_transform(ViewTransform::default());
		camera
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn frame(&self) -> &CanvasFrame {
		&self.frame
	}

	/// The one place the transform changes. Returns what was applied.
	pub fn set_transform(&mut self, t: ViewTransform) -> ViewTransform {
		let k = if t.k.is_finite() {
			t.k.clamp(self.zoom.min_scale, self.zoom.max_scale)
		} else {
			self.transform.k
		};
		let (x, y) = if t.x.is_finite() && t.y.is_finite() {
			(t.x, t.y)
		} else {
			(self.transform.x, self.transform.y)
		};
		self.transform = self.bounded(ViewTransform { x, y, k });
		self.transform
	}

	/// Pans by a viewport pixel delta.
	pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) -> ViewTransform {
		let ppu = self.frame.px_per_unit;
		self.pan_by(dx / ppu, dy / ppu)
	}

	/// Pans by a layer-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) -> ViewTransform {
		let t = self.transform;
		self.set_transform(ViewTransform {
			x: t.x + dx,
			y: t.y + dy,
			k: t.k,
		})
	}

	/// Multiplies the scale, keeping the viewport pixel `(px, py)` fixed.
	pub fn zoom_at(&mut self, factor: f64, px: f64, py: f64) -> ViewTransform {
		let t = self.transform;
		let new_k = (t.k * factor).clamp(self.zoom.min_scale, self.zoom.max_scale);
		let ratio = new_k / t.k;
		let (ax, ay) = self.frame.to_layer(px, py);
		self.set_transform(ViewTransform {
			x: ax - (ax - t.x) * ratio,
			y: ay - (ay - t.y) * ratio,
			k: new_k,
		})
	}

	/// One wheel notch of zoom; scrolling up zooms in.
	pub fn zoom_wheel(&mut self, delta_y: f64, px: f64, py: f64) -> ViewTransform {
		let step = self.zoom.wheel_step;
		let factor = if delta_y > 0.0 { 1.0 / step } else { step };
		self.zoom_at(factor, px, py)
	}

	pub fn zoom_centered(&mut self, factor: f64) -> ViewTransform {
		let (cx, cy) = self.frame.viewport_center();
		self.zoom_at(factor, cx, cy)
	}

	/// Viewport pixel to logical coordinates.
	pub fn screen_to_logical(&self, px: f64, py: f64) -> (f64, f64) {
		let (vx, vy) = self.frame.to_layer(px, py);
		self.transform.invert(vx, vy)
	}

	#[cfg(test)]
	pub fn logical_to_screen(&self, lx: f64, ly: f64) -> (f64, f64) {
		let (vx, vy) = self.transform.apply(lx, ly);
		self.frame.to_physical(vx, vy)
	}

	/// Takes a new viewport size. Only the pixel mapping changes; the
	/// transform is re-bounded but otherwise kept.
	pub fn resize(&mut self, frame: CanvasFrame) -> ViewTransform {
		debug!(
			"camera resize to {}x{}",
			frame.viewport_width, frame.viewport_height
		);
		self.frame = frame;
		self.set_transform(self.transform)
	}

	fn bounded(&self, t: ViewTransform) -> ViewTransform {
		let Some(bounds) = self.zoom.bounds else {
			return t;
		};
		let f = &self.frame;
		let content = f.side * t.k;
		let clamp = |translate: f64, offset: f64, viewport: f64| {
			let origin = offset + translate * f.px_per_unit;
			let origin = if content + 2.0 * bounds.margin >= viewport {
				origin.clamp(viewport - bounds.margin - content, bounds.margin)
			} else {
				(viewport - content) / 2.0
			};
			(origin - offset) / f.px_per_unit
		};
		ViewTransform {
			x: clamp(t.x, f.left, f.viewport_width),
			y: clamp(t.y, f.top, f.viewport_height),
			k: t.k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bubble_canvas::config::{LayoutConfig, PanBounds};

	fn camera() -> Camera {
		Camera::new(
			CanvasFrame::new(1200.0, 800.0, &LayoutConfig::default()),
			ZoomConfig::default(),
		)
	}

	fn close(a: ViewTransform, b: ViewTransform) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.k - b.k).abs() < 1e-12
	}

	#[test]
	fn pan_then_inverse_pan_round_trips() {
		let mut cam = camera();
		cam.zoom_at(1.7, 300.0, 200.0);
		let start = cam.transform();
		cam.pan_by_pixels(123.4, -56.7);
		assert!(!close(cam.transform(), start));
		cam.pan_by_pixels(-123.4, 56.7);
		assert!(close(cam.transform(), start));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut cam = camera();
		assert_eq!(cam.zoom_at(100.0, 0.0, 0.0).k, 2.5);
		assert_eq!(cam.zoom_at(0.0001, 0.0, 0.0).k, 0.25);
	}

	#[test]
	fn zoom_keeps_anchor_under_pointer() {
		let mut cam = camera();
		let before = cam.screen_to_logical(400.0, 300.0);
		cam.zoom_wheel(-1.0, 400.0, 300.0);
		assert!((cam.transform().k - 1.1).abs() < 1e-12);
		let after = cam.screen_to_logical(400.0, 300.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn centered_zoom_anchors_viewport_center() {
		let mut cam = camera();
		let before = cam.screen_to_logical(600.0, 400.0);
		cam.zoom_centered(0.5);
		let after = cam.screen_to_logical(600.0, 400.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn screen_and_logical_are_inverse() {
		let mut cam = camera();
		cam.set_transform(ViewTransform {
			x: -40.0,
			y: 25.0,
			k: 1.3,
		});
		let (lx, ly) = cam.screen_to_logical(17.0, 640.0);
		let (px, py) = cam.logical_to_screen(lx, ly);
		assert!((px - 17.0).abs() < 1e-9 && (py - 640.0).abs() < 1e-9);
	}

	#[test]
	fn wheel_modifiers_pick_intent() {
		assert_eq!(WheelIntent::from_modifiers(false, false), WheelIntent::Pan);
		assert_eq!(WheelIntent::from_modifiers(true, false), WheelIntent::Zoom);
		assert_eq!(WheelIntent::from_modifiers(false, true), WheelIntent::Zoom);
	}

	#[test]
	fn bounded_pan_keeps_square_in_view() {
		let zoom = ZoomConfig {
			bounds: Some(PanBounds { margin: 50.0 }),
			..Default::default()
		};
		let mut cam = Camera::new(CanvasFrame::new(1200.0, 800.0, &LayoutConfig::default()), zoom);
		cam.pan_by_pixels(10_000.0, -10_000.0);
		let (left, top) = cam.logical_to_screen(0.0, 0.0);
		let (right, bottom) = cam.logical_to_screen(1920.0, 1920.0);
		assert!((left - 50.0).abs() < 1e-6);
		assert!((bottom - 750.0).abs() < 1e-6);
		assert!(right > 1200.0 && top < 0.0);
	}

	#[test]
	fn resize_keeps_transform_when_unbounded() {
		let mut cam = camera();
		cam.pan_by(12.0, 34.0);
		let t = cam.transform();
		cam.resize(CanvasFrame::new(640.0, 480.0, &LayoutConfig::default()));
		assert_eq!(cam.transform(), t);
	}
}
