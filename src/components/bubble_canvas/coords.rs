//! Mapping between the fixed logical square and physical pixels.
//!
//! The square is drawn as a virtual canvas of side `canvas_multiplier ×
//! max(width, height)` centered on the viewport, so it overflows the
//! viewport on both axes and leaves room to pan. Simulation math never
//! sees pixels; only the frame below does.

use super::config::LayoutConfig;

/// Physical placement of the logical square inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasFrame {
	/// Viewport size in CSS pixels.
	pub viewport_width: f64,
	pub viewport_height: f64,
	/// Side of the virtual canvas in pixels.
	pub side: f64,
	/// Top-left corner of the virtual canvas relative to the viewport.
	pub left: f64,
	pub top: f64,
	/// Pixels per logical unit before camera zoom.
	pub px_per_unit: f64,
}

impl CanvasFrame {
	pub fn new(viewport_width: f64, viewport_height: f64, layout: &LayoutConfig) -> Self {
		let viewport_width = viewport_width.max(1.0);
		let viewport_height = viewport_height.max(1.0);
		let side = viewport_width.max(viewport_height) * layout.canvas_multiplier;
		Self {
			viewport_width,
			viewport_height,
			side,
			left: viewport_width / 2.0 - side / 2.0,
			top: viewport_height / 2.0 - side / 2.0,
			px_per_unit: side / layout.logical_size,
		}
	}

	/// Viewport pixel to layer space (logical units, camera not applied).
	pub fn to_layer(&self, px: f64, py: f64) -> (f64, f64) {
		(
			(px - self.left) / self.px_per_unit,
			(py - self.top) / self.px_per_unit,
		)
	}

	/// Layer space to viewport pixel.
	#[cfg(test)]
	pub fn to_physical(&self, lx: f64, ly: f64) -> (f64, f64) {
		(
			self.left + lx * self.px_per_unit,
			self.top + ly * self.px_per_unit,
		)
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		(0.0..=self.viewport_width).contains(&px) && (0.0..=self.viewport_height).contains(&py)
	}

	pub fn viewport_center(&self) -> (f64, f64) {
		(self.viewport_width / 2.0, self.viewport_height / 2.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn frame_is_centered_and_oversized() {
		let frame = CanvasFrame::new(1000.0, 800.0, &LayoutConfig::default());
		assert_eq!(frame.side, 1500.0);
		assert_eq!(frame.left, -250.0);
		assert_eq!(frame.top, -350.0);
		assert!((frame.px_per_unit - 1500.0 / 1920.0).abs() < 1e-12);
	}

	#[test]
	fn layer_and_physical_are_inverse() {
		let frame = CanvasFrame::new(1280.0, 720.0, &LayoutConfig::default());
		let (lx, ly) = frame.to_layer(333.0, 101.0);
		let (px, py) = frame.to_physical(lx, ly);
		assert!((px - 333.0).abs() < 1e-9);
		assert!((py - 101.0).abs() < 1e-9);
	}

	#[test]
	fn square_center_sits_on_viewport_center() {
		let frame = CanvasFrame::new(900.0, 600.0, &LayoutConfig::default());
		let (px, py) = frame.to_physical(960.0, 960.0);
		assert!((px - 450.0).abs() < 1e-9);
		assert!((py - 300.0).abs() < 1e-9);
	}
}
