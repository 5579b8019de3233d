//! Synthetic scrollbars reflecting the camera transform.
//!
//! Geometry is pure and derived from the camera every time it changes; the
//! DOM overlay only paints whatever geometry it is handed.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use super::camera::{Camera, ViewTransform};
use super::config::ScrollbarConfig;
use super::error::CanvasError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
	Horizontal,
	Vertical,
}

/// One thumb in track pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ThumbGeometry {
	pub track: f64,
	pub length: f64,
	pub position: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollbarGeometry {
	pub horizontal: ThumbGeometry,
	pub vertical: ThumbGeometry,
}

impl ScrollbarGeometry {
	pub fn axis(&self, axis: Axis) -> ThumbGeometry {
		match axis {
			Axis::Horizontal => self.horizontal,
			Axis::Vertical => self.vertical,
		}
	}
}

/// Pixel quantities of one axis, shared by the forward and inverse maps.
struct AxisMetrics {
	track: f64,
	length: f64,
	/// Pixel offset of the virtual canvas.
	offset: f64,
	px_per_unit: f64,
	max_scroll: f64,
}

fn metrics(camera: &Camera, cfg: &ScrollbarConfig, axis: Axis) -> AxisMetrics {
	let f = camera.frame();
	let t = camera.transform();
	let (viewport, offset) = match axis {
		Axis::Horizontal => (f.viewport_width, f.left),
		Axis::Vertical => (f.viewport_height, f.top),
	};
	let content = f.side * t.k;
	let track = (viewport - 2.0 * cfg.track_margin).max(0.0);
	let visible = (viewport / content).min(1.0);
	AxisMetrics {
		track,
		length: (visible * track).max(cfg.thumb_min).min(track),
		offset,
		px_per_unit: f.px_per_unit,
		max_scroll: (content - viewport).max(0.0),
	}
}

fn translate_of(t: &ViewTransform, axis: Axis) -> f64 {
	match axis {
		Axis::Horizontal => t.x,
		Axis::Vertical => t.y,
	}
}

fn thumb(camera: &Camera, cfg: &ScrollbarConfig, axis: Axis) -> ThumbGeometry {
	let m = metrics(camera, cfg, axis);
	let origin = m.offset + translate_of(&camera.transform(), axis) * m.px_per_unit;
	let travel = m.track - m.length;
	let position = if m.max_scroll > 0.0 && travel > 0.0 {
		(-origin / m.max_scroll).clamp(0.0, 1.0) * travel
	} else {
		0.0
	};
	ThumbGeometry {
		track: m.track,
		length: m.length,
		position,
	}
}

/// Thumb sizes and positions for the camera's current transform.
pub fn geometry(camera: &Camera, cfg: &ScrollbarConfig) -> ScrollbarGeometry {
	ScrollbarGeometry {
		horizontal: thumb(camera, cfg, Axis::Horizontal),
		vertical: thumb(camera, cfg, Axis::Vertical),
	}
}

/// Translate along `axis` that puts the thumb at `position`, or `None` when
/// the content fits and there is nothing to scroll.
pub fn translate_for_thumb(
	camera: &Camera,
	cfg: &ScrollbarConfig,
	axis: Axis,
	position: f64,
) -> Option<f64> {
	let m = metrics(camera, cfg, axis);
	let travel = m.track - m.length;
	if travel <= 0.0 || m.max_scroll <= 0.0 {
		return None;
	}
	let scroll = position.clamp(0.0, travel) / travel * m.max_scroll;
	Some((-scroll - m.offset) / m.px_per_unit)
}

/// An in-progress thumb drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbDrag {
	pub axis: Axis,
	start_pointer: f64,
	start_position: f64,
}

impl ThumbDrag {
	pub fn new(axis: Axis, pointer: f64, geometry: &ScrollbarGeometry) -> Self {
		Self {
			axis,
			start_pointer: pointer,
			start_position: geometry.axis(axis).position,
		}
	}

	/// Applies a pointer move to the camera through its setter.
	pub fn update(&self, camera: &mut Camera, cfg: &ScrollbarConfig, pointer: f64) -> ViewTransform {
		let position = self.start_position + (pointer - self.start_pointer);
		let mut t = camera.transform();
		if let Some(translate) = translate_for_thumb(camera, cfg, self.axis, position) {
			match self.axis {
				Axis::Horizontal => t.x = translate,
				Axis::Vertical => t.y = translate,
			}
		}
		camera.set_transform(t)
	}
}

/// Whether the device relies on native touch gestures instead of scrollbars.
pub fn is_touch_device(window: &Window) -> bool {
	js_sys::Reflect::has(window, &"ontouchstart".into()).unwrap_or(false)
		|| window.navigator().max_touch_points() > 0
}

const THUMB_IDLE: &str = "rgba(0, 0, 0, 0.3)";
const THUMB_ACTIVE: &str = "rgba(0, 0, 0, 0.5)";

/// Fixed-position box matching a canvas rectangle in client pixels.
fn overlay_box(left: f64, top: f64, width: f64, height: f64) -> [(&'static str, String); 4] {
	[
		("left", format!("{left}px")),
		("top", format!("{top}px")),
		("width", format!("{}px", width.max(0.0))),
		("height", format!("{}px", height.max(0.0))),
	]
}

/// Fixed overlay holding both scrollbars above the canvas.
///
/// Created by the owning component on mount; dropping it removes it from
/// the document.
pub struct ScrollbarOverlay {
	container: HtmlElement,
	horizontal_thumb: HtmlElement,
	vertical_thumb: HtmlElement,
}

fn styled(
	document: &Document,
	parent: &HtmlElement,
	class: &str,
	styles: &[(&str, &str)],
) -> Result<HtmlElement, CanvasError> {
	let el: HtmlElement = document
		.create_element("div")?
		.dyn_into()
		.map_err(|_| CanvasError::Dom("div is not an HtmlElement".into()))?;
	el.set_class_name(class);
	let style = el.style();
	for (name, value) in styles {
		style.set_property(name, value)?;
	}
	parent.append_child(&el)?;
	Ok(el)
}

impl ScrollbarOverlay {
	pub fn mount(document: &Document, cfg: &ScrollbarConfig, hidden: bool) -> Result<Self, CanvasError> {
		let body = document
			.body()
			.ok_or_else(|| CanvasError::Dom("document has no body".into()))?;
		let (width, track_width) = (format!("{}px", cfg.width), format!("{}px", cfg.track_width));
		let track_len = format!("calc(100% - {}px)", 2.0 * cfg.track_margin);
		let margin = format!("{}px", cfg.track_margin);

		let container = styled(
			document,
			&body,
			"bubble-canvas-scrollbars",
			&[
				("position", "fixed"),
				("top", "0"),
				("left", "0"),
				("width", "100%"),
				("height", "100%"),
				("pointer-events", "none"),
				("z-index", "999"),
				("display", if hidden { "none" } else { "block" }),
			],
		)?;
		let horizontal = styled(
			document,
			&container,
			"horizontal-scrollbar",
			&[
				("position", "absolute"),
				("bottom", "0"),
				("left", "0"),
				("width", "100%"),
				("height", &width),
				("pointer-events", "all"),
			],
		)?;
		let horizontal_track = styled(
			document,
			&horizontal,
			"scrollbar-track",
			&[
				("position", "absolute"),
				("left", &margin),
				("bottom", "2px"),
				("width", &track_len),
				("height", &track_width),
				("background", "rgba(0, 0, 0, 0.1)"),
				("border-radius", "6px"),
			],
		)?;
		let horizontal_thumb = styled(
			document,
			&horizontal_track,
			"scrollbar-thumb",
			&[
				("position", "absolute"),
				("top", "0"),
				("height", "100%"),
				("background", THUMB_IDLE),
				("border-radius", "6px"),
				("cursor", "grab"),
				("transition", "background 0.2s"),
			],
		)?;
		let vertical = styled(
			document,
			&container,
			"vertical-scrollbar",
			&[
				("position", "absolute"),
				("top", "0"),
				("right", "0"),
				("width", &width),
				("height", "100%"),
				("pointer-events", "all"),
			],
		)?;
		let vertical_track = styled(
			document,
			&vertical,
			"scrollbar-track",
			&[
				("position", "absolute"),
				("top", &margin),
				("right", "2px"),
				("width", &track_width),
				("height", &track_len),
				("background", "rgba(0, 0, 0, 0.1)"),
				("border-radius", "6px"),
			],
		)?;
		let vertical_thumb = styled(
			document,
			&vertical_track,
			"scrollbar-thumb",
			&[
				("position", "absolute"),
				("left", "0"),
				("width", "100%"),
				("background", THUMB_IDLE),
				("border-radius", "6px"),
				("cursor", "grab"),
				("transition", "background 0.2s"),
			],
		)?;

		Ok(Self {
			container,
			horizontal_thumb,
			vertical_thumb,
		})
	}

	pub fn container(&self) -> &HtmlElement {
		&self.container
	}

	pub fn thumb(&self, axis: Axis) -> &HtmlElement {
		match axis {
			Axis::Horizontal => &self.horizontal_thumb,
			Axis::Vertical => &self.vertical_thumb,
		}
	}

	/// Lays the overlay over the canvas' client rectangle, so each track
	/// spans the same pixels its geometry was computed for.
	pub fn place(&self, left: f64, top: f64, width: f64, height: f64) {
		let style = self.container.style();
		for (name, value) in overlay_box(left, top, width, height) {
			let _ = style.set_property(name, &value);
		}
	}

	pub fn apply(&self, geometry: &ScrollbarGeometry) {
		let h = geometry.horizontal;
		let _ = self.horizontal_thumb.style().set_property("width", &format!("{}px", h.length));
		let _ = self.horizontal_thumb.style().set_property("left", &format!("{}px", h.position));
		let v = geometry.vertical;
		let _ = self.vertical_thumb.style().set_property("height", &format!("{}px", v.length));
		let _ = self.vertical_thumb.style().set_property("top", &format!("{}px", v.position));
	}

	pub fn set_active(&self, axis: Axis, active: bool) {
		let thumb = self.thumb(axis).style();
		let _ = thumb.set_property("cursor", if active { "grabbing" } else { "grab" });
		let _ = thumb.set_property("background", if active { THUMB_ACTIVE } else { THUMB_IDLE });
	}
}

impl Drop for ScrollbarOverlay {
	fn drop(&mut self) {
		self.container.remove();
	}
}
