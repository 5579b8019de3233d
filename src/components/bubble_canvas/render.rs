use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::color::{HALO_STOPS, blend_with_white};
use super::node::{Node, NodeKind};
use super::state::BubbleCanvasState;

const PAGE_BACKGROUND: &str = "#f3f1f6";
const SQUARE_BACKGROUND: &str = "#ffffff";
const MISSING_COVER: &str = "#333";
const LABEL_FONT: &str = "system-ui, -apple-system, \"Segoe UI\", Roboto, \"Helvetica Neue\", Arial, sans-serif";

/// Cover images, loaded once per URL.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	/// The image for `url` if it has finished loading; starts the load on
	/// first request.
	fn get(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			let img = HtmlImageElement::new().ok()?;
			img.set_cross_origin(Some("anonymous"));
			img.set_src(url);
			self.images.insert(url.to_string(), img);
		}
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

pub fn render(state: &BubbleCanvasState, ctx: &CanvasRenderingContext2d, images: &mut ImageCache) {
	let frame = state.frame();
	let t = state.transform();
	ctx.set_fill_style_str(PAGE_BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.viewport_width, frame.viewport_height);

	ctx.save();
	let _ = ctx.translate(frame.left, frame.top);
	let _ = ctx.scale(frame.px_per_unit, frame.px_per_unit);
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);

	let side = state.sim.side();
	ctx.set_fill_style_str(SQUARE_BACKGROUND);
	ctx.fill_rect(0.0, 0.0, side, side);

	let nodes = state.sim.nodes();
	draw_genre_halos(ctx, nodes);
	draw_albums(ctx, nodes, images);
	draw_genre_labels(ctx, nodes, state.hovered_genre());
	ctx.restore();
}

fn placed(nodes: &[Node]) -> impl Iterator<Item = &Node> {
	nodes.iter().filter(|n| n.is_placed())
}

fn draw_genre_halos(ctx: &CanvasRenderingContext2d, nodes: &[Node]) {
	let _ = ctx.set_global_composite_operation("multiply");
	for node in placed(nodes) {
		let NodeKind::Genre(genre) = &node.kind else {
			continue;
		};
		let radius = node.visual_radius();
		let Ok(gradient) = ctx.create_radial_gradient(node.x, node.y, 0.0, node.x, node.y, radius)
		else {
			continue;
		};
		for (offset, ratio) in HALO_STOPS {
			let _ = gradient.add_color_stop(offset as f32, &blend_with_white(&genre.color, ratio));
		}
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}
	let _ = ctx.set_global_composite_operation("source-over");
}

fn draw_albums(ctx: &CanvasRenderingContext2d, nodes: &[Node], images: &mut ImageCache) {
	for node in placed(nodes) {
		let NodeKind::Album(album) = &node.kind else {
			continue;
		};
		let half = album.visual_size / 2.0;
		let (x, y, size) = (node.x - half, node.y - half, album.visual_size);

		ctx.save();
		ctx.set_shadow_color("rgba(0, 0, 0, 0.2)");
		ctx.set_shadow_blur(6.0);
		ctx.set_shadow_offset_y(4.0);
		ctx.set_global_alpha(if node.dragging { 1.0 } else { 0.85 });
		let drawn = album
			.image
			.as_deref()
			.and_then(|url| images.get(url))
			.is_some_and(|img| {
				ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, size, size)
					.is_ok()
			});
		if !drawn {
			ctx.set_fill_style_str(MISSING_COVER);
			ctx.fill_rect(x, y, size, size);
		}
		ctx.restore();

		ctx.set_stroke_style_str("rgba(0, 0, 0, 0.1)");
		ctx.set_line_width(1.0);
		ctx.stroke_rect(x, y, size, size);
	}
}

fn draw_genre_labels(ctx: &CanvasRenderingContext2d, nodes: &[Node], hovered: Option<&str>) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for node in placed(nodes) {
		let NodeKind::Genre(genre) = &node.kind else {
			continue;
		};
		let emphasized = node.dragging || hovered == Some(genre.label.as_str());
		ctx.set_font(&format!("700 {}px {LABEL_FONT}", genre.font_size));
		ctx.set_global_alpha(if emphasized { 1.0 } else { 0.85 });
		ctx.set_shadow_color("rgba(0, 0, 0, 0.3)");
		ctx.set_shadow_blur(10.0);
		ctx.set_fill_style_str("#000000");
		let _ = ctx.fill_text(&genre.label.to_uppercase(), node.x, node.y);
	}
	ctx.set_shadow_blur(0.0);
	ctx.set_global_alpha(1.0);
}
