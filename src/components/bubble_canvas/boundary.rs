//! Wall clamping for the logical square.

use super::node::Node;

/// Clamps a center so a disc of `radius` stays inside `[0, side]²`.
pub fn clamp_to_square(radius: f64, side: f64, x: f64, y: f64) -> (f64, f64) {
	(clamp_axis(radius, side, x), clamp_axis(radius, side, y))
}

fn clamp_axis(radius: f64, side: f64, v: f64) -> f64 {
	let (min, max) = (radius, side - radius);
	// A node wider than the square is pinned to the middle.
	if min > max {
		return side / 2.0;
	}
	v.clamp(min, max)
}

/// Pulls every free node back inside the square, zeroing the velocity
/// component that pushed it out. Dragged nodes are clamped by the drag
/// controller instead.
pub fn enforce_boundaries(nodes: &mut [Node], side: f64) {
	for node in nodes.iter_mut().filter(|n| !n.dragging && n.is_placed()) {
		let r = node.boundary_radius();
		let x = clamp_axis(r, side, node.x);
		if x != node.x {
			node.x = x;
			node.vx = 0.0;
		}
		let y = clamp_axis(r, side, node.y);
		if y != node.y {
			node.y = y;
			node.vy = 0.0;
		}
	}
}
