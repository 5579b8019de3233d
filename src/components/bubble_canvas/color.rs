/// Gradient stops of a genre halo: full color at the center fading to white.
pub const HALO_STOPS: [(f64, f64); 5] = [(0.0, 0.0), (0.4, 0.3), (0.65, 0.6), (0.85, 0.85), (1.0, 1.0)];

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
	let hex = color.trim().trim_start_matches('#');
	if hex.len() != 6 || !hex.is_ascii() {
		return None;
	}
	let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
	Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Mixes a `#rrggbb` color with white; `ratio` 0 keeps the color, 1 is white.
/// Unparseable colors fall back to the default genre gray.
pub fn blend_with_white(color: &str, ratio: f64) -> String {
	let (r, g, b) = parse_hex(color).unwrap_or((0xCC, 0xCC, 0xCC));
	let ratio = ratio.clamp(0.0, 1.0);
	let mix = |c: u8| (c as f64 + (255.0 - c as f64) * ratio).round() as u8;
	format!("rgb({}, {}, {})", mix(r), mix(g), mix(b))
}
