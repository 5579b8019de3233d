//! Tunable constants for layout, physics, zoom and scrollbars.
//!
//! Every group deserializes with defaults filled in, so a host can override a
//! single field from JSON without restating the rest.

use serde::Deserialize;

/// How nodes without a known position are first placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
	/// Uniformly random inside the square, inset by the node's boundary radius.
	#[default]
	Random,
	/// Spring layout pulling albums toward the genres they list.
	GenreAffinity,
}

/// Geometry of the logical square and of the two node kinds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Side of the logical square every position lives in.
	pub logical_size: f64,
	/// Physical canvas side as a multiple of the larger viewport dimension.
	pub canvas_multiplier: f64,
	/// Added to an album's visual half-size to get its collision radius.
	pub album_padding: f64,
	pub genre_font_size: f64,
	pub genre_padding: f64,
	/// Base radius of the decorative genre halo (drawn scaled up).
	pub genre_halo_radius: f64,
	pub genre_halo_scale: f64,
	pub mode: LayoutMode,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			logical_size: 1920.0,
			canvas_multiplier: 1.5,
			album_padding: 6.0,
			genre_font_size: 36.0,
			genre_padding: 8.0,
			genre_halo_radius: 80.0,
			genre_halo_scale: 7.0,
			mode: LayoutMode::Random,
		}
	}
}

impl LayoutConfig {
	/// Collision radius shared by all genre markers.
	pub fn genre_collision_radius(&self) -> f64 {
		self.genre_font_size / 2.0 + self.genre_padding
	}
}

/// Decay and strength parameters of the collision simulation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub alpha_decay: f64,
	/// Fraction of velocity removed every tick.
	pub velocity_decay: f64,
	pub collision_strength: f64,
	/// Below this alpha the simulation goes to sleep.
	pub alpha_min: f64,
	/// Alpha the simulation is held near while a drag is in progress.
	pub drag_alpha_target: f64,
	pub restart_alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_decay: 0.02,
			velocity_decay: 0.4,
			collision_strength: 0.5,
			alpha_min: 0.001,
			drag_alpha_target: 0.3,
			restart_alpha: 1.0,
		}
	}
}

/// Optional clamp keeping the square from drifting out of view.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct PanBounds {
	/// Pixels of empty space allowed between a viewport edge and the square.
	pub margin: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Multiplicative zoom per wheel notch.
	pub wheel_step: f64,
	pub bounds: Option<PanBounds>,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.25,
			max_scale: 2.5,
			wheel_step: 1.1,
			bounds: None,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
	/// Thickness of the hit area along the viewport edge.
	pub width: f64,
	pub track_width: f64,
	/// Gap left at both ends of a track.
	pub track_margin: f64,
	pub thumb_min: f64,
}

impl Default for ScrollbarConfig {
	fn default() -> Self {
		Self {
			width: 16.0,
			track_width: 12.0,
			track_margin: 10.0,
			thumb_min: 30.0,
		}
	}
}

/// All configuration consumed by the bubble canvas.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
	pub layout: LayoutConfig,
	pub simulation: SimulationConfig,
	pub zoom: ZoomConfig,
	pub scrollbar: ScrollbarConfig,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn genre_radius_is_half_font_plus_padding() {
		assert_eq!(LayoutConfig::default().genre_collision_radius(), 26.0);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let cfg: CanvasConfig =
			serde_json::from_str(r#"{"zoom": {"max_scale": 3.0}, "layout": {"mode": "genre_affinity"}}"#)
				.unwrap();
		assert_eq!(cfg.zoom.max_scale, 3.0);
		assert_eq!(cfg.zoom.min_scale, 0.25);
		assert_eq!(cfg.layout.mode, LayoutMode::GenreAffinity);
		assert_eq!(cfg.layout.logical_size, 1920.0);
		assert_eq!(cfg.simulation.alpha_decay, 0.02);
	}
}
