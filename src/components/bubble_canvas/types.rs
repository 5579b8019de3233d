//! Plain records handed to the canvas by the data layer.

use serde::{Deserialize, Serialize};

use super::error::CanvasError;

/// MIME type used for library-to-canvas drag payloads.
pub const DRAG_PAYLOAD_TYPE: &str = "application/json";

/// An album as supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
	/// Unique identifier. Records without one are dropped.
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub artist_name: String,
	/// Cover art URL.
	pub image: Option<String>,
	/// External link opened on double click.
	pub link: Option<String>,
	/// Rendered side length of the cover in logical units.
	#[serde(default)]
	pub visual_size: f64,
	/// Genre labels the album belongs to, used by the affinity layout.
	#[serde(default)]
	pub genres: Vec<String>,
	/// Previously saved position.
	pub x: Option<f64>,
	pub y: Option<f64>,
}

/// A genre marker as supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreRecord {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub label: String,
	/// CSS hex color of the halo.
	pub color: Option<String>,
	pub x: Option<f64>,
	pub y: Option<f64>,
}

/// Anything that can live on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanvasItem {
	Album(AlbumRecord),
	Genre(GenreRecord),
}

impl CanvasItem {
	pub fn id(&self) -> &str {
		match self {
			CanvasItem::Album(a) => &a.id,
			CanvasItem::Genre(g) => &g.id,
		}
	}

	pub fn is_genre(&self) -> bool {
		matches!(self, CanvasItem::Genre(_))
	}

	/// Saved position, present only when both coordinates are finite.
	pub fn position(&self) -> Option<(f64, f64)> {
		let (x, y) = match self {
			CanvasItem::Album(a) => (a.x?, a.y?),
			CanvasItem::Genre(g) => (g.x?, g.y?),
		};
		(x.is_finite() && y.is_finite()).then_some((x, y))
	}

	pub fn set_position(&mut self, x: f64, y: f64) {
		match self {
			CanvasItem::Album(a) => (a.x, a.y) = (Some(x), Some(y)),
			CanvasItem::Genre(g) => (g.x, g.y) = (Some(x), Some(y)),
		}
	}

	/// Same record carrying a new saved position.
	pub fn with_position(mut self, x: f64, y: f64) -> Self {
		self.set_position(x, y);
		self
	}

	/// Parses a drag-and-drop payload.
	pub fn from_payload(payload: &str) -> Result<Self, CanvasError> {
		if payload.trim().is_empty() {
			return Err(CanvasError::EmptyDropPayload);
		}
		Ok(serde_json::from_str(payload)?)
	}

	pub fn to_payload(&self) -> Result<String, CanvasError> {
		Ok(serde_json::to_string(self)?)
	}
}
