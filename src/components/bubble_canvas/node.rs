//! Simulated entities: album covers and genre markers.

use super::config::LayoutConfig;
use super::error::CanvasError;
use super::types::{AlbumRecord, CanvasItem, GenreRecord};

pub const DEFAULT_GENRE_COLOR: &str = "#CCCCCC";

/// Rough advance width of an uppercase glyph relative to the font size.
const LABEL_GLYPH_WIDTH: f64 = 0.68;

#[derive(Clone, Debug, PartialEq)]
pub struct AlbumInfo {
	pub title: String,
	pub artist_name: String,
	pub image: Option<String>,
	pub link: Option<String>,
	pub genres: Vec<String>,
	/// Side of the rendered cover.
	pub visual_size: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenreInfo {
	pub label: String,
	pub color: String,
	pub font_size: f64,
	/// Radius of the decorative halo. Not used for collision.
	pub halo_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Album(AlbumInfo),
	Genre(GenreInfo),
}

/// A node in the simulation.
///
/// `x`/`y` are NaN until the node has been placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Fixed position; while set, forces never move the node.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	/// Set while a pointer holds the node.
	pub dragging: bool,
	radius: f64,
	pub kind: NodeKind,
}

/// Radius used for collision and wall clamping.
///
/// Genre markers collide on their label only, so their large halos can
/// overlap freely.
pub fn collision_radius_of(kind: &NodeKind, layout: &LayoutConfig) -> f64 {
	match kind {
		NodeKind::Album(album) => album.visual_size / 2.0 + layout.album_padding,
		NodeKind::Genre(_) => layout.genre_collision_radius(),
	}
}

impl Node {
	/// Builds a node from a host record, rejecting records without an id or
	/// with a non-positive size.
	pub fn from_item(item: &CanvasItem, layout: &LayoutConfig) -> Result<Self, CanvasError> {
		if item.id().trim().is_empty() {
			return Err(CanvasError::MissingId);
		}
		let kind = match item {
			CanvasItem::Album(a) => {
				if !(a.visual_size.is_finite() && a.visual_size > 0.0) {
					return Err(CanvasError::InvalidSize {
						id: a.id.clone(),
						size: a.visual_size,
					});
				}
				NodeKind::Album(AlbumInfo {
					title: a.title.clone(),
					artist_name: a.artist_name.clone(),
					image: a.image.clone(),
					link: a.link.clone(),
					genres: a.genres.clone(),
					visual_size: a.visual_size,
				})
			}
			CanvasItem::Genre(g) => NodeKind::Genre(GenreInfo {
				label: g.label.clone(),
				color: g
					.color
					.clone()
					.unwrap_or_else(|| DEFAULT_GENRE_COLOR.to_string()),
				font_size: layout.genre_font_size,
				halo_radius: layout.genre_halo_radius * layout.genre_halo_scale,
			}),
		};
		let (x, y) = item.position().unwrap_or((f64::NAN, f64::NAN));
		Ok(Self {
			id: item.id().to_string(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			dragging: false,
			radius: collision_radius_of(&kind, layout),
			kind,
		})
	}

	pub fn is_genre(&self) -> bool {
		matches!(self.kind, NodeKind::Genre(_))
	}

	pub fn collision_radius(&self) -> f64 {
		self.radius
	}

	/// Distance kept between the node's center and the square's edges.
	pub fn boundary_radius(&self) -> f64 {
		self.radius
	}

	pub fn visual_radius(&self) -> f64 {
		match &self.kind {
			NodeKind::Album(album) => album.visual_size / 2.0,
			NodeKind::Genre(genre) => genre.halo_radius,
		}
	}

	pub fn is_placed(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn is_fixed(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}

	pub fn link(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Album(album) => album.link.as_deref(),
			NodeKind::Genre(_) => None,
		}
	}

	/// Whether a logical point falls on the node's interactive area: the
	/// cover for albums, the label for genres.
	pub fn contains(&self, lx: f64, ly: f64) -> bool {
		let (dx, dy) = ((lx - self.x).abs(), (ly - self.y).abs());
		match &self.kind {
			NodeKind::Album(album) => {
				let half = album.visual_size / 2.0;
				dx <= half && dy <= half
			}
			NodeKind::Genre(genre) => {
				let half_w = (genre.label.chars().count() as f64 * genre.font_size * LABEL_GLYPH_WIDTH)
					.max(genre.font_size)
					/ 2.0;
				dx <= half_w && dy <= genre.font_size / 2.0
			}
		}
	}

	/// Rebuilds the host record, carrying the node's current position.
	pub fn to_item(&self) -> CanvasItem {
		let (x, y) = (self.is_placed().then_some(self.x), self.is_placed().then_some(self.y));
		match &self.kind {
			NodeKind::Album(album) => CanvasItem::Album(AlbumRecord {
				id: self.id.clone(),
				title: album.title.clone(),
				artist_name: album.artist_name.clone(),
				image: album.image.clone(),
				link: album.link.clone(),
				visual_size: album.visual_size,
				genres: album.genres.clone(),
				x,
				y,
			}),
			NodeKind::Genre(genre) => CanvasItem::Genre(GenreRecord {
				id: self.id.clone(),
				label: genre.label.clone(),
				color: Some(genre.color.clone()),
				x,
				y,
			}),
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn album(id: &str, size: f64, at: Option<(f64, f64)>) -> CanvasItem {
		CanvasItem::Album(AlbumRecord {
			id: id.into(),
			title: format!("Title {id}"),
			visual_size: size,
			x: at.map(|p| p.0),
			y: at.map(|p| p.1),
			..Default::default()
		})
	}

	pub(crate) fn genre(label: &str, at: Option<(f64, f64)>) -> CanvasItem {
		CanvasItem::Genre(GenreRecord {
			id: format!("genre-{label}"),
			label: label.into(),
			color: Some("#FF6B6B".into()),
			x: at.map(|p| p.0),
			y: at.map(|p| p.1),
		})
	}

	#[test]
	fn album_radius_is_half_size_plus_padding() {
		let node = Node::from_item(&album("a", 140.0, None), &LayoutConfig::default()).unwrap();
		assert_eq!(node.collision_radius(), 76.0);
		assert_eq!(node.visual_radius(), 70.0);
		assert!(!node.is_placed());
	}

	#[test]
	fn genre_radius_ignores_halo() {
		let node = Node::from_item(&genre("Jazz", Some((1.0, 2.0))), &LayoutConfig::default()).unwrap();
		assert_eq!(node.collision_radius(), 26.0);
		assert_eq!(node.visual_radius(), 560.0);
		assert_eq!((node.x, node.y), (1.0, 2.0));
	}

	#[test]
	fn malformed_records_are_rejected() {
		let layout = LayoutConfig::default();
		assert!(matches!(
			Node::from_item(&album("", 140.0, None), &layout),
			Err(CanvasError::MissingId)
		));
		assert!(matches!(
			Node::from_item(&album("a", 0.0, None), &layout),
			Err(CanvasError::InvalidSize { .. })
		));
		assert!(matches!(
			Node::from_item(&album("a", f64::NAN, None), &layout),
			Err(CanvasError::InvalidSize { .. })
		));
	}

	#[test]
	fn hit_area_follows_kind() {
		let layout = LayoutConfig::default();
		let cover = Node::from_item(&album("a", 100.0, Some((500.0, 500.0))), &layout).unwrap();
		assert!(cover.contains(549.0, 451.0));
		assert!(!cover.contains(552.0, 500.0));

		let label = Node::from_item(&genre("Rock", Some((500.0, 500.0))), &layout).unwrap();
		assert!(label.contains(540.0, 510.0));
		assert!(!label.contains(500.0, 530.0));
	}

	#[test]
	fn record_round_trips_position() {
		let layout = LayoutConfig::default();
		let mut node = Node::from_item(&album("a", 100.0, None), &layout).unwrap();
		(node.x, node.y) = (12.0, 34.0);
		assert_eq!(node.to_item().position(), Some((12.0, 34.0)));
	}
}
