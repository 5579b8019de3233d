//! Force-directed canvas of album covers and genre labels.
//!
//! Records come in through [`BubbleCanvas`]'s `data` signal and are turned
//! into simulation nodes; physics, camera and gestures all work on the same
//! 1920-unit logical square.

mod boundary;
mod camera;
mod color;
mod component;
pub mod config;
mod coords;
mod drag;
mod error;
mod layout;
mod node;
mod render;
mod scrollbar;
mod simulation;
mod state;
mod store;
mod types;

pub use component::{BubbleCanvas, PlacedItem};
pub use config::{CanvasConfig, LayoutMode};
pub use types::{AlbumRecord, CanvasItem, DRAG_PAYLOAD_TYPE, GenreRecord};
