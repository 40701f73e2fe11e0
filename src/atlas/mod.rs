//! Trimming, shelf packing and drawing of frames into one sprite sheet.

pub mod bbox;
pub mod compose;
pub mod packer;

pub use bbox::find_bbox;
pub use compose::{Canvas, ComposedAtlas, compose_sprite_set};
pub use packer::{Placement, ShelfPacker};
