#![forbid(unsafe_code)]

//! Sprite sheet packer.
//!
//! Frames of every animation in a sprite set are trimmed to their ink, shelf-packed into one
//! indexed canvas, encoded as PNG and annotated with two extra chunks: a palette dump and a
//! per-frame control table. Sprite sets are packed in parallel, one output file each.

pub mod atlas;
pub mod config;
pub mod container;
pub mod encode;
pub mod foundation;
pub mod inspect;
pub mod meta;
pub mod pipeline;
pub mod source;

pub use atlas::{ComposedAtlas, ShelfPacker, compose_sprite_set, find_bbox};
pub use config::PackConfig;
pub use encode::{ImageCodec, PngCodec, PngCompression};
pub use foundation::core::{
    AlphaRaster, IndexedRaster, Palette, PalettedView, Point, Rect, Rgba8,
};
pub use foundation::error::{SpritePackError, SpritePackResult};
pub use inspect::{SheetInfo, inspect_file, inspect_sheet};
pub use meta::{ChunkTagStyle, FrameInfo};
pub use pipeline::{BatchReport, FailurePolicy, JobOutcome, pack, run_batch, run_job};
pub use source::{Animation, Frame, FrameSource, ManifestSource, SpriteSet};
