//! Frame input model and the collaborator seam that produces it.
//!
//! Decoding the source animation container is not this crate's job; a [`FrameSource`] hands
//! over fully decoded [`SpriteSet`]s. [`ManifestSource`] is the built-in source used by the CLI.

mod manifest;

pub use manifest::{
    Manifest, ManifestAnimation, ManifestFrame, ManifestSource, ManifestSpriteSet, read_manifest,
};

use crate::foundation::core::{IndexedRaster, Palette, PalettedView};
use crate::foundation::error::SpritePackResult;

/// One decoded animation frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub raster: IndexedRaster,
    pub palette: Palette,
    pub delay: u8,
    pub action: u8,
}

impl Frame {
    pub fn view(&self) -> PalettedView<'_> {
        PalettedView {
            raster: &self.raster,
            palette: &self.palette,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Animation {
    pub frames: Vec<Frame>,
}

/// All animations of one sprite; packed into one output file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteSet {
    pub index: usize,
    pub animations: Vec<Animation>,
}

impl SpriteSet {
    /// Frames across all animations in animation order, then frame order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.animations.iter().flat_map(|a| a.frames.iter())
    }

    pub fn frame_count(&self) -> usize {
        self.animations.iter().map(|a| a.frames.len()).sum()
    }
}

/// Produces every sprite set of a run, in index order.
///
/// Failures surface as [`SpritePackError::SourceRead`](crate::SpritePackError::SourceRead) and
/// abort the run before any job is scheduled.
pub trait FrameSource {
    fn read_sprite_sets(&self) -> SpritePackResult<Vec<SpriteSet>>;
}

impl FrameSource for Vec<SpriteSet> {
    fn read_sprite_sets(&self) -> SpritePackResult<Vec<SpriteSet>> {
        Ok(self.clone())
    }
}
