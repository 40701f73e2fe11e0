use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{IndexedRaster, Palette, Rgba8};
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::source::{Animation, Frame, FrameSource, SpriteSet};

/// JSON description of the frames to pack. Image paths are relative to the manifest file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub sprite_sets: Vec<ManifestSpriteSet>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSpriteSet {
    pub animations: Vec<ManifestAnimation>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestAnimation {
    pub frames: Vec<ManifestFrame>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFrame {
    pub image: PathBuf,
    #[serde(default)]
    pub delay: u8,
    #[serde(default)]
    pub action: u8,
}

pub fn read_manifest(path: &Path) -> SpritePackResult<Manifest> {
    let f = File::open(path).map_err(|e| {
        SpritePackError::source_read(format!("open manifest '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        SpritePackError::source_read(format!("parse manifest '{}': {e}", path.display()))
    })
}

/// [`FrameSource`] backed by a JSON [`Manifest`] and image files on disk.
///
/// Every sprite set gets one shared palette: entry 0 is transparent, then each distinct opaque
/// (or partially opaque) color in frame order. Fully transparent pixels all map to entry 0.
#[derive(Clone, Debug)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for ManifestSource {
    fn read_sprite_sets(&self) -> SpritePackResult<Vec<SpriteSet>> {
        let manifest = read_manifest(&self.path)?;
        let root = self.path.parent().unwrap_or_else(|| Path::new("."));

        manifest
            .sprite_sets
            .iter()
            .enumerate()
            .map(|(index, set)| load_sprite_set(root, index, set))
            .collect()
    }
}

fn load_sprite_set(
    root: &Path,
    index: usize,
    set: &ManifestSpriteSet,
) -> SpritePackResult<SpriteSet> {
    let mut images = Vec::new();
    for anim in &set.animations {
        let mut frames = Vec::with_capacity(anim.frames.len());
        for frame in &anim.frames {
            let path = root.join(&frame.image);
            let img = image::open(&path)
                .map_err(|e| {
                    SpritePackError::source_read(format!(
                        "decode frame image '{}': {e}",
                        path.display()
                    ))
                })?
                .to_rgba8();
            frames.push((img, frame.delay, frame.action));
        }
        images.push(frames);
    }

    let mut palettizer = Palettizer::default();
    let mut rasters = Vec::with_capacity(images.len());
    for frames in &images {
        let mut anim = Vec::with_capacity(frames.len());
        for (img, _, _) in frames {
            anim.push(palettizer.index_image(img).map_err(|e| {
                SpritePackError::source_read(format!("sprite set {index}: {e}"))
            })?);
        }
        rasters.push(anim);
    }
    let palette = palettizer.finish()?;

    let animations = images
        .into_iter()
        .zip(rasters)
        .map(|(frames, rasters)| Animation {
            frames: frames
                .into_iter()
                .zip(rasters)
                .map(|((_, delay, action), raster)| Frame {
                    raster,
                    palette: palette.clone(),
                    delay,
                    action,
                })
                .collect(),
        })
        .collect();

    Ok(SpriteSet { index, animations })
}

/// Exact (lossless) palette builder.
struct Palettizer {
    colors: Vec<Rgba8>,
    lookup: HashMap<Rgba8, u8>,
}

impl Default for Palettizer {
    fn default() -> Self {
        Self {
            colors: vec![Rgba8::TRANSPARENT],
            lookup: HashMap::new(),
        }
    }
}

impl Palettizer {
    fn index_of(&mut self, c: Rgba8) -> SpritePackResult<u8> {
        if c.a == 0 {
            return Ok(0);
        }
        if let Some(&i) = self.lookup.get(&c) {
            return Ok(i);
        }
        if self.colors.len() == Palette::MAX_ENTRIES {
            return Err(SpritePackError::source_read(format!(
                "more than {} distinct colors; frames must be palettizable",
                Palette::MAX_ENTRIES
            )));
        }
        let i = self.colors.len() as u8;
        self.colors.push(c);
        self.lookup.insert(c, i);
        Ok(i)
    }

    fn index_image(&mut self, img: &image::RgbaImage) -> SpritePackResult<IndexedRaster> {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for px in img.pixels() {
            let [r, g, b, a] = px.0;
            pixels.push(self.index_of(Rgba8::new(r, g, b, a))?);
        }
        IndexedRaster::new(w, h, pixels)
    }

    fn finish(self) -> SpritePackResult<Palette> {
        Palette::new(self.colors)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/manifest.rs"]
mod tests;
