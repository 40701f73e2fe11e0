use crate::foundation::error::{SpritePackError, SpritePackResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer pixel rectangle, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const EMPTY: Self = Self {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    pub const fn from_origin_size(origin: Point, width: i32, height: i32) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + width, origin.y + height),
        }
    }

    pub fn width(self) -> i32 {
        (self.max.x - self.min.x).max(0)
    }

    pub fn height(self) -> i32 {
        (self.max.y - self.min.y).max(0)
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when the two rects share at least one pixel. Empty rects overlap nothing.
    pub fn overlaps(self, other: Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_rect(self, other: Rect) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Indexed color palette, at most 256 entries.
///
/// Entry 0 is the background color of every canvas and is expected to be fully transparent.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette(Vec<Rgba8>);

impl Palette {
    pub const MAX_ENTRIES: usize = 256;

    pub fn new(entries: Vec<Rgba8>) -> SpritePackResult<Self> {
        if entries.is_empty() {
            return Err(SpritePackError::validation("palette must not be empty"));
        }
        if entries.len() > Self::MAX_ENTRIES {
            return Err(SpritePackError::validation(format!(
                "palette has {} entries, at most {} allowed",
                entries.len(),
                Self::MAX_ENTRIES
            )));
        }
        Ok(Self(entries))
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgba8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Alpha of palette entry `index`; indices past the end read as transparent.
    pub fn alpha(&self, index: u8) -> u8 {
        self.0.get(usize::from(index)).map_or(0, |c| c.a)
    }

    /// Whether entry 0 exists and is fully transparent.
    pub fn has_transparent_background(&self) -> bool {
        self.0.first().is_some_and(|c| c.a == 0)
    }
}

/// Row-major 8-bit indexed raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IndexedRaster {
    /// Wrap row-major `pixels`; the length must be exactly `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> SpritePackResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| SpritePackError::validation("raster dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(SpritePackError::validation(format!(
                "raster data has {} pixels, expected {width}x{height} = {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster filled with palette index 0.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(0,0)..(width,height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Index at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, index: u8) {
        self.pixels[y as usize * self.width as usize + x as usize] = index;
    }

    /// Copy out the sub-rectangle `rect`, which must lie inside [`Self::bounds`].
    pub fn crop(&self, rect: Rect) -> IndexedRaster {
        let w = rect.width() as u32;
        let h = rect.height() as u32;
        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for y in rect.min.y..rect.max.y {
            let row = y as usize * self.width as usize;
            pixels.extend_from_slice(
                &self.pixels[row + rect.min.x as usize..row + rect.max.x as usize],
            );
        }
        IndexedRaster {
            width: w,
            height: h,
            pixels,
        }
    }
}

/// Anything with a per-pixel alpha that can be scanned for ink.
pub trait AlphaRaster {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn alpha(&self, x: u32, y: u32) -> u8;
}

/// An indexed raster viewed through the palette that colors it.
#[derive(Clone, Copy, Debug)]
pub struct PalettedView<'a> {
    pub raster: &'a IndexedRaster,
    pub palette: &'a Palette,
}

impl AlphaRaster for PalettedView<'_> {
    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.palette.alpha(self.raster.get(x, y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
