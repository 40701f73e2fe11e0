use crate::atlas::bbox::find_bbox;
use crate::atlas::packer::ShelfPacker;
use crate::foundation::core::{AlphaRaster, IndexedRaster, Palette, Point, Rect};
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::meta::FrameInfo;
use crate::source::{Frame, SpriteSet};

/// Fixed-size indexed drawing surface for one sprite set.
///
/// Undrawn pixels hold palette index 0, which must be transparent. The active palette is the
/// palette of the most recently drawn frame.
///
/// Ink is tracked per pixel as it is drawn, independent of the active palette, so a later
/// palette that makes an earlier index transparent cannot hide placed frames from the packer.
#[derive(Clone, Debug)]
pub struct Canvas {
    raster: IndexedRaster,
    drawn: Vec<bool>,
    palette: Option<Palette>,
}

impl Canvas {
    /// Blank canvas with no active palette.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: IndexedRaster::blank(width, height),
            drawn: vec![false; width as usize * height as usize],
            palette: None,
        }
    }

    /// Palette of the most recently drawn frame, if any.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Palette indices drawn so far; undrawn pixels are 0.
    pub fn raster(&self) -> &IndexedRaster {
        &self.raster
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.raster.width() as usize + x as usize
    }

    fn set_palette(&mut self, palette: &Palette) {
        if self.palette.as_ref() != Some(palette) {
            self.palette = Some(palette.clone());
        }
    }

    /// Copy the ink of `frame` inside `src` to `dst` (same size). Transparent source pixels leave
    /// the canvas untouched.
    fn draw(&mut self, frame: &Frame, src: Rect, dst: Rect) {
        let view = frame.view();
        for dy in 0..src.height() {
            for dx in 0..src.width() {
                let (sx, sy) = ((src.min.x + dx) as u32, (src.min.y + dy) as u32);
                if view.alpha(sx, sy) == 0 {
                    continue;
                }
                let index = frame.raster.get(sx, sy);
                let (tx, ty) = ((dst.min.x + dx) as u32, (dst.min.y + dy) as u32);
                self.raster.set(tx, ty, index);
                let at = self.offset(tx, ty);
                self.drawn[at] = true;
            }
        }
    }
}

/// Reads as fully opaque wherever a frame has drawn ink.
impl AlphaRaster for Canvas {
    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        if self.drawn[self.offset(x, y)] {
            u8::MAX
        } else {
            0
        }
    }
}

/// A packed, trimmed sprite sheet ready for encoding.
#[derive(Clone, Debug)]
pub struct ComposedAtlas {
    pub raster: IndexedRaster,
    pub palette: Palette,
    /// One entry per input frame, in animation then frame order.
    pub frames: Vec<FrameInfo>,
}

/// Trim, pack and draw every frame of `set` onto a `canvas_width` x `canvas_height` canvas.
///
/// Returns `None` when the set has no ink at all. The output raster spans from the canvas origin
/// to the far corner of the drawn ink, so [`FrameInfo::bbox`] values address it directly.
pub fn compose_sprite_set(
    set: &SpriteSet,
    canvas_width: u32,
    canvas_height: u32,
) -> SpritePackResult<Option<ComposedAtlas>> {
    let mut packer = ShelfPacker::new(canvas_width, canvas_height)?;
    let mut canvas = Canvas::new(canvas_width, canvas_height);
    let mut frames = Vec::with_capacity(set.frame_count());

    for (n, frame) in set.frames().enumerate() {
        if !frame.palette.has_transparent_background() {
            return Err(SpritePackError::validation(format!(
                "frame {n}: palette entry 0 must be fully transparent"
            )));
        }
        if canvas
            .palette()
            .is_some_and(|active| active != &frame.palette)
        {
            tracing::warn!(
                sprite_set = set.index,
                frame = n,
                "frame palette differs from the previous frame; the last palette wins"
            );
        }
        canvas.set_palette(&frame.palette);

        let trim = find_bbox(&frame.view());
        let placement = packer.place(
            (frame.raster.width(), frame.raster.height()),
            trim,
            || find_bbox(&canvas),
        )?;

        if !trim.is_empty() {
            canvas.draw(frame, trim, placement.bbox);
        }
        frames.push(FrameInfo {
            bbox: placement.bbox,
            origin: placement.origin,
            delay: frame.delay,
            action: frame.action,
        });
    }

    let ink = find_bbox(&canvas);
    if ink.is_empty() {
        return Ok(None);
    }
    let Some(palette) = canvas.palette else {
        return Ok(None);
    };
    let raster = canvas
        .raster
        .crop(Rect::from_origin_size(Point::ZERO, ink.max.x, ink.max.y));

    Ok(Some(ComposedAtlas {
        raster,
        palette,
        frames,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/compose.rs"]
mod tests;
