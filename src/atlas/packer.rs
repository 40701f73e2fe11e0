use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{SpritePackError, SpritePackResult};

/// Where one trimmed frame lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Placement on the canvas; same size as the frame's trimmed bounding box.
    pub bbox: Rect,
    /// Offset from the placement's top-left back to the center of the untrimmed frame.
    pub origin: Point,
}

/// Row-wrapping placement of frames on a fixed-size canvas.
///
/// Frames are laid out left to right with a one pixel gap. When the next frame does not fit in
/// the remaining width the cursor wraps to column 0, one row below the lowest ink currently on
/// the canvas. The caller supplies that ink extent at wrap time so rows pack as tightly as the
/// drawn content allows.
#[derive(Clone, Debug)]
pub struct ShelfPacker {
    canvas_width: i32,
    canvas_height: i32,
    cursor: Point,
}

impl ShelfPacker {
    /// Empty packer with the cursor at the canvas origin.
    ///
    /// Canvas sides must fit the `i16` coordinates of the control table.
    pub fn new(canvas_width: u32, canvas_height: u32) -> SpritePackResult<Self> {
        let side = |v: u32, name: &str| {
            i16::try_from(v).map(i32::from).map_err(|_| {
                SpritePackError::validation(format!(
                    "{name} {v} exceeds the largest canvas side {}",
                    i16::MAX
                ))
            })
        };
        Ok(Self {
            canvas_width: side(canvas_width, "canvas width")?,
            canvas_height: side(canvas_height, "canvas height")?,
            cursor: Point::ZERO,
        })
    }

    /// Top-left corner where the next frame would go if it fits the current row.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Place one frame.
    ///
    /// `frame_size` is the untrimmed frame extent, `trim` its ink bounding box in frame
    /// coordinates. `canvas_ink` is only called when the row wraps.
    ///
    /// A frame that would extend past the canvas is a [`SpritePackError::CanvasOverflow`]; the
    /// cursor is left untouched in that case.
    pub fn place(
        &mut self,
        frame_size: (u32, u32),
        trim: Rect,
        canvas_ink: impl FnOnce() -> Rect,
    ) -> SpritePackResult<Placement> {
        let (w, h) = (trim.width(), trim.height());
        if w > self.canvas_width {
            return Err(SpritePackError::canvas_overflow(format!(
                "frame is {w} px wide after trimming, canvas is {} px wide",
                self.canvas_width
            )));
        }

        let mut cursor = self.cursor;
        if cursor.x + w > self.canvas_width {
            let ink = canvas_ink();
            cursor.x = 0;
            if !ink.is_empty() {
                cursor.y = cursor.y.max(ink.max.y + 1);
            }
            tracing::debug!(top = cursor.y, "shelf wrap");
        }

        let bbox = Rect::from_origin_size(cursor, w, h);
        if bbox.max.y > self.canvas_height {
            return Err(SpritePackError::canvas_overflow(format!(
                "frame needs rows {}..{}, canvas is {} px tall",
                bbox.min.y, bbox.max.y, self.canvas_height
            )));
        }

        cursor.x += w + 1;
        self.cursor = cursor;

        let origin = Point::new(
            (frame_size.0 / 2) as i32 - trim.min.x,
            (frame_size.1 / 2) as i32 - trim.min.y,
        );
        Ok(Placement { bbox, origin })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/packer.rs"]
mod tests;
