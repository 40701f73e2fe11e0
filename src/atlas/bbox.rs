use crate::foundation::core::{AlphaRaster, Rect};

/// Smallest rectangle enclosing every pixel with non-zero alpha.
///
/// Each edge is found independently by scanning inward until the first column (or row) that holds
/// any ink. A raster without ink yields [`Rect::EMPTY`]; callers treat that as "nothing to draw".
pub fn find_bbox<R: AlphaRaster + ?Sized>(img: &R) -> Rect {
    let (w, h) = (img.width(), img.height());

    let column_has_ink = |x: u32| (0..h).any(|y| img.alpha(x, y) != 0);
    let row_has_ink = |y: u32| (0..w).any(|x| img.alpha(x, y) != 0);

    let Some(left) = (0..w).find(|&x| column_has_ink(x)) else {
        return Rect::EMPTY;
    };
    let Some(top) = (0..h).find(|&y| row_has_ink(y)) else {
        return Rect::EMPTY;
    };
    // Ink exists, so both reverse scans stop at or after `left`/`top`.
    let right = (left..w).rev().find(|&x| column_has_ink(x)).unwrap_or(left) + 1;
    let bottom = (top..h).rev().find(|&y| row_has_ink(y)).unwrap_or(top) + 1;

    Rect::new(left as i32, top as i32, right as i32, bottom as i32)
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/bbox.rs"]
mod tests;
