use super::*;
use proptest::prelude::*;

/// Ink on a canvas drawn with trimmed frames is the union of their placements.
fn ink_of(placed: &[Rect]) -> Rect {
    placed
        .iter()
        .filter(|r| !r.is_empty())
        .fold(Rect::EMPTY, |acc, r| {
            if acc.is_empty() {
                *r
            } else {
                Rect::new(
                    acc.min.x.min(r.min.x),
                    acc.min.y.min(r.min.y),
                    acc.max.x.max(r.max.x),
                    acc.max.y.max(r.max.y),
                )
            }
        })
}

fn pack(canvas: (u32, u32), sizes: &[(i32, i32)]) -> SpritePackResult<Vec<Rect>> {
    let mut packer = ShelfPacker::new(canvas.0, canvas.1)?;
    let mut placed = Vec::new();
    for &(w, h) in sizes {
        let trim = Rect::new(0, 0, w, h);
        let p = packer.place((w as u32, h as u32), trim, || ink_of(&placed))?;
        placed.push(p.bbox);
    }
    Ok(placed)
}

#[test]
fn places_left_to_right_with_one_pixel_gap() {
    let placed = pack((1024, 1024), &[(1, 1), (1, 1), (3, 2)]).unwrap();
    assert_eq!(placed[0], Rect::new(0, 0, 1, 1));
    assert_eq!(placed[1], Rect::new(2, 0, 3, 1));
    assert_eq!(placed[2], Rect::new(4, 0, 7, 2));
}

#[test]
fn wraps_below_lowest_ink() {
    let placed = pack((10, 100), &[(4, 3), (4, 5), (4, 2)]).unwrap();
    assert_eq!(placed[0], Rect::new(0, 0, 4, 3));
    assert_eq!(placed[1], Rect::new(5, 0, 9, 5));
    // Lowest ink row is 4, so the next shelf starts one row further down.
    assert_eq!(placed[2], Rect::new(0, 6, 4, 8));
}

#[test]
fn exact_fit_does_not_wrap() {
    let placed = pack((10, 10), &[(4, 1), (5, 1)]).unwrap();
    assert_eq!(placed[1], Rect::new(5, 0, 10, 1));
}

#[test]
fn origin_recenters_trimmed_frame() {
    let mut packer = ShelfPacker::new(64, 64).unwrap();
    let p = packer
        .place((16, 16), Rect::new(3, 5, 4, 6), || Rect::EMPTY)
        .unwrap();
    assert_eq!(p.origin, Point::new(8 - 3, 8 - 5));
}

#[test]
fn empty_trim_still_advances_cursor() {
    let mut packer = ShelfPacker::new(64, 64).unwrap();
    let p = packer
        .place((16, 16), Rect::EMPTY, || Rect::EMPTY)
        .unwrap();
    assert!(p.bbox.is_empty());
    assert_eq!(packer.cursor(), Point::new(1, 0));
}

#[test]
fn too_wide_frame_overflows() {
    let err = pack((8, 8), &[(9, 1)]).unwrap_err();
    assert!(matches!(err, SpritePackError::CanvasOverflow(_)));
}

#[test]
fn too_tall_stack_overflows() {
    let err = pack((4, 4), &[(4, 2), (4, 2)]).unwrap_err();
    assert!(matches!(err, SpritePackError::CanvasOverflow(_)));
}

#[test]
fn canvas_sides_beyond_i16_are_rejected() {
    let err = ShelfPacker::new(40_000, 8).unwrap_err();
    assert!(matches!(err, SpritePackError::Validation(_)));
    assert!(ShelfPacker::new(8, u32::MAX).is_err());
    assert!(ShelfPacker::new(i16::MAX as u32, i16::MAX as u32).is_ok());
}

proptest! {
    #[test]
    fn placements_never_overlap(sizes in prop::collection::vec((0i32..24, 0i32..24), 1..60)) {
        if let Ok(placed) = pack((128, 4096), &sizes) {
            let canvas = Rect::new(0, 0, 128, 4096);
            for (i, a) in placed.iter().enumerate() {
                prop_assert!(canvas.contains_rect(*a));
                prop_assert_eq!((a.width(), a.height()), sizes[i]);
                for b in &placed[i + 1..] {
                    prop_assert!(!a.overlaps(*b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }
}
