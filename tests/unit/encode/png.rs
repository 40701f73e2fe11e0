use super::*;
use crate::container::chunk::{ChunkReader, ChunkType};
use crate::foundation::core::Rgba8;

fn sample() -> (IndexedRaster, Palette) {
    let mut raster = IndexedRaster::blank(3, 2);
    raster.set(1, 1, 1);
    let palette = Palette::new(vec![Rgba8::TRANSPARENT, Rgba8::new(200, 100, 50, 255)]).unwrap();
    (raster, palette)
}

#[test]
fn emits_plte_and_trns_before_image_data() {
    let (raster, palette) = sample();
    let mut out = Vec::new();
    PngCodec::default()
        .encode(&raster, &palette, &mut out)
        .unwrap();

    let types: Vec<_> = ChunkReader::new(out.as_slice())
        .unwrap()
        .map(|c| c.unwrap().ty)
        .collect();
    assert_eq!(
        &types[..3],
        &[ChunkType::IHDR, ChunkType::PLTE, ChunkType::tRNS]
    );
    assert!(types.contains(&ChunkType::IDAT));
    assert_eq!(types.last(), Some(&ChunkType::IEND));
}

#[test]
fn decodes_back_to_the_same_pixels() {
    let (raster, palette) = sample();
    let mut out = Vec::new();
    PngCodec::new(PngCompression::Best)
        .encode(&raster, &palette, &mut out)
        .unwrap();

    let img = image::load_from_memory(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(1, 1).0, [200, 100, 50, 255]);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
}

#[test]
fn empty_raster_is_an_encode_error() {
    let (_, palette) = sample();
    let err = PngCodec::default()
        .encode(&IndexedRaster::blank(0, 4), &palette, &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, SpritePackError::Encode(_)));
}
