use super::*;
use crate::container::chunk::{Chunk, ChunkWriter};
use crate::container::rewrite::{Annotations, rewrite_stream};
use crate::foundation::core::{Point, Rect};

fn ihdr(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 3, 0, 0, 0]);
    data
}

fn plain_stream(extra: &[Chunk]) -> Vec<u8> {
    let mut w = ChunkWriter::new(Vec::new()).unwrap();
    w.write_chunk(ChunkType::IHDR, &ihdr(7, 3)).unwrap();
    w.write_chunk(ChunkType::PLTE, &[0, 0, 0, 9, 9, 9]).unwrap();
    w.write_chunk(ChunkType::tRNS, &[0, 255]).unwrap();
    for c in extra {
        w.write_chunk(c.ty, &c.data).unwrap();
    }
    w.write_chunk(ChunkType::IDAT, &[0; 4]).unwrap();
    w.write_chunk(ChunkType::IEND, &[]).unwrap();
    w.into_inner()
}

fn annotated(tags: ChunkTagStyle) -> (Vec<u8>, Vec<Rgba8>, Vec<FrameInfo>) {
    let palette = vec![Rgba8::TRANSPARENT, Rgba8::new(9, 9, 9, 255)];
    let frames = vec![
        FrameInfo {
            bbox: Rect::new(0, 0, 3, 3),
            origin: Point::new(5, 4),
            delay: 6,
            action: 0,
        },
        FrameInfo {
            bbox: Rect::new(4, 0, 7, 2),
            origin: Point::new(-1, 2),
            delay: 6,
            action: 3,
        },
    ];
    let ann = Annotations {
        palette: &palette,
        frames: &frames,
        tags,
    };
    let mut out = Vec::new();
    rewrite_stream(plain_stream(&[]).as_slice(), &mut out, &ann).unwrap();
    (out, palette, frames)
}

#[test]
fn reads_back_private_chunks() {
    let (bytes, palette, frames) = annotated(ChunkTagStyle::Private);
    let info = inspect_sheet(bytes.as_slice()).unwrap();
    assert_eq!((info.width, info.height), (7, 3));
    assert_eq!(info.tags, ChunkTagStyle::Private);
    assert_eq!(info.palette, palette);
    assert_eq!(info.frames, frames);
}

#[test]
fn reads_back_legacy_chunks() {
    let (bytes, palette, frames) = annotated(ChunkTagStyle::Legacy);
    let info = inspect_sheet(bytes.as_slice()).unwrap();
    assert_eq!(info.tags, ChunkTagStyle::Legacy);
    assert_eq!(info.palette, palette);
    assert_eq!(info.frames, frames);
}

#[test]
fn unrelated_legacy_chunks_are_ignored() {
    let bytes = plain_stream(&[
        Chunk::new(ChunkType::sPLT, b"other\0\x08".to_vec()),
        Chunk::new(ChunkType::zTXt, b"Comment\0\0xx".to_vec()),
    ]);
    let err = inspect_sheet(bytes.as_slice()).unwrap_err();
    assert!(matches!(err, SpritePackError::ChunkFormat(_)), "{err}");
}

#[test]
fn sheet_without_metadata_is_rejected() {
    let err = inspect_sheet(plain_stream(&[]).as_slice()).unwrap_err();
    assert!(err.to_string().contains("palette dump"), "{err}");
}

#[test]
fn corrupt_crc_is_reported() {
    let (mut bytes, _, _) = annotated(ChunkTagStyle::Private);
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    let err = inspect_sheet(bytes.as_slice()).unwrap_err();
    assert!(err.to_string().contains("crc"), "{err}");
}

#[test]
fn missing_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = inspect_file(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, SpritePackError::SourceRead(_)));
}
