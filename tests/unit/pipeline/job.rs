use super::*;
use crate::container::chunk::{ChunkReader, ChunkType, ChunkWriter, PNG_SIGNATURE};
use crate::encode::PngCodec;
use crate::foundation::core::Rgba8;
use crate::meta::decode_control_table;
use crate::source::{Animation, Frame};

fn dot_set(index: usize, dots: &[(u32, u32)]) -> SpriteSet {
    let palette = Palette::new(vec![Rgba8::TRANSPARENT, Rgba8::new(40, 80, 120, 255)]).unwrap();
    let frames = dots
        .iter()
        .map(|&(x, y)| {
            let mut raster = IndexedRaster::blank(16, 16);
            raster.set(x, y, 1);
            Frame {
                raster,
                palette: palette.clone(),
                delay: 5,
                action: 1,
            }
        })
        .collect();
    SpriteSet {
        index,
        animations: vec![Animation { frames }],
    }
}

fn config(dir: &Path) -> PackConfig {
    PackConfig {
        output_dir: dir.to_path_buf(),
        ..PackConfig::default()
    }
}

struct FailingCodec;

impl ImageCodec for FailingCodec {
    fn encode(&self, _: &IndexedRaster, _: &Palette, out: &mut dyn Write) -> SpritePackResult<()> {
        out.write_all(&PNG_SIGNATURE)
            .map_err(|e| SpritePackError::encode(e.to_string()))?;
        Err(SpritePackError::encode("codec gave up"))
    }
}

struct GarbageCodec;

impl ImageCodec for GarbageCodec {
    fn encode(&self, _: &IndexedRaster, _: &Palette, out: &mut dyn Write) -> SpritePackResult<()> {
        out.write_all(b"definitely not a png")
            .map_err(|e| SpritePackError::encode(e.to_string()))
    }
}

struct NoTrnsCodec;

impl ImageCodec for NoTrnsCodec {
    fn encode(&self, _: &IndexedRaster, _: &Palette, out: &mut dyn Write) -> SpritePackResult<()> {
        let mut w = ChunkWriter::new(out)?;
        w.write_chunk(ChunkType::IHDR, &[0; 13])?;
        w.write_chunk(ChunkType::IEND, &[])
    }
}

#[test]
fn writes_annotated_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let set = dot_set(3, &[(3, 4), (10, 2)]);

    let outcome = run_job(&set, &PngCodec::default(), &cfg).unwrap();
    let path = dir.path().join("0003.png");
    assert_eq!(
        outcome,
        JobOutcome::Written {
            path: path.clone(),
            frames: 2
        }
    );

    let bytes = std::fs::read(&path).unwrap();
    let chunks: Vec<_> = ChunkReader::new(bytes.as_slice())
        .unwrap()
        .collect::<SpritePackResult<_>>()
        .unwrap();
    let trns = chunks
        .iter()
        .position(|c| c.ty == ChunkType::tRNS)
        .unwrap();
    assert_eq!(chunks[trns + 1].ty, ChunkType::PALETTE_DUMP);
    assert_eq!(chunks[trns + 2].ty, ChunkType::CONTROL_TABLE);

    let infos = decode_control_table(&chunks[trns + 2].data).unwrap();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[1].bbox, crate::Rect::new(2, 0, 3, 1));

    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 1));
    assert_eq!(img.get_pixel(2, 0).0, [40, 80, 120, 255]);
}

#[test]
fn rendezvous_pipe_handles_large_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PackConfig {
        pipe_capacity: 0,
        ..config(dir.path())
    };
    let palette = Palette::new(vec![
        Rgba8::TRANSPARENT,
        Rgba8::new(1, 2, 3, 255),
        Rgba8::new(3, 2, 1, 128),
    ])
    .unwrap();
    let mut raster = IndexedRaster::blank(300, 300);
    for y in 0..300u32 {
        for x in 0..300u32 {
            raster.set(x, y, ((x * 7 + y * 13) % 3) as u8);
        }
    }
    let set = SpriteSet {
        index: 0,
        animations: vec![Animation {
            frames: vec![Frame {
                raster,
                palette,
                delay: 1,
                action: 0,
            }],
        }],
    };

    let outcome = run_job(&set, &PngCodec::default(), &cfg).unwrap();
    assert!(matches!(outcome, JobOutcome::Written { frames: 1, .. }));
}

#[test]
fn blank_set_is_skipped_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let set = SpriteSet {
        index: 1,
        animations: vec![],
    };
    let outcome = run_job(&set, &PngCodec::default(), &config(dir.path())).unwrap();
    assert_eq!(outcome, JobOutcome::Skipped);
    assert!(!dir.path().join("0001.png").exists());
}

#[test]
fn codec_failure_is_reported_and_partial_file_removed() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_job(&dot_set(0, &[(0, 0)]), &FailingCodec, &config(dir.path())).unwrap_err();
    assert!(matches!(err, SpritePackError::Encode(_)), "{err}");
    assert!(!dir.path().join("0000.png").exists());
}

#[test]
fn partial_file_is_kept_when_cleanup_is_off() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PackConfig {
        remove_partial_outputs: false,
        ..config(dir.path())
    };
    assert!(run_job(&dot_set(0, &[(0, 0)]), &FailingCodec, &cfg).is_err());
    assert!(dir.path().join("0000.png").exists());
}

#[test]
fn malformed_codec_output_is_a_chunk_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_job(&dot_set(0, &[(0, 0)]), &GarbageCodec, &config(dir.path())).unwrap_err();
    assert!(matches!(err, SpritePackError::ChunkFormat(_)), "{err}");
}

#[test]
fn stream_without_trns_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_job(&dot_set(0, &[(0, 0)]), &NoTrnsCodec, &config(dir.path())).unwrap_err();
    assert!(matches!(err, SpritePackError::ChunkFormat(_)), "{err}");
    assert!(!dir.path().join("0000.png").exists());
}

#[test]
fn missing_output_dir_is_a_file_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir.path().join("does-not-exist"));
    let err = run_job(&dot_set(0, &[(0, 0)]), &PngCodec::default(), &cfg).unwrap_err();
    assert!(matches!(err, SpritePackError::FileWrite(_)), "{err}");
}
