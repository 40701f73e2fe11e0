//! Per-frame metadata and the two synthesized chunk payloads that carry it.
//!
//! Palette dump (`full`):
//!
//! ```text
//! "full" 0x00 0x08 { r g b a 0xFF 0xFF }*
//! ```
//!
//! Control table (`fsctrl`), one 14-byte record per frame, integers little-endian:
//!
//! ```text
//! "fsctrl" 0x00 0xFF { min.x:i16 min.y:i16 max.x:i16 max.y:i16 origin.x:i16 origin.y:i16 delay:u8 action:u8 }*
//! ```

use crate::container::chunk::ChunkType;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{SpritePackError, SpritePackResult};

pub const PALETTE_KEYWORD: &[u8] = b"full";
pub const PALETTE_SAMPLE_DEPTH: u8 = 0x08;
pub const PALETTE_ENTRY_LEN: usize = 6;
const PALETTE_FREQUENCY: [u8; 2] = [0xFF, 0xFF];

pub const CONTROL_KEYWORD: &[u8] = b"fsctrl";
pub const CONTROL_FORMAT: u8 = 0xFF;
pub const CONTROL_RECORD_LEN: usize = 14;

/// Placement and playback data for one packed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameInfo {
    /// Placement on the sheet. Width and height equal the frame's trimmed bounding box.
    pub bbox: Rect,
    /// Offset that re-centers the trimmed sprite on its untrimmed frame.
    pub origin: Point,
    pub delay: u8,
    pub action: u8,
}

/// Which chunk types carry the palette dump and control table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkTagStyle {
    /// Private ancillary, safe-to-copy types `fuLl` and `fsCt`.
    #[default]
    Private,
    /// `sPLT` and `zTXt`, as read by older consumers. Generic PNG readers will misparse these.
    Legacy,
}

impl ChunkTagStyle {
    pub fn palette_type(self) -> ChunkType {
        match self {
            Self::Private => ChunkType::PALETTE_DUMP,
            Self::Legacy => ChunkType::sPLT,
        }
    }

    pub fn control_type(self) -> ChunkType {
        match self {
            Self::Private => ChunkType::CONTROL_TABLE,
            Self::Legacy => ChunkType::zTXt,
        }
    }
}

fn header(keyword: &[u8], format: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(keyword.len() + 2);
    buf.extend_from_slice(keyword);
    buf.push(0);
    buf.push(format);
    buf
}

/// Split `payload` into the record area, checking the keyword header.
fn strip_header<'a>(payload: &'a [u8], keyword: &[u8], format: u8) -> SpritePackResult<&'a [u8]> {
    let expected = header(keyword, format);
    payload.strip_prefix(expected.as_slice()).ok_or_else(|| {
        SpritePackError::chunk_format(format!(
            "payload does not start with '{}' header",
            String::from_utf8_lossy(keyword)
        ))
    })
}

pub fn encode_palette_dump(palette: &[Rgba8]) -> Vec<u8> {
    let mut buf = header(PALETTE_KEYWORD, PALETTE_SAMPLE_DEPTH);
    buf.reserve(palette.len() * PALETTE_ENTRY_LEN);
    for c in palette {
        buf.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        buf.extend_from_slice(&PALETTE_FREQUENCY);
    }
    buf
}

pub fn decode_palette_dump(payload: &[u8]) -> SpritePackResult<Vec<Rgba8>> {
    let body = strip_header(payload, PALETTE_KEYWORD, PALETTE_SAMPLE_DEPTH)?;
    if body.len() % PALETTE_ENTRY_LEN != 0 {
        return Err(SpritePackError::chunk_format(format!(
            "palette dump body is {} bytes, not a multiple of {PALETTE_ENTRY_LEN}",
            body.len()
        )));
    }
    Ok(body
        .chunks_exact(PALETTE_ENTRY_LEN)
        .map(|e| Rgba8::new(e[0], e[1], e[2], e[3]))
        .collect())
}

fn to_i16(v: i32, what: &str) -> SpritePackResult<i16> {
    i16::try_from(v).map_err(|_| {
        SpritePackError::validation(format!("{what} {v} does not fit the control table (i16)"))
    })
}

pub fn encode_control_table(frames: &[FrameInfo]) -> SpritePackResult<Vec<u8>> {
    let mut buf = header(CONTROL_KEYWORD, CONTROL_FORMAT);
    buf.reserve(frames.len() * CONTROL_RECORD_LEN);
    for info in frames {
        let fields = [
            (info.bbox.min.x, "bbox min x"),
            (info.bbox.min.y, "bbox min y"),
            (info.bbox.max.x, "bbox max x"),
            (info.bbox.max.y, "bbox max y"),
            (info.origin.x, "origin x"),
            (info.origin.y, "origin y"),
        ];
        for (v, what) in fields {
            buf.extend_from_slice(&to_i16(v, what)?.to_le_bytes());
        }
        buf.push(info.delay);
        buf.push(info.action);
    }
    Ok(buf)
}

pub fn decode_control_table(payload: &[u8]) -> SpritePackResult<Vec<FrameInfo>> {
    let body = strip_header(payload, CONTROL_KEYWORD, CONTROL_FORMAT)?;
    if body.len() % CONTROL_RECORD_LEN != 0 {
        return Err(SpritePackError::chunk_format(format!(
            "control table body is {} bytes, not a multiple of {CONTROL_RECORD_LEN}",
            body.len()
        )));
    }
    Ok(body
        .chunks_exact(CONTROL_RECORD_LEN)
        .map(|r| {
            let i = |n: usize| i32::from(i16::from_le_bytes([r[2 * n], r[2 * n + 1]]));
            FrameInfo {
                bbox: Rect::new(i(0), i(1), i(2), i(3)),
                origin: Point::new(i(4), i(5)),
                delay: r[12],
                action: r[13],
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "../tests/unit/meta/meta.rs"]
mod tests;
