//! Reads the palette dump and control table back out of a written sprite sheet.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::container::chunk::{ChunkReader, ChunkType};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::meta::{
    CONTROL_KEYWORD, ChunkTagStyle, FrameInfo, PALETTE_KEYWORD, decode_control_table,
    decode_palette_dump,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SheetInfo {
    pub width: u32,
    pub height: u32,
    /// Chunk types the metadata was found in.
    pub tags: ChunkTagStyle,
    pub palette: Vec<Rgba8>,
    pub frames: Vec<FrameInfo>,
}

pub fn inspect_file(path: &Path) -> SpritePackResult<SheetInfo> {
    let f = File::open(path).map_err(|e| {
        SpritePackError::source_read(format!("open sheet '{}': {e}", path.display()))
    })?;
    inspect_sheet(BufReader::new(f))
}

/// Walk every chunk of `input`, checking CRCs, and decode the metadata pair.
///
/// Both tag styles are recognized. Legacy chunks only count when their payload starts with the
/// matching keyword, so an unrelated `sPLT` or `zTXt` is left alone.
pub fn inspect_sheet<R: Read>(input: R) -> SpritePackResult<SheetInfo> {
    let mut size = None;
    let mut palette = None;
    let mut control = None;

    for chunk in ChunkReader::new(input)? {
        let chunk = chunk?;
        if chunk.ty == ChunkType::IHDR {
            size = Some(read_ihdr_size(&chunk.data)?);
        } else if let Some(style) = palette_style(chunk.ty, &chunk.data) {
            palette = Some((style, decode_palette_dump(&chunk.data)?));
        } else if let Some(style) = control_style(chunk.ty, &chunk.data) {
            control = Some((style, decode_control_table(&chunk.data)?));
        }
    }

    let (width, height) =
        size.ok_or_else(|| SpritePackError::chunk_format("sheet has no IHDR chunk"))?;
    let (_, palette) =
        palette.ok_or_else(|| SpritePackError::chunk_format("sheet has no palette dump"))?;
    let (tags, frames) =
        control.ok_or_else(|| SpritePackError::chunk_format("sheet has no control table"))?;

    Ok(SheetInfo {
        width,
        height,
        tags,
        palette,
        frames,
    })
}

fn read_ihdr_size(data: &[u8]) -> SpritePackResult<(u32, u32)> {
    if data.len() < 8 {
        return Err(SpritePackError::chunk_format(format!(
            "IHDR is {} bytes, too short",
            data.len()
        )));
    }
    let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    Ok((width, height))
}

fn has_keyword(data: &[u8], keyword: &[u8]) -> bool {
    data.strip_prefix(keyword)
        .is_some_and(|rest| rest.first() == Some(&0))
}

fn palette_style(ty: ChunkType, data: &[u8]) -> Option<ChunkTagStyle> {
    if ty == ChunkType::PALETTE_DUMP {
        Some(ChunkTagStyle::Private)
    } else if ty == ChunkType::sPLT && has_keyword(data, PALETTE_KEYWORD) {
        Some(ChunkTagStyle::Legacy)
    } else {
        None
    }
}

fn control_style(ty: ChunkType, data: &[u8]) -> Option<ChunkTagStyle> {
    if ty == ChunkType::CONTROL_TABLE {
        Some(ChunkTagStyle::Private)
    } else if ty == ChunkType::zTXt && has_keyword(data, CONTROL_KEYWORD) {
        Some(ChunkTagStyle::Legacy)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/inspect/inspect.rs"]
mod tests;
