use std::io::{Read, Write};

use crate::container::chunk::{ChunkReader, ChunkType, ChunkWriter};
use crate::foundation::core::Rgba8;
use crate::foundation::error::SpritePackResult;
use crate::meta::{ChunkTagStyle, FrameInfo, encode_control_table, encode_palette_dump};

/// Metadata injected into a sprite sheet stream.
#[derive(Clone, Copy, Debug)]
pub struct Annotations<'a> {
    pub palette: &'a [Rgba8],
    pub frames: &'a [FrameInfo],
    pub tags: ChunkTagStyle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub chunks_in: u64,
    pub chunks_out: u64,
    /// Whether a `tRNS` chunk was seen and the metadata pair written after it.
    pub injected: bool,
}

/// Copy a PNG stream chunk by chunk, inserting the palette dump and control table right after
/// the first `tRNS` chunk.
///
/// Every input chunk is written unchanged and in order (with a freshly computed CRC). Only one
/// chunk is buffered at a time. A stream without `tRNS` is copied as is and reported through
/// [`RewriteStats::injected`].
pub fn rewrite_stream<R: Read, W: Write>(
    input: R,
    output: W,
    ann: &Annotations<'_>,
) -> SpritePackResult<RewriteStats> {
    let palette_payload = encode_palette_dump(ann.palette);
    let control_payload = encode_control_table(ann.frames)?;

    let mut reader = ChunkReader::new(input)?;
    let mut writer = ChunkWriter::new(output)?;
    let mut injected = false;

    while let Some(chunk) = reader.next_chunk()? {
        writer.write_chunk(chunk.ty, &chunk.data)?;

        if chunk.ty == ChunkType::tRNS && !injected {
            writer.write_chunk(ann.tags.palette_type(), &palette_payload)?;
            writer.write_chunk(ann.tags.control_type(), &control_payload)?;
            injected = true;
            tracing::debug!(
                palette_entries = ann.palette.len(),
                frames = ann.frames.len(),
                "metadata chunks injected"
            );
        }
    }
    writer.flush()?;

    Ok(RewriteStats {
        chunks_in: reader.chunks_read(),
        chunks_out: writer.chunks_written(),
        injected,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/container/rewrite.rs"]
mod tests;
