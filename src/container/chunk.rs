use std::fmt::{self, Debug, Display, Write as _};
use std::io::{self, Read, Write};

use crate::foundation::error::{SpritePackError, SpritePackResult};

/// The eight bytes every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest chunk payload the format allows (2^31 - 1).
pub const MAX_CHUNK_LEN: u32 = 0x7FFF_FFFF;

/// Four-letter chunk type tag.
///
/// Case of each letter carries a property bit: ancillary (1st), private (2nd), reserved (3rd,
/// must be upper case) and safe-to-copy (4th).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

#[allow(nonstandard_style)]
impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const tRNS: Self = Self(*b"tRNS");
    pub const sPLT: Self = Self(*b"sPLT");
    pub const zTXt: Self = Self(*b"zTXt");

    /// Private ancillary palette dump.
    pub const PALETTE_DUMP: Self = Self(*b"fuLl");
    /// Private ancillary frame control table.
    pub const CONTROL_TABLE: Self = Self(*b"fsCt");
}

impl ChunkType {
    const PROPERTY_BIT: u8 = 0x20;

    /// Four ASCII letters with an upper-case reserved (third) letter.
    pub fn is_valid(self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic) && self.0[2] & Self::PROPERTY_BIT == 0
    }

    /// Decoders may ignore the chunk when they do not recognize it.
    pub fn is_ancillary(self) -> bool {
        self.0[0] & Self::PROPERTY_BIT != 0
    }

    /// Not a registered public chunk type.
    pub fn is_private(self) -> bool {
        self.0[1] & Self::PROPERTY_BIT != 0
    }

    /// Editors that modify critical chunks may still copy this one unchanged.
    pub fn is_safe_to_copy(self) -> bool {
        self.0[3] & Self::PROPERTY_BIT != 0
    }
}

impl Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            f.write_char(if b.is_ascii_graphic() { b as char } else { '?' })?;
        }
        Ok(())
    }
}

impl Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// One chunk with its payload. The CRC is not stored; writers recompute it.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    pub ty: ChunkType,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(ty: ChunkType, data: Vec<u8>) -> Self {
        Self { ty, data }
    }

    pub fn crc(&self) -> u32 {
        chunk_crc(self.ty, &self.data)
    }
}

impl Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("ty", &self.ty)
            .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
            .finish()
    }
}

fn chunk_crc(ty: ChunkType, data: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(&ty.0);
    h.update(data);
    h.finalize()
}

/// Fill `buf` completely, or report a clean end of stream if nothing at all was read.
fn read_full_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream ended after {filled} of {} bytes", buf.len()),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Pulls chunks one at a time out of a PNG byte stream.
///
/// Only the chunk being read is held in memory. Each chunk's CRC is checked.
pub struct ChunkReader<R> {
    inner: R,
    chunks_read: u64,
}

impl<R: Read> ChunkReader<R> {
    /// Consume and check the PNG signature.
    pub fn new(mut inner: R) -> SpritePackResult<Self> {
        let mut sig = [0u8; 8];
        let complete = read_full_or_eof(&mut inner, &mut sig)
            .map_err(|e| SpritePackError::chunk_format(format!("read PNG signature: {e}")))?;
        if !complete {
            return Err(SpritePackError::chunk_format("empty stream, no PNG signature"));
        }
        if sig != PNG_SIGNATURE {
            return Err(SpritePackError::chunk_format(format!(
                "bad PNG signature {sig:02x?}"
            )));
        }
        Ok(Self {
            inner,
            chunks_read: 0,
        })
    }

    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    /// Next chunk, or `None` at a clean end of stream on a chunk boundary.
    pub fn next_chunk(&mut self) -> SpritePackResult<Option<Chunk>> {
        let at = self.chunks_read;
        let fail = |what: &str, e: io::Error| {
            SpritePackError::chunk_format(format!("chunk #{at}: read {what}: {e}"))
        };

        let mut head = [0u8; 8];
        if !read_full_or_eof(&mut self.inner, &mut head).map_err(|e| fail("header", e))? {
            return Ok(None);
        }
        let len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
        let ty = ChunkType([head[4], head[5], head[6], head[7]]);
        if len > MAX_CHUNK_LEN {
            return Err(SpritePackError::chunk_format(format!(
                "chunk #{at} ({ty}): length {len} exceeds {MAX_CHUNK_LEN}"
            )));
        }
        if !ty.is_valid() {
            return Err(SpritePackError::chunk_format(format!(
                "chunk #{at}: invalid type tag {ty:?}"
            )));
        }

        let mut data = Vec::new();
        (&mut self.inner)
            .take(u64::from(len))
            .read_to_end(&mut data)
            .map_err(|e| fail("payload", e))?;
        if data.len() != len as usize {
            return Err(SpritePackError::chunk_format(format!(
                "chunk #{at} ({ty}): payload truncated at {} of {len} bytes",
                data.len()
            )));
        }

        let mut crc = [0u8; 4];
        if !read_full_or_eof(&mut self.inner, &mut crc).map_err(|e| fail("crc", e))? {
            return Err(SpritePackError::chunk_format(format!(
                "chunk #{at} ({ty}): stream ended before crc"
            )));
        }
        let declared = u32::from_be_bytes(crc);
        let chunk = Chunk::new(ty, data);
        let actual = chunk.crc();
        if declared != actual {
            return Err(SpritePackError::chunk_format(format!(
                "chunk #{at} ({ty}): crc mismatch, declared {declared:08x}, computed {actual:08x}"
            )));
        }

        self.chunks_read += 1;
        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = SpritePackResult<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Writes a PNG signature followed by chunks, computing each chunk's CRC.
pub struct ChunkWriter<W> {
    inner: W,
    chunks_written: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(mut inner: W) -> SpritePackResult<Self> {
        inner
            .write_all(&PNG_SIGNATURE)
            .map_err(|e| SpritePackError::file_write(format!("write PNG signature: {e}")))?;
        Ok(Self {
            inner,
            chunks_written: 0,
        })
    }

    pub fn chunks_written(&self) -> u64 {
        self.chunks_written
    }

    pub fn write_chunk(&mut self, ty: ChunkType, data: &[u8]) -> SpritePackResult<()> {
        let len = u32::try_from(data.len())
            .ok()
            .filter(|&l| l <= MAX_CHUNK_LEN)
            .ok_or_else(|| {
                SpritePackError::validation(format!(
                    "chunk {ty} payload of {} bytes is too large",
                    data.len()
                ))
            })?;

        let crc = chunk_crc(ty, data);
        let write = |w: &mut W| -> io::Result<()> {
            w.write_all(&len.to_be_bytes())?;
            w.write_all(&ty.0)?;
            w.write_all(data)?;
            w.write_all(&crc.to_be_bytes())
        };
        write(&mut self.inner)
            .map_err(|e| SpritePackError::file_write(format!("write chunk {ty}: {e}")))?;
        self.chunks_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> SpritePackResult<()> {
        self.inner
            .flush()
            .map_err(|e| SpritePackError::file_write(format!("flush: {e}")))
    }

    /// Hand back the underlying writer, e.g. an in-memory buffer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/chunk.rs"]
mod tests;
