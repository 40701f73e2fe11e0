//! Raster to PNG byte stream.
//!
//! The codec is treated as a trusted black box: it serializes an indexed raster and its palette
//! into standard PNG chunks (`IHDR`, `PLTE`, `tRNS`, `IDAT`..., `IEND`) and knows nothing about
//! sprite metadata.

use std::io::Write;

use crate::foundation::core::{IndexedRaster, Palette};
use crate::foundation::error::{SpritePackError, SpritePackResult};

pub trait ImageCodec: Send + Sync {
    /// Write the complete encoded image to `out`.
    fn encode(
        &self,
        raster: &IndexedRaster,
        palette: &Palette,
        out: &mut dyn Write,
    ) -> SpritePackResult<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// 8-bit indexed PNG with a full `tRNS` chunk (one alpha per palette entry).
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec {
    pub compression: PngCompression,
}

impl PngCodec {
    pub fn new(compression: PngCompression) -> Self {
        Self { compression }
    }
}

impl ImageCodec for PngCodec {
    fn encode(
        &self,
        raster: &IndexedRaster,
        palette: &Palette,
        out: &mut dyn Write,
    ) -> SpritePackResult<()> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(SpritePackError::encode("cannot encode an empty raster"));
        }

        let entries = palette.entries();
        let rgb: Vec<u8> = entries.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        let alpha: Vec<u8> = entries.iter().map(|c| c.a).collect();

        let mut enc = png::Encoder::new(out, raster.width(), raster.height());
        enc.set_color(png::ColorType::Indexed);
        enc.set_depth(png::BitDepth::Eight);
        enc.set_compression(match self.compression {
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Default => png::Compression::Default,
            PngCompression::Best => png::Compression::Best,
        });
        enc.set_palette(rgb);
        enc.set_trns(alpha);

        let encode_err = |e: png::EncodingError| SpritePackError::encode(e.to_string());
        let mut writer = enc.write_header().map_err(encode_err)?;
        writer
            .write_image_data(raster.pixels())
            .map_err(encode_err)?;
        writer.finish().map_err(encode_err)
    }
}

#[cfg(test)]
#[path = "../tests/unit/encode/png.rs"]
mod tests;
