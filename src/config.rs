use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::encode::PngCompression;
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::meta::ChunkTagStyle;
use crate::pipeline::FailurePolicy;

/// Options for one packing run.
///
/// Deserializes from JSON with every field optional; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Frame manifest to read.
    pub source_path: PathBuf,
    /// Directory receiving `<index>.png` files. Must already exist when jobs run.
    pub output_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Worker threads; `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
    /// Encoder-to-rewriter pipe depth in segments (0 = every write waits for the reader).
    pub pipe_capacity: usize,
    pub chunk_tags: ChunkTagStyle,
    pub compression: PngCompression,
    pub failure_policy: FailurePolicy,
    /// Delete the output file of a job that fails after creating it.
    pub remove_partial_outputs: bool,
    /// Zero-padded width of the sprite set index in output file names.
    pub file_name_width: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("sprites.json"),
            output_dir: PathBuf::from("sprites"),
            canvas_width: 1024,
            canvas_height: 1024,
            workers: None,
            pipe_capacity: 4,
            chunk_tags: ChunkTagStyle::Private,
            compression: PngCompression::Default,
            failure_policy: FailurePolicy::DrainAll,
            remove_partial_outputs: true,
            file_name_width: 4,
        }
    }
}

impl PackConfig {
    /// Largest canvas side; placements are stored as `i16` in the control table.
    pub const MAX_CANVAS_SIDE: u32 = i16::MAX as u32;

    pub fn from_json_file(path: &Path) -> SpritePackResult<Self> {
        let f = File::open(path).map_err(|e| {
            SpritePackError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            SpritePackError::validation(format!("parse config '{}': {e}", path.display()))
        })
    }

    pub fn validate(&self) -> SpritePackResult<()> {
        for (side, name) in [
            (self.canvas_width, "canvas_width"),
            (self.canvas_height, "canvas_height"),
        ] {
            if side == 0 || side > Self::MAX_CANVAS_SIDE {
                return Err(SpritePackError::validation(format!(
                    "{name} must be in 1..={}, got {side}",
                    Self::MAX_CANVAS_SIDE
                )));
            }
        }
        if self.workers == Some(0) {
            return Err(SpritePackError::validation("workers must be >= 1 when set"));
        }
        if !(1..=20).contains(&self.file_name_width) {
            return Err(SpritePackError::validation(format!(
                "file_name_width must be in 1..=20, got {}",
                self.file_name_width
            )));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// `<output_dir>/<index zero-padded>.png`
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{index:0width$}.png", width = self.file_name_width))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
