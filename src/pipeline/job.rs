use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::atlas::compose_sprite_set;
use crate::config::PackConfig;
use crate::container::pipe::{MAX_SEGMENT, PipeWriter, pipe};
use crate::container::rewrite::{Annotations, rewrite_stream};
use crate::encode::ImageCodec;
use crate::foundation::core::{IndexedRaster, Palette};
use crate::foundation::error::{SpritePackError, SpritePackResult};
use crate::source::SpriteSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    Written { path: PathBuf, frames: usize },
    /// The sprite set had no ink; no file was created.
    Skipped,
}

/// Compose one sprite set and write it as an annotated PNG.
///
/// The codec runs on a scoped thread and streams into a bounded pipe while this thread rewrites
/// chunks from the other end straight into the output file.
#[tracing::instrument(skip_all, fields(sprite_set = set.index))]
pub fn run_job(
    set: &SpriteSet,
    codec: &dyn ImageCodec,
    cfg: &PackConfig,
) -> SpritePackResult<JobOutcome> {
    let Some(atlas) = compose_sprite_set(set, cfg.canvas_width, cfg.canvas_height)? else {
        tracing::debug!("no ink, skipping");
        return Ok(JobOutcome::Skipped);
    };

    let path = cfg.output_path(set.index);
    let file = File::create(&path).map_err(|e| {
        SpritePackError::file_write(format!("create '{}': {e}", path.display()))
    })?;
    let mut guard = PartialOutput {
        path: &path,
        armed: cfg.remove_partial_outputs,
    };
    let mut out = BufWriter::new(file);

    let ann = Annotations {
        palette: atlas.palette.entries(),
        frames: &atlas.frames,
        tags: cfg.chunk_tags,
    };
    let (raster, palette) = (&atlas.raster, &atlas.palette);
    let (pipe_w, pipe_r) = pipe(cfg.pipe_capacity);

    let (rewritten, encoded) = std::thread::scope(|s| {
        let producer = s.spawn(move || encode_into(codec, raster, palette, pipe_w));
        // Returning drops the read end, which unblocks a producer stuck on a full pipe.
        let rewritten = rewrite_stream(pipe_r, &mut out, &ann);
        let encoded = producer.join().unwrap_or_else(|_| {
            Err(ProducerFailure {
                error: SpritePackError::encode("encoder thread panicked"),
                reader_gone: false,
            })
        });
        (rewritten, encoded)
    });

    let stats = match (rewritten, encoded) {
        // The codec failing on its own is the root cause of whatever the rewriter saw.
        (
            _,
            Err(ProducerFailure {
                error,
                reader_gone: false,
            }),
        ) => return Err(error),
        (Err(e), _) => return Err(e),
        (Ok(_), Err(failure)) => return Err(failure.error),
        (Ok(stats), Ok(())) => stats,
    };
    if !stats.injected {
        return Err(SpritePackError::chunk_format(
            "encoded stream has no tRNS chunk, metadata was not written",
        ));
    }

    let file = out.into_inner().map_err(|e| {
        SpritePackError::file_write(format!("flush '{}': {}", path.display(), e.error()))
    })?;
    drop(file);
    guard.armed = false;

    tracing::debug!(
        path = %path.display(),
        chunks = stats.chunks_out,
        frames = atlas.frames.len(),
        "sprite sheet written"
    );
    Ok(JobOutcome::Written {
        path: path.clone(),
        frames: atlas.frames.len(),
    })
}

struct ProducerFailure {
    error: SpritePackError,
    /// The write end found the reader already gone, so the rewriter failed first.
    reader_gone: bool,
}

fn encode_into(
    codec: &dyn ImageCodec,
    raster: &IndexedRaster,
    palette: &Palette,
    pipe_w: PipeWriter,
) -> Result<(), ProducerFailure> {
    let mut sink = BufWriter::with_capacity(MAX_SEGMENT, pipe_w);
    let result = codec.encode(raster, palette, &mut sink).and_then(|()| {
        sink.flush()
            .map_err(|e| SpritePackError::encode(format!("flush encoded stream: {e}")))
    });
    let Err(error) = result else {
        return Ok(());
    };

    let (pipe_w, _) = sink.into_parts();
    let reader_gone = pipe_w.reader_gone();
    pipe_w.fail(io::Error::other(error.to_string()));
    Err(ProducerFailure { error, reader_gone })
}

/// Deletes the output file on drop unless disarmed.
struct PartialOutput<'a> {
    path: &'a Path,
    armed: bool,
}

impl Drop for PartialOutput<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => tracing::warn!(path = %self.path.display(), "removed partial output"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove partial output"
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/job.rs"]
mod tests;
