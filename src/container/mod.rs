//! Chunk-level PNG stream handling.

/// Chunk types, streaming reader and CRC-computing writer.
pub mod chunk;
/// Bounded blocking pipe between the encoder and the rewriter.
pub mod pipe;
/// Pass-through rewriter that injects the metadata chunk pair.
pub mod rewrite;

pub use chunk::{Chunk, ChunkReader, ChunkType, ChunkWriter, PNG_SIGNATURE};
pub use pipe::{PipeReader, PipeWriter, pipe};
pub use rewrite::{Annotations, RewriteStats, rewrite_stream};
