/// Convenience result type used across the packer.
pub type SpritePackResult<T> = Result<T, SpritePackError>;

/// Every failure a packing run can report.
#[derive(thiserror::Error, Debug)]
pub enum SpritePackError {
    /// Frame source could not be read or decoded. Fatal for the whole run.
    #[error("source read error: {0}")]
    SourceRead(String),

    /// Invalid configuration or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame does not fit the remaining canvas.
    #[error("canvas overflow: {0}")]
    CanvasOverflow(String),

    /// The image codec failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed PNG chunk stream: bad signature, tag, length or CRC.
    #[error("chunk format error: {0}")]
    ChunkFormat(String),

    /// Output file could not be created, written or flushed.
    #[error("file write error: {0}")]
    FileWrite(String),

    /// A failure inside the job for sprite set `index`.
    #[error("sprite set {index:04}: {source}")]
    Job {
        index: usize,
        #[source]
        source: Box<SpritePackError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpritePackError {
    /// Build a [`SpritePackError::SourceRead`] value.
    pub fn source_read(msg: impl Into<String>) -> Self {
        Self::SourceRead(msg.into())
    }

    /// Build a [`SpritePackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpritePackError::CanvasOverflow`] value.
    pub fn canvas_overflow(msg: impl Into<String>) -> Self {
        Self::CanvasOverflow(msg.into())
    }

    /// Build a [`SpritePackError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SpritePackError::ChunkFormat`] value.
    pub fn chunk_format(msg: impl Into<String>) -> Self {
        Self::ChunkFormat(msg.into())
    }

    /// Build a [`SpritePackError::FileWrite`] value.
    pub fn file_write(msg: impl Into<String>) -> Self {
        Self::FileWrite(msg.into())
    }

    /// Tag a job-level failure with the sprite set it came from.
    pub fn in_job(self, index: usize) -> Self {
        match self {
            already @ Self::Job { .. } => already,
            other => Self::Job {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through [`SpritePackError::Job`] wrappers.
    pub fn root(&self) -> &SpritePackError {
        match self {
            Self::Job { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
