use thiserror::Error;

/// Reasons a `BF=` payload could not be turned back into its original bytes.
#[derive(Debug, Error)]
pub enum DecomposeError {
    #[error("marker {marker:?} not found in the first {limit} bytes")]
    MarkerNotFound { marker: &'static str, limit: usize },

    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("bzip2 decompression failed: {0}")]
    Bzip2(#[source] std::io::Error),
}

impl DecomposeError {
    pub fn marker_not_found() -> Self {
        Self::MarkerNotFound {
            marker: crate::payload::MARKER,
            limit: crate::payload::READ_LIMIT,
        }
    }

    /// Which stage of the pipeline gave up.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MarkerNotFound { .. } => "marker",
            Self::Base64(_) => "base64",
            Self::Bzip2(_) => "bzip2",
        }
    }
}
