//! Errors reported by the tracking pipeline.

/// Fatal pipeline failures.
///
/// A tracker losing its object is not an error: the effect is skipped for
/// that object on that frame and processing continues.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Video source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error("No output destination provided")]
    SinkUnavailable,

    #[error("No objects selected to track")]
    NoObjectsSelected,

    #[error("Failed to read frame {frame}")]
    Source {
        frame: u64,
        #[source]
        source: BoxError,
    },

    #[error("Failed to write frame {frame}")]
    Sink {
        frame: u64,
        #[source]
        source: BoxError,
    },
}

/// Boxed cause carried by mid-run I/O failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub fn source_unavailable(reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            reason: reason.into(),
        }
    }

    /// True for the errors raised before any frame is written
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::SinkUnavailable | Self::NoObjectsSelected
        )
    }
}
