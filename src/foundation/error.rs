use crate::layout::engine::LayoutError;

/// Convenience result type used across glasscard.
pub type GlassResult<T> = Result<T, GlassError>;

/// Top-level error taxonomy used by the composition core.
#[derive(thiserror::Error, Debug)]
pub enum GlassError {
    /// Unusable input (unreachable background, undecodable avatar, bad override).
    #[error("input error: {0}")]
    Input(String),

    /// Message text cannot fit even at the minimum font size.
    #[error("layout overflow: {0}")]
    LayoutOverflow(#[from] LayoutError),

    /// No background asset exists in any category.
    #[error("no background available: {0}")]
    NoBackgroundAvailable(String),

    /// The native encoder exited unsuccessfully or could not be started.
    #[error("encoder failure: {message}")]
    EncoderFailure {
        /// Human readable summary.
        message: String,
        /// Tail of the encoder's stderr, when captured.
        stderr: Option<String>,
        /// Process exit code, when the process exited normally.
        exit_code: Option<i32>,
    },

    /// The encoder exceeded its wall-clock budget and was killed.
    #[error("processing timed out after {0} seconds")]
    ProcessingTimeout(u64),

    /// The request was cancelled while the encoder was running.
    #[error("render cancelled")]
    Cancelled,

    /// A resource budget check failed before any subprocess was spawned.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Invalid configuration or option values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterisation failures.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stable error-kind enumeration consumed by the HTTP collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Recoverable input problems that surfaced anyway.
    Input,
    /// Text could not fit at the minimum font size.
    LayoutOverflow,
    /// Background catalog exhausted.
    NoBackgroundAvailable,
    /// Encoder failed, timed out or was cancelled.
    EncoderFailure,
    /// Pre-flight resource check failed.
    ResourceExhausted,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Stable snake_case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input_error",
            Self::LayoutOverflow => "layout_overflow",
            Self::NoBackgroundAvailable => "no_background_available",
            Self::EncoderFailure => "encoder_failure",
            Self::ResourceExhausted => "resource_exhausted",
            Self::Internal => "internal",
        }
    }
}

impl GlassError {
    /// Build a [`GlassError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`GlassError::NoBackgroundAvailable`] value.
    pub fn no_background(msg: impl Into<String>) -> Self {
        Self::NoBackgroundAvailable(msg.into())
    }

    /// Build a [`GlassError::EncoderFailure`] value.
    pub fn encoder_failed(
        msg: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::EncoderFailure {
            message: msg.into(),
            stderr,
            exit_code,
        }
    }

    /// Build a [`GlassError::ResourceExhausted`] value.
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`GlassError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlassError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Map this error onto the stable [`ErrorKind`] enumeration.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Input,
            Self::LayoutOverflow(_) => ErrorKind::LayoutOverflow,
            Self::NoBackgroundAvailable(_) => ErrorKind::NoBackgroundAvailable,
            Self::EncoderFailure { .. } | Self::ProcessingTimeout(_) | Self::Cancelled => {
                ErrorKind::EncoderFailure
            }
            Self::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            Self::Validation(_) | Self::Render(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
