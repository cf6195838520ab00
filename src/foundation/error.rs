use std::fmt;

use crate::foundation::core::Side;

/// Result alias used throughout the crate.
pub type PairframeResult<T> = Result<T, PairframeError>;

/// Error type for compositing, decoding, and export.
///
/// Every failure is local to one render or export call.
#[derive(thiserror::Error, Debug)]
pub enum PairframeError {
    /// Caller supplied a value outside its documented domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// The drawing surface could not be created or has no pixels.
    #[error("surface error: {0}")]
    Surface(String),

    /// A source image could not be loaded or decoded.
    #[error("decode error{}: {message}", SideSuffix(.side))]
    Decode {
        /// Which side of the pair failed, when known.
        side: Option<Side>,
        /// Underlying decoder message.
        message: String,
    },

    /// Font resolution or text shaping failed.
    #[error("text error: {0}")]
    Text(String),

    /// Encoding the finished frame failed.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

struct SideSuffix<'a>(&'a Option<Side>);

impl fmt::Display for SideSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(side) => write!(f, " ({side} image)"),
            None => Ok(()),
        }
    }
}

impl PairframeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            side: None,
            message: msg.into(),
        }
    }

    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Attribute a load failure to one side of the pair.
    ///
    /// Non-decode errors are folded into [`PairframeError::Decode`] so the caller always learns
    /// which source broke the composite.
    pub fn with_side(self, side: Side) -> Self {
        match self {
            Self::Decode { message, .. } => Self::Decode {
                side: Some(side),
                message,
            },
            other => Self::Decode {
                side: Some(side),
                message: format!("{other:#}"),
            },
        }
    }

    /// Side tag of a decode failure, if any.
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Decode { side, .. } => *side,
            _ => None,
        }
    }
}
