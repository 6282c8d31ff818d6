//! Error types for the framebuffer update engine.

use rfb_common::Rect;
use rfb_encodings::{DecodeError, Encoding, ErrorKind};
use rfb_pixelbuffer::PixelBufferError;
use thiserror::Error;

/// Errors that can occur while applying server messages to the canvas.
#[derive(Debug, Error)]
pub enum FramebufferError {
    /// A rectangle does not lie inside the current canvas.
    #[error("rectangle {index} at {rect:?} lies outside the {width}x{height} canvas")]
    MalformedRectangle {
        index: usize,
        rect: Rect,
        width: u32,
        height: u32,
    },

    /// The rectangle's encoding tag is unknown or not enabled.
    #[error("rectangle {index} uses unsupported encoding {encoding}")]
    UnsupportedEncoding { index: usize, encoding: i32 },

    /// A decoder rejected the rectangle's payload.
    #[error("rectangle {index} ({encoding}) failed to decode: {source}")]
    Decode {
        index: usize,
        encoding: Encoding,
        #[source]
        source: DecodeError,
    },

    /// A DesktopSize rectangle asked for more than the configured maximum.
    #[error("desktop size {width}x{height} exceeds the {max_width}x{max_height} limit")]
    DesktopSizeTooLarge {
        width: u16,
        height: u16,
        max_width: u16,
        max_height: u16,
    },

    /// The session's pixel format cannot be decoded.
    #[error("invalid pixel format: {0}")]
    PixelFormat(#[source] PixelBufferError),

    /// A SetColorMapEntries batch was rejected.
    #[error("colour map update rejected: {0}")]
    ColorMap(#[source] PixelBufferError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FramebufferError {
    /// Coarse classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRectangle { .. }
            | Self::DesktopSizeTooLarge { .. }
            | Self::PixelFormat(_) => ErrorKind::MalformedRectangle,
            Self::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            Self::Decode { source, .. } => source.kind(),
            Self::ColorMap(err) => ErrorKind::from(err),
            Self::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Returns true if the session can no longer be trusted after this error.
    ///
    /// Every failure while applying a server message leaves the client out of
    /// step with the server's idea of the screen. Configuration errors happen
    /// before any message is applied.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}
