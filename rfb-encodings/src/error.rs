//! Decoder errors and the coarse error classification shared with callers.

use rfb_common::{Point, Rect};
use rfb_pixelbuffer::PixelBufferError;
use rfb_protocol::io::Truncated;
use std::fmt;
use thiserror::Error;

/// Which persistent Hextile colour a tile needed but never received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileColor {
    Background,
    Foreground,
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileColor::Background => f.write_str("background"),
            TileColor::Foreground => f.write_str("foreground"),
        }
    }
}

/// Failure while decoding one rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Truncated(#[from] Truncated),

    #[error(transparent)]
    PixelBuffer(#[from] PixelBufferError),

    /// A subrectangle reaches outside its rectangle (RRE) or tile (Hextile).
    #[error("subrectangle {index} at {rect:?} outside {width}x{height} area")]
    SubrectOutOfBounds {
        index: u32,
        rect: Rect,
        width: u32,
        height: u32,
    },

    /// A Hextile tile relied on a colour no earlier tile had set.
    #[error("hextile tile at {tile} uses {color} colour before one was specified")]
    UndefinedTileColor { color: TileColor, tile: Point },

    /// The decoder finished with payload bytes left over.
    #[error("{remaining} trailing payload bytes after rectangle")]
    TrailingBytes { remaining: usize },

    /// A fixed-size payload has the wrong length.
    #[error("payload is {actual} bytes, expected {expected}")]
    PayloadLength { expected: usize, actual: usize },
}

/// Coarse classification of every failure the framebuffer engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Geometry or structure of a rectangle is invalid.
    MalformedRectangle,
    /// The rectangle's encoding is unknown or not enabled.
    UnsupportedEncoding,
    /// An indexed pixel names a palette slot that is not set.
    PaletteIndex,
    /// A read ran past the end of a payload.
    TruncatedPayload,
    /// A palette update was rejected.
    ColorMap,
    /// Configuration could not be loaded or is invalid.
    Configuration,
}

impl From<&PixelBufferError> for ErrorKind {
    fn from(err: &PixelBufferError) -> Self {
        match err {
            PixelBufferError::PaletteIndex(_) => ErrorKind::PaletteIndex,
            PixelBufferError::ColorMapOverflow { .. } => ErrorKind::ColorMap,
            PixelBufferError::OutOfBounds { .. }
            | PixelBufferError::SourceOutOfBounds { .. }
            | PixelBufferError::UnsupportedPixelFormat(_)
            | PixelBufferError::SampleLength { .. }
            | PixelBufferError::ImageLength { .. } => ErrorKind::MalformedRectangle,
        }
    }
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Truncated(_) => ErrorKind::TruncatedPayload,
            DecodeError::PixelBuffer(err) => ErrorKind::from(err),
            DecodeError::SubrectOutOfBounds { .. }
            | DecodeError::UndefinedTileColor { .. }
            | DecodeError::TrailingBytes { .. }
            | DecodeError::PayloadLength { .. } => ErrorKind::MalformedRectangle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let truncated = DecodeError::from(Truncated {
            needed: 4,
            remaining: 1,
            offset: 0,
        });
        assert_eq!(truncated.kind(), ErrorKind::TruncatedPayload);

        let palette = DecodeError::from(PixelBufferError::PaletteIndex(9));
        assert_eq!(palette.kind(), ErrorKind::PaletteIndex);

        let source = DecodeError::from(PixelBufferError::SourceOutOfBounds {
            rect: Rect::new(0, 0, 1, 1),
            width: 0,
            height: 0,
        });
        assert_eq!(source.kind(), ErrorKind::MalformedRectangle);

        let colour = DecodeError::UndefinedTileColor {
            color: TileColor::Foreground,
            tile: Point::new(16, 0),
        };
        assert_eq!(colour.kind(), ErrorKind::MalformedRectangle);
        assert_eq!(
            colour.to_string(),
            "hextile tile at (16, 0) uses foreground colour before one was specified"
        );
    }
}
