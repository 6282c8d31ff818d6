//! RFB protocol message types.
//!
//! This module provides the message types the framebuffer decoder consumes:
//!
//! - **Core types** ([`types`]) - PixelFormat, Rectangle, Encoding and encoding constants
//! - **Server messages** ([`server`]) - FramebufferUpdate and SetColorMapEntries
//!
//! # Wire Format Rules
//!
//! All messages follow these invariants:
//!
//! 1. **Big-endian byte order** - All multi-byte integers use network byte order
//! 2. **Strict boolean validation** - Boolean fields must be exactly 0 or 1 (any other value is an error)
//! 3. **Padding validation** - Padding bytes must be zero
//! 4. **Fail-fast errors** - Invalid data results in errors, no defensive fallbacks
//!
//! # Examples
//!
//! ```
//! use rfb_protocol::io::PayloadReader;
//! use rfb_protocol::messages::types::PixelFormat;
//!
//! let wire = PixelFormat::rgb888().to_bytes();
//! let pf = PixelFormat::read_from(&mut PayloadReader::new(&wire)).unwrap();
//! assert_eq!(pf.bits_per_pixel, 32);
//! ```

pub mod server;
pub mod types;

#[cfg(test)]
mod proptest_framing;

use crate::io::Truncated;
use thiserror::Error;

// Re-export commonly used types
pub use types::{
    Encoding, PixelFormat, Rectangle, ENCODING_COPYRECT, ENCODING_DESKTOP_SIZE, ENCODING_HEXTILE,
    ENCODING_LAST_RECT, ENCODING_RAW, ENCODING_RRE,
};

pub use server::{ColorMapEntry, FramebufferUpdate, SetColorMapEntries};

/// Errors raised while parsing a message body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error(transparent)]
    Truncated(#[from] Truncated),

    #[error("invalid boolean value for {field}: {value} (must be 0 or 1)")]
    InvalidBoolean { field: &'static str, value: u8 },

    #[error("non-zero padding bytes: {0:02x?}")]
    NonZeroPadding(Vec<u8>),
}
