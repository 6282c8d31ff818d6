//! RFB (Remote Framebuffer) protocol types for framebuffer decoding.
//!
//! This crate provides the wire-level vocabulary shared by the decoders and
//! the update processor: pixel formats, rectangle headers with their payloads,
//! the server messages that carry them, and a bounded payload reader.
//!
//! Socket handling and message framing live with the transport; everything
//! here works on bytes that have already been delimited.
//!
//! # Modules
//!
//! - [`io`] - Bounded payload reader ([`PayloadReader`])
//! - [`messages`] - PixelFormat, Rectangle, Encoding, FramebufferUpdate, SetColorMapEntries
//!
//! # Examples
//!
//! ```
//! use rfb_protocol::messages::{Encoding, Rectangle, ENCODING_RAW};
//!
//! let rect = Rectangle::new(0, 0, 1, 1, ENCODING_RAW, vec![0u8; 4]);
//! assert_eq!(rect.known_encoding(), Some(Encoding::Raw));
//! ```

pub mod io;
pub mod messages;

// Re-export commonly used types
pub use io::{PayloadReader, Truncated};
pub use messages::{
    ColorMapEntry, Encoding, FramebufferUpdate, MessageError, PixelFormat, Rectangle,
    SetColorMapEntries,
};
