//! Framebuffer update engine for RFB (VNC) clients.
//!
//! This crate turns the server's framebuffer updates into a running bitmap of
//! the remote screen. It sits between the connection layer (which frames
//! messages into [`FramebufferUpdate`] and [`SetColorMapEntries`] values) and
//! whatever displays the result.
//!
//! # Features
//!
//! - **Standard encodings**: Raw, CopyRect, RRE, Hextile
//! - **Pseudo-encodings**: DesktopSize (live resize) and LastRect
//! - **Indexed and true-colour pixel formats**
//! - **Configuration management**: TOML files with serde defaults
//! - **Fail-fast policy**: Clear error messages, no defensive fallbacks
//!
//! # Quick Start
//!
//! ```
//! use rfb_framebuffer::{Config, Session, UpdateProcessor};
//! use rfb_protocol::messages::{FramebufferUpdate, PixelFormat, Rectangle, ENCODING_RAW};
//!
//! # fn main() -> Result<(), rfb_framebuffer::FramebufferError> {
//! let config = Config::builder().build()?;
//! let mut session = Session::new(640, 480, PixelFormat::rgb888());
//! let mut processor = UpdateProcessor::new(&session, &config);
//! processor.set_observer(|canvas: &rfb_pixelbuffer::Canvas| {
//!     println!("screen now {}x{}", canvas.width(), canvas.height());
//! });
//!
//! // One white pixel at (10, 10)
//! let update = FramebufferUpdate::new(vec![Rectangle::new(
//!     10,
//!     10,
//!     1,
//!     1,
//!     ENCODING_RAW,
//!     vec![0xFFu8, 0xFF, 0xFF, 0x00],
//! )]);
//! let damage = processor.process_update(&mut session, &update)?;
//! assert_eq!(damage.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every error carries an [`ErrorKind`]. An error from
//! [`UpdateProcessor::process_update`] stops the update at the failing
//! rectangle; rectangles before it stay on the canvas. Such errors are fatal
//! to the session: the client no longer agrees with the server about the
//! screen contents.
//!
//! # Threading
//!
//! Processing is synchronous and single-threaded per update. Hosts that apply
//! framebuffer and palette messages from different threads share the
//! processor through a [`ProcessorHandle`].

#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod framebuffer;
pub mod observer;
pub mod protocol_trace;
pub mod session;

// Re-exports
pub use config::{init_logging, Config, DecodingConfig, LoggingConfig};
pub use errors::FramebufferError;
pub use framebuffer::{DecoderEntry, DecoderRegistry, UpdateProcessor};
pub use observer::{QueuedObserver, UpdateObserver};
pub use rfb_encodings::ErrorKind;
pub use rfb_protocol::messages::{FramebufferUpdate, SetColorMapEntries};
pub use session::Session;

use std::sync::Arc;

/// Type alias for a thread-safe handle to the processor.
///
/// The processor is shared between the thread reading server messages (which
/// applies updates) and the application (which reads the canvas for rendering).
pub type ProcessorHandle = Arc<parking_lot::Mutex<UpdateProcessor>>;
