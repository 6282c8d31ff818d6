//! Per-connection state the processor reads and updates.

use rfb_protocol::messages::PixelFormat;
use std::time::SystemTime;

/// The negotiated parameters of one connection.
///
/// Owned by the connection layer. The processor reads the pixel format,
/// writes the framebuffer size on DesktopSize and stamps `last_update` at the
/// start of every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Server pixel format for rectangle payloads.
    pub pixel_format: PixelFormat,
    /// Framebuffer width advertised by the server.
    pub framebuffer_width: u16,
    /// Framebuffer height advertised by the server.
    pub framebuffer_height: u16,
    /// When the most recent FramebufferUpdate began processing.
    pub last_update: Option<SystemTime>,
}

impl Session {
    pub fn new(framebuffer_width: u16, framebuffer_height: u16, pixel_format: PixelFormat) -> Self {
        Self {
            pixel_format,
            framebuffer_width,
            framebuffer_height,
            last_update: None,
        }
    }

    /// Returns the advertised framebuffer size.
    pub fn framebuffer_size(&self) -> (u16, u16) {
        (self.framebuffer_width, self.framebuffer_height)
    }
}
