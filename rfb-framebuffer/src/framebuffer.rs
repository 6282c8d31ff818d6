//! Canvas state management and decoder registry.
//!
//! This module owns the reconstructed screen and applies server framebuffer
//! updates to it, one rectangle at a time, in the order the server sent them.

use crate::config::{Config, DecodingConfig};
use crate::errors::FramebufferError;
use crate::observer::UpdateObserver;
use crate::protocol_trace;
use crate::session::Session;
use rfb_common::Rect;
use rfb_encodings as enc;
use rfb_encodings::{DecodeError, Decoder, Encoding, MutablePixelBuffer, PayloadReader};
use rfb_pixelbuffer::{Canvas, CanvasSnapshot, ColorMap, PixelSampleDecoder};
use rfb_protocol::messages::{FramebufferUpdate, Rectangle, SetColorMapEntries};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Registry of decoders keyed by encoding.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<Encoding, DecoderEntry>,
}

impl DecoderRegistry {
    /// Create a registry with all standard encodings registered.
    pub fn with_standard() -> Self {
        Self::with_encodings(&Encoding::PIXEL_ENCODINGS)
    }

    /// Create a registry holding only the encodings `config` enables.
    pub fn from_config(config: &DecodingConfig) -> Self {
        Self::with_encodings(&config.encodings)
    }

    fn with_encodings(encodings: &[Encoding]) -> Self {
        let mut reg = Self::default();
        for entry in encodings.iter().copied().filter_map(DecoderEntry::for_encoding) {
            reg.register(entry);
        }
        reg
    }

    /// Register a decoder entry.
    pub fn register(&mut self, decoder: DecoderEntry) {
        self.decoders.insert(decoder.encoding(), decoder);
    }

    /// Get a decoder by encoding.
    pub fn get(&self, encoding: Encoding) -> Option<&DecoderEntry> {
        self.decoders.get(&encoding)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

/// One stateless decoder per pixel-carrying encoding.
#[derive(Debug, Clone, Copy)]
pub enum DecoderEntry {
    Raw(enc::RawDecoder),
    CopyRect(enc::CopyRectDecoder),
    Rre(enc::RREDecoder),
    Hextile(enc::HextileDecoder),
}

impl DecoderEntry {
    /// The decoder for `encoding`, or `None` for pseudo-encodings.
    pub fn for_encoding(encoding: Encoding) -> Option<Self> {
        match encoding {
            Encoding::Raw => Some(Self::Raw(enc::RawDecoder)),
            Encoding::CopyRect => Some(Self::CopyRect(enc::CopyRectDecoder)),
            Encoding::Rre => Some(Self::Rre(enc::RREDecoder)),
            Encoding::Hextile => Some(Self::Hextile(enc::HextileDecoder)),
            Encoding::DesktopSize | Encoding::LastRect => None,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.decoder().encoding()
    }

    fn decoder(&self) -> &dyn Decoder {
        match self {
            Self::Raw(d) => d,
            Self::CopyRect(d) => d,
            Self::Rre(d) => d,
            Self::Hextile(d) => d,
        }
    }

    /// Decode one rectangle; unread payload bytes are an error.
    pub fn decode(
        &self,
        payload: &mut PayloadReader<'_>,
        pixels: &PixelSampleDecoder<'_>,
        target: &mut dyn MutablePixelBuffer,
    ) -> Result<(), DecodeError> {
        self.decoder().decode(payload, pixels, target)?;
        if !payload.is_empty() {
            return Err(DecodeError::TrailingBytes {
                remaining: payload.remaining(),
            });
        }
        Ok(())
    }
}

/// Canvas state and rectangle dispatcher.
///
/// Exclusively owns the canvas and the colour map. Callers on more than one
/// thread share it through a [`ProcessorHandle`](crate::ProcessorHandle).
pub struct UpdateProcessor {
    canvas: Canvas,
    color_map: ColorMap,
    registry: DecoderRegistry,
    config: DecodingConfig,
    observer: Option<Box<dyn UpdateObserver>>,
}

impl UpdateProcessor {
    /// Create a processor with a black canvas of the session's size.
    pub fn new(session: &Session, config: &Config) -> Self {
        if config.decoding.trace_payloads {
            protocol_trace::set_enabled(true);
        }
        Self {
            canvas: Canvas::new(
                u32::from(session.framebuffer_width),
                u32::from(session.framebuffer_height),
            ),
            color_map: ColorMap::new(),
            registry: DecoderRegistry::from_config(&config.decoding),
            config: config.decoding.clone(),
            observer: None,
        }
    }

    /// Install the observer notified after every applied update.
    pub fn set_observer(&mut self, observer: impl UpdateObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Remove the observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Wrap the processor for sharing between threads.
    pub fn into_handle(self) -> crate::ProcessorHandle {
        Arc::new(parking_lot::Mutex::new(self))
    }

    /// Returns the current canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Returns an immutable copy of the current canvas.
    pub fn snapshot(&self) -> CanvasSnapshot {
        self.canvas.snapshot()
    }

    /// Returns the palette used for indexed pixel formats.
    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Apply a SetColorMapEntries message.
    ///
    /// A batch that would run past the last palette slot is rejected whole.
    pub fn update_color_map(&mut self, msg: &SetColorMapEntries) -> Result<(), FramebufferError> {
        tracing::debug!(
            "SetColorMapEntries: first={} count={}",
            msg.first_color,
            msg.colors.len()
        );
        self.color_map
            .update(msg.first_color, &msg.colors)
            .map_err(FramebufferError::ColorMap)
    }

    /// Apply every rectangle of `update` in order, returning the damaged regions.
    ///
    /// The first failing rectangle aborts the update. Rectangles before it stay
    /// applied and the observer is not notified.
    pub fn process_update(
        &mut self,
        session: &mut Session,
        update: &FramebufferUpdate,
    ) -> Result<Vec<Rect>, FramebufferError> {
        session.last_update = Some(SystemTime::now());

        let pixels = PixelSampleDecoder::new(session.pixel_format, &self.color_map)
            .map_err(FramebufferError::PixelFormat)?;

        let mut damage = Vec::with_capacity(update.len());
        for (index, rect) in update.rectangles.iter().enumerate() {
            tracing::debug!(
                "FramebufferUpdate rect {}: x={}, y={}, w={}, h={}, encoding={}",
                index,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                rect.encoding
            );
            if protocol_trace::enabled() {
                protocol_trace::in_msg(
                    "Rectangle",
                    &format!(
                        "index={} bounds={:?} encoding={} payload={}",
                        index,
                        rect.bounds(),
                        rect.encoding,
                        rect.payload.len()
                    ),
                );
                protocol_trace::hexdump("  ", &rect.payload, protocol_trace::HEXDUMP_LIMIT);
            }

            match rect.known_encoding() {
                Some(Encoding::LastRect) => {
                    let ignored = update.len() - index - 1;
                    if ignored > 0 {
                        tracing::warn!(
                            "LastRect at index {} ends the update; ignoring {} trailing rectangles",
                            index,
                            ignored
                        );
                    }
                    break;
                }
                Some(Encoding::DesktopSize) if self.config.desktop_resize => {
                    apply_desktop_size(&mut self.canvas, &self.config, session, index, rect)?;
                    damage.clear();
                    damage.push(self.canvas.bounds());
                }
                Some(encoding) => {
                    let decoder = self.registry.get(encoding).ok_or(
                        FramebufferError::UnsupportedEncoding {
                            index,
                            encoding: rect.encoding,
                        },
                    )?;
                    let bounds = rect.bounds();
                    if !bounds.fits_within(self.canvas.width(), self.canvas.height()) {
                        return Err(FramebufferError::MalformedRectangle {
                            index,
                            rect: bounds,
                            width: self.canvas.width(),
                            height: self.canvas.height(),
                        });
                    }

                    let decode_error = |source: DecodeError| FramebufferError::Decode {
                        index,
                        encoding,
                        source,
                    };
                    let mut view = self
                        .canvas
                        .view_mut(bounds)
                        .map_err(|e| decode_error(e.into()))?;
                    let mut payload = PayloadReader::new(&rect.payload);
                    decoder
                        .decode(&mut payload, &pixels, &mut view)
                        .map_err(decode_error)?;
                    damage.push(bounds);
                }
                None => {
                    return Err(FramebufferError::UnsupportedEncoding {
                        index,
                        encoding: rect.encoding,
                    });
                }
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            observer.on_update(&self.canvas);
        }
        Ok(damage)
    }
}

/// Resize the canvas for a DesktopSize rectangle and record the new size.
fn apply_desktop_size(
    canvas: &mut Canvas,
    config: &DecodingConfig,
    session: &mut Session,
    index: usize,
    rect: &Rectangle,
) -> Result<(), FramebufferError> {
    if !rect.payload.is_empty() {
        return Err(FramebufferError::Decode {
            index,
            encoding: Encoding::DesktopSize,
            source: DecodeError::TrailingBytes {
                remaining: rect.payload.len(),
            },
        });
    }
    if rect.width > config.max_width || rect.height > config.max_height {
        return Err(FramebufferError::DesktopSizeTooLarge {
            width: rect.width,
            height: rect.height,
            max_width: config.max_width,
            max_height: config.max_height,
        });
    }

    tracing::info!(
        "Desktop resized: {}x{} -> {}x{}",
        canvas.width(),
        canvas.height(),
        rect.width,
        rect.height
    );
    canvas.resize(u32::from(rect.width), u32::from(rect.height));
    session.framebuffer_width = rect.width;
    session.framebuffer_height = rect.height;
    Ok(())
}
