//! RFB pixel buffer types and utilities.
//!
//! This crate turns wire pixels into canvas colours and owns the canvas they
//! are painted on:
//!
//! - [`PixelSampleDecoder`] - wire pixel to [`Rgb`] under a negotiated format
//! - [`ColorMap`] - palette for indexed formats
//! - [`Canvas`] - the RGB framebuffer, with bounded [`CanvasView`]s for
//!   decoders and [`CanvasSnapshot`]s for observers
//! - [`PixelBuffer`] / [`MutablePixelBuffer`] - the access traits

pub mod buffer;
pub mod canvas;
pub mod color_map;
pub mod error;
pub mod format;

pub use buffer::{MutablePixelBuffer, PixelBuffer};
pub use canvas::{Canvas, CanvasSnapshot, CanvasView, BYTES_PER_PIXEL};
pub use color_map::ColorMap;
pub use error::PixelBufferError;
pub use format::{encode_true_color, PixelSampleDecoder, Rgb};
