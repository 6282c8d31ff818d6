//! Bounded readers for RFB message payloads.
//!
//! The transport layer hands the decoder fully delimited messages, so there is
//! no socket to refill from: every read either succeeds out of the bytes at
//! hand or fails with [`Truncated`]. Multi-byte integers are network byte
//! order (big-endian), as everywhere in RFB.
//!
//! # Examples
//!
//! ```
//! use rfb_protocol::io::PayloadReader;
//!
//! let payload = [0x00, 0x10, 0x00, 0x20, 0xAA];
//! let mut reader = PayloadReader::new(&payload);
//!
//! assert_eq!(reader.read_u16().unwrap(), 16);
//! assert_eq!(reader.read_u16().unwrap(), 32);
//! assert_eq!(reader.remaining(), 1);
//!
//! // Asking for more than is left is an error, not a panic
//! assert!(reader.read_u32().is_err());
//! ```

use bytes::Buf;
use thiserror::Error;

/// A read asked for more bytes than the payload still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("payload truncated: needed {needed} bytes at offset {offset}, {remaining} remaining")]
pub struct Truncated {
    /// Bytes the read required.
    pub needed: usize,
    /// Bytes left in the payload when the read was attempted.
    pub remaining: usize,
    /// Offset into the payload at which the read was attempted.
    pub offset: usize,
}

/// Cursor over one payload.
///
/// Reads never panic. A failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    consumed: usize,
}

impl<'a> PayloadReader<'a> {
    /// Create a reader positioned at the start of `payload`.
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            buf: payload,
            consumed: 0,
        }
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Bytes read so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// True once every byte has been read.
    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    /// Fails unless at least `n` bytes are left.
    pub fn ensure(&self, n: usize) -> Result<(), Truncated> {
        if self.buf.remaining() < n {
            return Err(Truncated {
                needed: n,
                remaining: self.buf.remaining(),
                offset: self.consumed,
            });
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Truncated> {
        self.ensure(1)?;
        self.consumed += 1;
        Ok(self.buf.get_u8())
    }

    /// Read a 16-bit unsigned integer (big-endian).
    pub fn read_u16(&mut self) -> Result<u16, Truncated> {
        self.ensure(2)?;
        self.consumed += 2;
        Ok(self.buf.get_u16())
    }

    /// Read a 32-bit unsigned integer (big-endian).
    pub fn read_u32(&mut self) -> Result<u32, Truncated> {
        self.ensure(4)?;
        self.consumed += 4;
        Ok(self.buf.get_u32())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], Truncated> {
        self.ensure(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        self.consumed += n;
        Ok(head)
    }

    /// Advance past `n` bytes (padding).
    pub fn skip(&mut self, n: usize) -> Result<(), Truncated> {
        self.read_bytes(n).map(|_| ())
    }
}
