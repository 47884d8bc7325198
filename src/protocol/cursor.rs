//! Read/write cursors over caller-owned byte buffers
//!
//! Codecs never allocate: they write into a [`Writer`] that wraps a buffer the
//! caller sized (usually from a `marshaled_len` call) and read from a [`Reader`]
//! over received bytes. Both track an explicit position, so several fields can be
//! composed into one packet without re-slicing.

use super::{Error, Result};

/// Size of the big-endian length prefix used by `string`, `mpint` and `name-list`.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Write cursor over a mutable byte buffer
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    /// Create a writer positioned at the start of `buf`
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still available
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The filled head of the buffer
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Consume the writer, returning the unconsumed tail of the buffer.
    #[must_use]
    pub fn into_remaining(self) -> &'a mut [u8] {
        let Self { buf, pos } = self;
        &mut buf[pos..]
    }

    /// Fail with [`Error::ShortBuffer`] unless `len` more bytes fit.
    pub fn ensure(&self, len: usize) -> Result<()> {
        let got = self.remaining();
        if got < len {
            return Err(Error::ShortBuffer { needed: len, got });
        }
        Ok(())
    }

    /// Write one byte
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.ensure(1)?;
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    /// Write a big-endian `uint32`
    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }

    /// Write raw bytes
    pub fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    /// Write an SSH `string`: length prefix followed by `bytes`.
    ///
    /// Nothing is written unless the whole field fits.
    pub fn put_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(LENGTH_PREFIX_SIZE + bytes.len())?;
        let len = u32::try_from(bytes.len()).map_err(|_| Error::ShortBuffer {
            needed: LENGTH_PREFIX_SIZE + bytes.len(),
            got: self.remaining(),
        })?;
        self.put_u32(len)?;
        self.put_slice(bytes)
    }
}

/// Read cursor over received bytes
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `buf`
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Read one byte
    pub fn get_u8(&mut self) -> Result<u8> {
        let value = *self.rest().first().ok_or(Error::ShortBuffer {
            needed: 1,
            got: 0,
        })?;
        self.pos += 1;
        Ok(value)
    }

    /// Read a big-endian `uint32` without consuming it
    pub fn peek_u32(&self) -> Result<u32> {
        let rest = self.rest();
        let head: [u8; 4] = rest
            .get(..LENGTH_PREFIX_SIZE)
            .and_then(|head| head.try_into().ok())
            .ok_or(Error::ShortBuffer {
                needed: LENGTH_PREFIX_SIZE,
                got: rest.len(),
            })?;
        Ok(u32::from_be_bytes(head))
    }

    /// Read a big-endian `uint32`
    pub fn get_u32(&mut self) -> Result<u32> {
        let value = self.peek_u32()?;
        self.pos += LENGTH_PREFIX_SIZE;
        Ok(value)
    }

    /// Borrow the next `len` bytes
    pub fn get_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let got = self.remaining();
        if got < len {
            return Err(Error::ShortBuffer { needed: len, got });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read an SSH `string` body.
    ///
    /// The reader does not advance when the declared length overruns the input.
    pub fn get_string(&mut self) -> Result<&'a [u8]> {
        let len = self.peek_u32()? as usize;
        let got = self.remaining();
        let needed = LENGTH_PREFIX_SIZE.saturating_add(len);
        if got < needed {
            return Err(Error::ShortBuffer { needed, got });
        }
        self.pos += LENGTH_PREFIX_SIZE;
        self.get_slice(len)
    }
}
