//! SSH `mpint` encoding (RFC 4251 §5)
//!
//! An mpint is a signed integer stored as a minimal big-endian two's-complement
//! byte string. Positive values whose top byte has the high bit set get a leading
//! `0x00` so they are not read back as negative.

use std::ops::Deref;

use num_bigint::{BigInt, BigUint, Sign};
use tracing::trace;

use super::{Error, LENGTH_PREFIX_SIZE, Result, Writer};

/// Arbitrary-precision integer in SSH `mpint` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MPInt {
    value: BigInt,
}

impl MPInt {
    /// Wrap a big integer
    #[must_use]
    pub const fn new(value: BigInt) -> Self {
        Self { value }
    }

    /// Borrow the wrapped integer
    #[must_use]
    pub const fn value(&self) -> &BigInt {
        &self.value
    }

    /// Unwrap the integer
    #[must_use]
    pub fn into_inner(self) -> BigInt {
        self.value
    }

    /// Encode the value body (without the length prefix).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyValue`] for zero, whose magnitude has no bytes.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        match self.value.sign() {
            Sign::NoSign => Err(Error::EmptyValue),
            Sign::Plus => {
                let magnitude = self.value.magnitude().to_bytes_be();
                if magnitude[0] < 0x80 {
                    return Ok(magnitude);
                }
                let mut out = Vec::with_capacity(magnitude.len() + 1);
                out.push(0x00);
                out.extend_from_slice(&magnitude);
                Ok(out)
            }
            // Already minimal and sign-extended: the top bit is always set.
            Sign::Minus => Ok(self.value.to_signed_bytes_be()),
        }
    }

    /// Length of the framed wire form: prefix plus body.
    pub fn marshaled_len(&self) -> Result<usize> {
        Ok(LENGTH_PREFIX_SIZE + self.marshal()?.len())
    }

    /// Write the framed `mpint` (`[u32 length][body]`) into `writer`.
    ///
    /// The writer is left untouched on failure.
    pub fn marshal_into(&self, writer: &mut Writer<'_>) -> Result<()> {
        let body = self.marshal()?;
        writer.put_string(&body)?;
        trace!(len = body.len(), "mpint marshaled");
        Ok(())
    }
}

impl Deref for MPInt {
    type Target = BigInt;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<BigInt> for MPInt {
    fn from(value: BigInt) -> Self {
        Self::new(value)
    }
}

impl From<BigUint> for MPInt {
    fn from(value: BigUint) -> Self {
        Self::new(BigInt::from(value))
    }
}

impl From<u64> for MPInt {
    fn from(value: u64) -> Self {
        Self::new(BigInt::from(value))
    }
}

impl From<i64> for MPInt {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value))
    }
}
