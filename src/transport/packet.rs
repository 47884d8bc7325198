//! SSH binary packet layout (RFC 4253 §6).
//!
//! ```text
//! [packet_length (u32)] [padding_length (u8)] [msg type (u8)] [payload]
//! [padding (padding_length bytes)] [mac (negotiated length)]
//! ```
//!
//! `packet_length` counts everything after itself except the MAC. Encryption and
//! MAC computation happen above this layer; the frames here are plaintext views.

use bytes::Bytes;
use tracing::{debug, instrument, trace};

use crate::protocol::{Error, Reader, Result, Writer};

/// Size of the `packet_length` field.
pub const PACKET_LENGTH_SIZE: usize = 4;

/// Largest `packet_length` every implementation must accept.
pub const MAX_PACKET_LENGTH: u32 = 35_000;

/// Minimum number of random padding bytes.
pub const MIN_PADDING: usize = 4;

/// Block size used for padding when the cipher's is smaller (or there is none).
pub const MIN_BLOCK_SIZE: usize = 8;

/// Bytes counted by `packet_length` besides payload and padding:
/// the padding-length byte and the message-type byte.
const FIXED_BODY_SIZE: usize = 2;

/// Total bytes a packet occupies on the wire.
///
/// `packet_length` excludes both its own 4-byte field and the MAC, so both are
/// added back. Callers bound `packet_length` (see [`PacketLimits::check`])
/// before sizing allocations from the result.
#[must_use]
pub const fn expected_length(packet_length: u32, mac_length: u32) -> usize {
    (packet_length as usize)
        .saturating_add(mac_length as usize)
        .saturating_add(PACKET_LENGTH_SIZE)
}

/// Padding needed for a packet carrying `body_len` bytes of message type plus
/// payload, so that the length field, padding-length byte, body and padding add
/// up to a multiple of the block size.
///
/// # Errors
///
/// Returns [`Error::InvalidPadding`] when the required padding does not fit the
/// one-byte `padding_length` field, which can happen for block sizes above 251.
pub fn padding_length_for(body_len: usize, block_size: usize) -> Result<u8> {
    let block = block_size.max(MIN_BLOCK_SIZE);
    let unpadded = PACKET_LENGTH_SIZE + 1 + body_len;
    let mut padding = block - unpadded % block;
    if padding < MIN_PADDING {
        padding += block;
    }
    u8::try_from(padding).map_err(|_| Error::InvalidPadding {
        padding_length: padding,
        packet_length: 1 + body_len + padding,
    })
}

/// Limits applied to incoming frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketLimits {
    /// Largest accepted `packet_length`.
    pub max_packet_length: u32,
}

impl Default for PacketLimits {
    fn default() -> Self {
        Self {
            max_packet_length: MAX_PACKET_LENGTH,
        }
    }
}

impl PacketLimits {
    /// Reject a declared `packet_length` above the configured maximum.
    pub fn check(&self, packet_length: u32) -> Result<()> {
        if packet_length > self.max_packet_length {
            debug!(
                packet_length,
                max = self.max_packet_length,
                "packet length exceeds limit"
            );
            return Err(Error::PacketTooLarge {
                size: packet_length as usize,
                max: self.max_packet_length as usize,
            });
        }
        Ok(())
    }
}

/// One SSH binary packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    packet_length: u32,
    padding_length: u8,
    msg_type: u8,
    payload: Bytes,
    padding: Bytes,
    mac: Bytes,
}

impl Packet {
    /// Assemble a packet, deriving `packet_length` and `padding_length`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPadding`] if `padding` is longer than 255 bytes and
    /// [`Error::PacketTooLarge`] if the frame does not fit a `u32` length.
    pub fn new(
        msg_type: u8,
        payload: impl Into<Bytes>,
        padding: impl Into<Bytes>,
        mac: impl Into<Bytes>,
    ) -> Result<Self> {
        let payload = payload.into();
        let padding = padding.into();
        let mac = mac.into();

        let length = FIXED_BODY_SIZE + payload.len() + padding.len();
        let padding_length = u8::try_from(padding.len()).map_err(|_| Error::InvalidPadding {
            padding_length: padding.len(),
            packet_length: length,
        })?;
        let too_large = |size| Error::PacketTooLarge {
            size,
            max: u32::MAX as usize,
        };
        let packet_length = u32::try_from(length).map_err(|_| too_large(length))?;
        u32::try_from(mac.len()).map_err(|_| too_large(mac.len()))?;

        Ok(Self {
            packet_length,
            padding_length,
            msg_type,
            payload,
            padding,
            mac,
        })
    }

    /// `packet_length` field
    #[must_use]
    pub const fn packet_length(&self) -> u32 {
        self.packet_length
    }

    /// `padding_length` field
    #[must_use]
    pub const fn padding_length(&self) -> u8 {
        self.padding_length
    }

    /// Message type byte
    #[must_use]
    pub const fn msg_type(&self) -> u8 {
        self.msg_type
    }

    /// Payload following the message type byte
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Random padding bytes
    #[must_use]
    pub fn padding(&self) -> &Bytes {
        &self.padding
    }

    /// MAC bytes (empty before a MAC is negotiated)
    #[must_use]
    pub fn mac(&self) -> &Bytes {
        &self.mac
    }

    /// MAC length as carried on the wire
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn mac_length(&self) -> u32 {
        // Bounded to u32 by `new`.
        self.mac.len() as u32
    }

    /// Total bytes on the wire, MAC included.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        expected_length(self.packet_length, self.mac_length())
    }

    /// Write the frame into `writer`. Nothing is written if it does not fit.
    pub fn marshal_into(&self, writer: &mut Writer<'_>) -> Result<()> {
        writer.ensure(self.wire_len())?;
        writer.put_u32(self.packet_length)?;
        writer.put_u8(self.padding_length)?;
        writer.put_u8(self.msg_type)?;
        writer.put_slice(&self.payload)?;
        writer.put_slice(&self.padding)?;
        writer.put_slice(&self.mac)?;
        trace!(
            packet_length = self.packet_length,
            msg_type = self.msg_type,
            "packet marshaled"
        );
        Ok(())
    }

    /// Parse one frame from the front of `raw`, returning it and the bytes after it.
    ///
    /// # Errors
    ///
    /// - [`Error::PacketTooLarge`] when `packet_length` exceeds `limits`
    /// - [`Error::ShortBuffer`] when `raw` holds less than the whole frame
    /// - [`Error::InvalidPadding`] when the padding overruns the counted region
    #[instrument(level = "trace", skip(raw, limits), fields(available = raw.len()))]
    pub fn unmarshal<'a>(
        raw: &'a [u8],
        mac_length: u32,
        limits: &PacketLimits,
    ) -> Result<(Self, &'a [u8])> {
        let mut reader = Reader::new(raw);
        let packet_length = reader.peek_u32()?;
        limits.check(packet_length)?;

        let needed = expected_length(packet_length, mac_length);
        if raw.len() < needed {
            debug!(needed, got = raw.len(), "truncated packet");
            return Err(Error::ShortBuffer {
                needed,
                got: raw.len(),
            });
        }

        reader.get_u32()?;
        let region = reader.get_slice(packet_length as usize)?;
        let padding_length = region.first().copied().unwrap_or(0);
        let payload_end = region
            .len()
            .checked_sub(usize::from(padding_length))
            .filter(|end| *end >= FIXED_BODY_SIZE)
            .ok_or_else(|| {
                debug!(padding_length, packet_length, "padding overruns packet");
                Error::InvalidPadding {
                    padding_length: usize::from(padding_length),
                    packet_length: packet_length as usize,
                }
            })?;
        let mac = reader.get_slice(mac_length as usize)?;

        let packet = Self {
            packet_length,
            padding_length,
            msg_type: region[1],
            payload: Bytes::copy_from_slice(&region[FIXED_BODY_SIZE..payload_end]),
            padding: Bytes::copy_from_slice(&region[payload_end..]),
            mac: Bytes::copy_from_slice(mac),
        };
        Ok((packet, reader.rest()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_length() {
        assert_eq!(expected_length(10, 20), 34);
        assert_eq!(expected_length(0, 0), 4);
    }

    #[test]
    fn test_expected_length_does_not_wrap() {
        assert_eq!(
            expected_length(u32::MAX, u32::MAX),
            2 * (u32::MAX as usize) + PACKET_LENGTH_SIZE
        );
    }

    #[test]
    fn test_padding_length_for() {
        // 4 + 1 + 1 = 6, next multiple of 8 is 8 but padding must be >= 4
        assert_eq!(padding_length_for(1, 0), Ok(10));
        assert_eq!(padding_length_for(3, 8), Ok(8));
        assert_eq!(padding_length_for(7, 16), Ok(4));
        for body_len in 0..64 {
            let padding = usize::from(padding_length_for(body_len, 16).unwrap());
            assert!(padding >= MIN_PADDING);
            assert_eq!((PACKET_LENGTH_SIZE + 1 + body_len + padding) % 16, 0);
        }
    }

    #[test]
    fn test_padding_length_for_large_blocks() {
        // 4 + 1 + 248 = 253, leaving 3 bytes to the block edge: one more block is needed
        assert!(matches!(
            padding_length_for(248, 256),
            Err(Error::InvalidPadding {
                padding_length: 259,
                ..
            })
        ));

        // Every padding the helper hands out must be accepted by `Packet::new`.
        for block_size in [8, 16, 32, 64, 128, 248, 251, 252, 255, 256, 512] {
            for body_len in 1..300 {
                if let Ok(padding) = padding_length_for(body_len, block_size) {
                    let packet = Packet::new(
                        20,
                        vec![0u8; body_len - 1],
                        vec![0u8; usize::from(padding)],
                        Bytes::new(),
                    );
                    assert!(packet.is_ok(), "block {block_size}, body {body_len}");
                }
            }
        }
        assert!(padding_length_for(0, 251).is_ok());
    }

    #[test]
    fn test_new_derives_lengths() {
        let packet = Packet::new(20, &b"kexinit"[..], vec![0u8; 6], vec![0xAA; 32]).unwrap();
        assert_eq!(packet.packet_length(), 2 + 7 + 6);
        assert_eq!(packet.padding_length(), 6);
        assert_eq!(packet.wire_len(), 4 + 15 + 32);
    }

    #[test]
    fn test_new_rejects_oversized_padding() {
        let result = Packet::new(2, Bytes::new(), vec![0u8; 256], Bytes::new());
        assert!(matches!(result, Err(Error::InvalidPadding { .. })));
    }

    #[test]
    fn test_roundtrip_with_trailing_bytes() {
        let packet = Packet::new(94, &b"data"[..], vec![7u8; 5], vec![0xEE; 20]).unwrap();
        let mut buf = vec![0u8; packet.wire_len() + 2];
        let mut writer = Writer::new(&mut buf);
        packet.marshal_into(&mut writer).unwrap();
        assert_eq!(writer.remaining(), 2);

        let (decoded, rest) = Packet::unmarshal(&buf, 20, &PacketLimits::default()).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_marshal_into_short_buffer() {
        let packet = Packet::new(1, Bytes::new(), vec![0u8; 4], Bytes::new()).unwrap();
        let mut buf = vec![0u8; packet.wire_len() - 1];
        let mut writer = Writer::new(&mut buf);
        assert!(matches!(
            packet.marshal_into(&mut writer),
            Err(Error::ShortBuffer { .. })
        ));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_unmarshal_rejects_large_length() {
        let raw = [0x00, 0x01, 0x00, 0x00, 0x04];
        let result = Packet::unmarshal(&raw, 0, &PacketLimits::default());
        assert!(matches!(
            result,
            Err(Error::PacketTooLarge {
                size: 65_536,
                max: 35_000
            })
        ));
    }

    #[test]
    fn test_unmarshal_truncated() {
        let raw = [0, 0, 0, 12, 4, 5];
        let result = Packet::unmarshal(&raw, 0, &PacketLimits::default());
        assert!(matches!(
            result,
            Err(Error::ShortBuffer { needed: 16, got: 6 })
        ));
    }

    #[test]
    fn test_unmarshal_padding_overrun() {
        let raw = [0, 0, 0, 3, 9, 5, 0];
        let result = Packet::unmarshal(&raw, 0, &PacketLimits::default());
        assert!(matches!(
            result,
            Err(Error::InvalidPadding {
                padding_length: 9,
                packet_length: 3
            })
        ));

        let empty = [0, 0, 0, 0];
        assert!(matches!(
            Packet::unmarshal(&empty, 0, &PacketLimits::default()),
            Err(Error::InvalidPadding { .. })
        ));
    }

    #[test]
    fn test_custom_limits() {
        let limits = PacketLimits {
            max_packet_length: 256 * 1024,
        };
        assert!(limits.check(100_000).is_ok());
        assert!(PacketLimits::default().check(100_000).is_err());
    }
}
