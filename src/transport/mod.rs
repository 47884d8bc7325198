//! SSH binary packet framing
//!
//! Plaintext frame layout and wire-length arithmetic. Ciphers, MACs and the key
//! exchange live in the caller.

mod packet;

pub use packet::{
    MAX_PACKET_LENGTH, MIN_BLOCK_SIZE, MIN_PADDING, PACKET_LENGTH_SIZE, Packet, PacketLimits,
    expected_length, padding_length_for,
};
