//! ssh-wire - SSH transport wire primitives
//!
//! Binary building blocks from RFC 4251 and RFC 4253 that every SSH message is
//! made of: the `mpint` integer encoding, the comma-separated `name-list` used
//! for algorithm negotiation, and binary packet framing.
//!
//! # Quick Start
//!
//! ```rust
//! use ssh_wire::{NameList, Writer, expected_length};
//!
//! let kex: NameList = ["curve25519-sha256", "diffie-hellman-group14-sha256"]
//!     .into_iter()
//!     .collect();
//!
//! // Size the buffer first, then write into it.
//! let mut buf = vec![0u8; kex.marshaled_len()];
//! let mut writer = Writer::new(&mut buf);
//! kex.marshal_into(&mut writer)?;
//! assert_eq!(writer.remaining(), 0);
//!
//! let (decoded, rest) = NameList::unmarshal(&buf)?;
//! assert_eq!(decoded, kex);
//! assert!(rest.is_empty());
//!
//! assert_eq!(expected_length(10, 20), 34);
//! # Ok::<(), ssh_wire::Error>(())
//! ```
//!
//! # Features
//!
//! - **No allocation on the name-list path** - codecs write into caller-sized buffers
//! - **Explicit cursors** - [`Writer`] and [`Reader`] compose fields into one packet
//! - **Typed failures** - every malformed input surfaces as an [`Error`]
//!
//! All functions are pure and hold no global state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{Error, LENGTH_PREFIX_SIZE, MPInt, NameList, Reader, Result, Writer};
pub use transport::{MAX_PACKET_LENGTH, Packet, PacketLimits, expected_length};
