//! SSH wire data representations
//!
//! This module provides the `mpint` and `name-list` codecs and the cursors they
//! write into and read from.

mod cursor;
mod error;
mod mpint;
mod name_list;

pub use cursor::{LENGTH_PREFIX_SIZE, Reader, Writer};
pub use error::{Error, Result};
pub use mpint::MPInt;
pub use name_list::NameList;
