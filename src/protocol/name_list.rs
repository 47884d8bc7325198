//! SSH `name-list` encoding (RFC 4251 §5)
//!
//! # Format
//!
//! ```text
//! [LENGTH (u32, big-endian)] [NAME "," NAME "," ...]
//! ```
//!
//! A zero length is the empty list. Names are never escaped, so a name containing
//! a comma cannot be represented; callers must not pass one.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use super::{Error, LENGTH_PREFIX_SIZE, Reader, Result, Writer};

const SEPARATOR: u8 = b',';

/// Ordered list of algorithm or capability names
///
/// Order expresses preference; duplicates are not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NameList(Vec<String>);

impl NameList {
    /// Create an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of names
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no names
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over names in preference order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether `name` appears in the list
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    /// Append a name
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// Borrow the names
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Pick the first client name the server also supports (RFC 4253 §7.1).
    #[must_use]
    pub fn first_match<'a>(client: &'a Self, server: &Self) -> Option<&'a str> {
        client.iter().find(|name| server.contains(name))
    }

    fn body_len(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        let names: usize = self.0.iter().map(String::len).sum();
        names + self.0.len() - 1
    }

    /// Exact size of the wire form, length prefix included.
    ///
    /// Use it to size the buffer handed to [`NameList::marshal_into`].
    #[must_use]
    pub fn marshaled_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.body_len()
    }

    /// Write the length prefix and comma-joined names into `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShortBuffer`] if fewer than 4 bytes remain, or if the
    /// joined names do not fit after the prefix. Nothing is written in that case.
    pub fn marshal_into(&self, writer: &mut Writer<'_>) -> Result<()> {
        writer.ensure(LENGTH_PREFIX_SIZE)?;
        let body_len = self.body_len();
        writer.ensure(LENGTH_PREFIX_SIZE + body_len)?;
        let prefix = u32::try_from(body_len).map_err(|_| Error::ShortBuffer {
            needed: LENGTH_PREFIX_SIZE + body_len,
            got: writer.remaining(),
        })?;

        writer.put_u32(prefix)?;
        for (index, name) in self.0.iter().enumerate() {
            if index > 0 {
                writer.put_u8(SEPARATOR)?;
            }
            writer.put_slice(name.as_bytes())?;
        }

        trace!(names = self.0.len(), body_len, "name-list marshaled");
        Ok(())
    }

    /// Encode into a freshly allocated buffer
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = vec![0u8; self.marshaled_len()];
        let mut writer = Writer::new(&mut buf);
        self.marshal_into(&mut writer)?;
        Ok(Bytes::from(buf))
    }

    /// Decode a name-list from the front of `reader`.
    ///
    /// The reader only advances on success.
    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        let mut lookahead = reader.clone();
        let body = lookahead.get_string().inspect_err(|err| {
            debug!(available = reader.remaining(), %err, "truncated name-list");
        })?;
        let text = std::str::from_utf8(body)?;
        let names = if text.is_empty() {
            Vec::new()
        } else {
            text.split(char::from(SEPARATOR)).map(str::to_owned).collect()
        };
        *reader = lookahead;
        Ok(Self(names))
    }

    /// Decode `[length][body][extra]`, returning the list and `extra`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShortBuffer`] if `raw` holds fewer than 4 bytes or fewer
    /// than the declared body length, and [`Error::InvalidUtf8`] for a body that
    /// is not UTF-8.
    pub fn unmarshal(raw: &[u8]) -> Result<(Self, &[u8])> {
        let mut reader = Reader::new(raw);
        let list = Self::read_from(&mut reader)?;
        Ok((list, reader.rest()))
    }
}

impl fmt::Display for NameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<NameList> for Vec<String> {
    fn from(list: NameList) -> Self {
        list.0
    }
}

impl<S: Into<String>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a NameList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
