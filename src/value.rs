use std::io::{self, Write};

/// A value stored in the index.
///
/// The trie never looks inside values: it only tests them for presence and
/// compares them by `Arc` identity. Values know their length and can write
/// their full content to a stream on demand, so implementations are free to
/// keep the payload out of memory.
pub trait Value {
    /// Length of the value's content, in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the full content to `out`, returning the number of bytes
    /// written.
    fn write_to(&self, out: &mut dyn Write) -> io::Result<u64>;
}

/// A value held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BytesValue(Vec<u8>);

impl From<Vec<u8>> for BytesValue {
    fn from(bytes: Vec<u8>) -> Self {
        BytesValue(bytes)
    }
}

impl From<&[u8]> for BytesValue {
    fn from(bytes: &[u8]) -> Self {
        BytesValue(bytes.to_vec())
    }
}

impl AsRef<[u8]> for BytesValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl BytesValue {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for BytesValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl Value for BytesValue {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    fn write_to(&self, out: &mut dyn Write) -> io::Result<u64> {
        out.write_all(&self.0)?;
        Ok(self.0.len() as u64)
    }
}
