use super::error::Result;
use super::value::{BytesValue, Value};
use std::io::Read;
use std::sync::Arc;

/// Materializes the values associated with keys from durable storage.
pub trait Backend {
    /// The value type produced by this backend.
    type Value: Value;

    /// Loads the value for `key` from `reader`. `current` is the value the
    /// index currently holds for that key, if any; returning it unchanged
    /// leaves the index untouched.
    fn load(
        &self,
        key: &[u8],
        reader: &mut dyn Read,
        current: Option<&Arc<Self::Value>>,
    ) -> Result<Arc<Self::Value>>;
}

/// Reference backend that reads the whole stream into memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    type Value = BytesValue;

    fn load(
        &self,
        _key: &[u8],
        reader: &mut dyn Read,
        current: Option<&Arc<BytesValue>>,
    ) -> Result<Arc<BytesValue>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        // Keep the identity of unchanged content.
        match current {
            Some(current) if current.as_bytes() == &bytes[..] => Ok(current.clone()),
            _ => Ok(Arc::new(BytesValue::from(bytes))),
        }
    }
}
