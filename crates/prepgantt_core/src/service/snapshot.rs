//! JSON snapshot decoding shared by services.

use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A stored blob that could not be parsed back into its dataset.
///
/// Callers recover by discarding the blob and falling back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptSnapshot {
    pub key: &'static str,
    pub message: String,
}

impl Display for CorruptSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "stored snapshot `{}` is corrupt: {}", self.key, self.message)
    }
}

impl Error for CorruptSnapshot {}

pub(crate) fn decode<T: DeserializeOwned>(
    key: &'static str,
    blob: &str,
) -> Result<T, CorruptSnapshot> {
    serde_json::from_str(blob).map_err(|err| CorruptSnapshot {
        key,
        message: err.to_string(),
    })
}
