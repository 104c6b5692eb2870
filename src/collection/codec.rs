//! JSON encoding helpers for record types.
//!
//! Record types that store themselves as JSON documents can delegate
//! `to_bytes`/`from_bytes` to these functions.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::record::CodecError;

/// Encode a value as a compact JSON document
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a JSON document
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
