//! # Record Capability
//!
//! A record type knows its own identifier and how to turn itself into
//! bytes and back. The store never looks inside those bytes.

use std::any;
use std::error::Error;
use std::fmt;

/// Error returned by a record's own encode/decode logic
pub type CodecError = Box<dyn Error + Send + Sync>;

/// A value persisted as one file inside its collection directory.
///
/// The file name is the `Display` form of [`Record::id`]; the content is
/// whatever [`Record::to_bytes`] produces.
pub trait Record: Sized + Send + Sync + 'static {
    /// Identifier type, rendered through `Display` as the file name
    type Id: fmt::Display + Send + Sync;

    /// Identifier of this record
    fn id(&self) -> &Self::Id;

    /// Encode this record
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError>;

    /// Decode a record from the content of its file
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError>;

    /// Name of the collection directory.
    ///
    /// Defaults to the unqualified type name without generic arguments.
    fn collection_name() -> String {
        base_type_name(any::type_name::<Self>()).to_string()
    }
}

/// Strip module path and generic arguments from a type name
pub(crate) fn base_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Check that `name` can be used as a single path component
pub(crate) fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\' || c == '\0')
}
