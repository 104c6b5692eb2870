//! # Collection Storage
//!
//! Directory-per-type, file-per-record persistence.
//!
//! # Layout
//!
//! ```text
//! <root>/<CollectionName>/<id>
//! ```
//!
//! Each file holds exactly one record in whatever encoding the record
//! type chooses. There are no sub-directories and no metadata files.
//!
//! # Guarantees
//!
//! - A missing record is `NotFound`, an undecodable one is `CorruptRecord`
//! - Batch results line up with their inputs by position
//! - A batch either fully succeeds or fails with an error
//! - Scans are lazy, unordered, and list the directory afresh each time

mod batch;
mod codec;
mod config;
mod errors;
mod record;
mod registry;
mod scan;
mod store;

pub use codec::{from_json_bytes, to_json_bytes};
pub use config::{StoreConfig, FALLBACK_MAX_CONCURRENCY};
pub use errors::{CollectionError, CollectionResult};
pub use record::{CodecError, Record};
pub use registry::StoreRegistry;
pub use scan::RecordScan;
pub use store::CollectionStore;
