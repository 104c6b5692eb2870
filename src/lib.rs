//! jsonfiledb - file-per-record document collections
//!
//! Each record type gets a directory under a shared root; each record is
//! one file in that directory, named by the record's identifier.

pub mod collection;

pub use collection::{
    CollectionError, CollectionResult, CollectionStore, Record, RecordScan, StoreConfig,
    StoreRegistry,
};
