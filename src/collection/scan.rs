//! Lazy scan over a collection directory

use std::fs::{self, ReadDir};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use super::errors::{CollectionError, CollectionResult};
use super::record::Record;

/// One-shot iterator over the records of a collection.
///
/// Each item is decoded only when the iterator reaches it. Directory
/// listing order is filesystem-defined, so items come in no particular
/// order. Entries that are not regular files are skipped.
pub struct RecordScan<R: Record> {
    collection: Arc<str>,
    collection_dir: PathBuf,
    entries: ReadDir,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordScan<R> {
    /// Start a fresh listing of `collection_dir`.
    pub(crate) fn open(collection: Arc<str>, collection_dir: &Path) -> CollectionResult<Self> {
        let entries = open_collection_dir(collection_dir)?;

        Ok(Self {
            collection,
            collection_dir: collection_dir.to_path_buf(),
            entries,
            _record: PhantomData,
        })
    }

    fn decode(&self, path: PathBuf) -> CollectionResult<R> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        read_record(&self.collection, &name, path)
    }
}

impl<R: Record> Iterator for RecordScan<R> {
    type Item = CollectionResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(CollectionError::Io {
                        path: self.collection_dir.clone(),
                        source: e,
                    }))
                }
            };

            let path = entry.path();
            match entry.file_type() {
                Ok(kind) if kind.is_file() => return Some(self.decode(path)),
                Ok(_) => {
                    warn!(
                        collection = %self.collection,
                        path = %path.display(),
                        "skipping non-file entry in collection directory"
                    );
                }
                Err(e) => return Some(Err(CollectionError::Io { path, source: e })),
            }
        }
    }
}

/// List a collection directory; a missing directory is `CollectionMissing`.
pub(crate) fn open_collection_dir(collection_dir: &Path) -> CollectionResult<ReadDir> {
    fs::read_dir(collection_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CollectionError::CollectionMissing(collection_dir.to_path_buf())
        } else {
            CollectionError::Io {
                path: collection_dir.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read and decode the record stored at `path`.
pub(crate) fn read_record<R: Record>(
    collection: &str,
    id: &str,
    path: PathBuf,
) -> CollectionResult<R> {
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => return Err(CollectionError::from_io(collection, id, path, e)),
    };

    R::from_bytes(&bytes).map_err(|e| CollectionError::CorruptRecord {
        collection: collection.to_string(),
        id: id.to_string(),
        reason: e.to_string(),
    })
}
