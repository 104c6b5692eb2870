//! Collection store
//!
//! Maps a record identifier to `<root>/<collection>/<id>` and performs
//! single-record and batch CRUD against that directory. The store keeps
//! no cache and holds no file handles between calls.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::ThreadPool;
use tracing::debug;

use super::batch::{build_pool, run_batch};
use super::config::StoreConfig;
use super::errors::{CollectionError, CollectionResult};
use super::record::{is_safe_file_name, Record};
use super::scan::{open_collection_dir, read_record, RecordScan};

/// File-per-record store for one record type.
pub struct CollectionStore<R: Record> {
    root_dir: PathBuf,
    collection: Arc<str>,
    collection_dir: PathBuf,
    max_concurrency: usize,
    pool: ThreadPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> fmt::Debug for CollectionStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("collection", &self.collection)
            .field("collection_dir", &self.collection_dir)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl<R: Record> CollectionStore<R> {
    /// Bind `R` to `root_dir` with default settings.
    ///
    /// The collection directory is not created here.
    pub fn new(root_dir: impl Into<PathBuf>) -> CollectionResult<Self> {
        Self::with_config(&StoreConfig::new(root_dir))
    }

    /// Bind `R` to the root directory in `config`.
    pub fn with_config(config: &StoreConfig) -> CollectionResult<Self> {
        config.validate()?;

        let collection = R::collection_name();
        if !is_safe_file_name(&collection) {
            return Err(CollectionError::Configuration(format!(
                "collection name '{}' is not a valid directory name",
                collection
            )));
        }

        let collection_dir = config.root_dir.join(&collection);
        let pool = build_pool(&collection, config.max_concurrency)?;
        debug!(collection = %collection, dir = %collection_dir.display(), "collection bound");

        Ok(Self {
            root_dir: config.root_dir.clone(),
            collection: Arc::from(collection),
            collection_dir,
            max_concurrency: config.max_concurrency,
            pool,
            _record: PhantomData,
        })
    }

    /// Name of the collection (the directory name under the root).
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Directory holding this collection's record files.
    pub fn collection_dir(&self) -> &Path {
        &self.collection_dir
    }

    /// Root directory shared with other collections.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Worker limit used by batch operations.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Load the record stored under `id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no file exists for `id`
    /// - `CorruptRecord` if the file cannot be decoded
    pub fn load(&self, id: &R::Id) -> CollectionResult<R> {
        let (name, path) = self.resolve(id)?;
        debug!(collection = %self.collection, id = %name, "load");
        read_record(&self.collection, &name, path)
    }

    /// Scan every record in the collection.
    ///
    /// Each call lists the directory afresh. Records are decoded lazily
    /// and arrive in no particular order.
    pub fn load_all(&self) -> CollectionResult<RecordScan<R>> {
        debug!(collection = %self.collection, "scan");
        RecordScan::open(Arc::clone(&self.collection), &self.collection_dir)
    }

    /// Write `record`, creating or fully replacing its file.
    pub fn write(&self, record: R) -> CollectionResult<R> {
        let (name, path) = self.resolve(record.id())?;
        let bytes = record
            .to_bytes()
            .map_err(|e| CollectionError::Serialization {
                id: name.clone(),
                reason: e.to_string(),
            })?;

        debug!(collection = %self.collection, id = %name, bytes = bytes.len(), "write");
        fs::write(&path, bytes).map_err(|e| CollectionError::Io { path, source: e })?;
        Ok(record)
    }

    /// Same contract as [`CollectionStore::write`].
    pub fn update(&self, record: R) -> CollectionResult<R> {
        self.write(record)
    }

    /// Delete the file of `record`.
    pub fn delete(&self, record: &R) -> CollectionResult<()> {
        self.delete_by_id(record.id())
    }

    /// Delete the file stored under `id`.
    ///
    /// Fails with `NotFound` if there is nothing to delete.
    pub fn delete_by_id(&self, id: &R::Id) -> CollectionResult<()> {
        let (name, path) = self.resolve(id)?;
        debug!(collection = %self.collection, id = %name, "delete");
        fs::remove_file(&path)
            .map_err(|e| CollectionError::from_io(&self.collection, &name, path, e))
    }

    /// Whether a file exists for `id`.
    pub fn contains(&self, id: &R::Id) -> CollectionResult<bool> {
        let (_, path) = self.resolve(id)?;
        Ok(path.is_file())
    }

    /// Names of the record files currently in the collection.
    pub fn ids(&self) -> CollectionResult<Vec<String>> {
        let entries = open_collection_dir(&self.collection_dir)?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CollectionError::Io {
                path: self.collection_dir.clone(),
                source: e,
            })?;
            let is_file = entry
                .file_type()
                .map_err(|e| CollectionError::Io {
                    path: entry.path(),
                    source: e,
                })?
                .is_file();
            if is_file {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(ids)
    }

    /// Load several records concurrently.
    ///
    /// `result[i]` is the record for `ids[i]`. Any failure fails the
    /// whole call.
    pub fn load_multiple(&self, ids: &[R::Id]) -> CollectionResult<Vec<R>> {
        debug!(collection = %self.collection, count = ids.len(), "load_multiple");
        run_batch(&self.pool, ids.iter().collect(), |id| self.load(id))
    }

    /// Write several records concurrently.
    ///
    /// `result[i]` is `records[i]`. Identifiers must be unique within the
    /// batch; a repeated identifier is rejected before anything is written.
    pub fn write_multiple(&self, records: Vec<R>) -> CollectionResult<Vec<R>> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let name = self.file_name(record.id())?;
            if !seen.insert(name.clone()) {
                return Err(CollectionError::DuplicateIdentifier(name));
            }
        }

        debug!(collection = %self.collection, count = records.len(), "write_multiple");
        run_batch(&self.pool, records, |record| self.write(record))
    }

    fn file_name(&self, id: &R::Id) -> CollectionResult<String> {
        let name = id.to_string();
        if is_safe_file_name(&name) {
            Ok(name)
        } else {
            Err(CollectionError::InvalidIdentifier(name))
        }
    }

    fn resolve(&self, id: &R::Id) -> CollectionResult<(String, PathBuf)> {
        let name = self.file_name(id)?;
        let path = self.collection_dir.join(&name);
        Ok((name, path))
    }
}
