//! Persistence adapter for the pocketnotes library.
//!
//! Two independent JSON blobs (`notes.json` and `categories.json`) live in
//! the configured data directory. Each save writes a full snapshot through a
//! temp file in the same directory, then atomically renames it into place so
//! a crash mid-write never corrupts an existing blob.
//!
//! Saves initiated by the store are routed through a single background writer
//! task, which keeps snapshot writes committing in initiation order even
//! though the store itself never waits on them.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace};
use tempfile::NamedTempFile;
use tokio::sync::{mpsc, oneshot};

use crate::{Config, Note, Result, StoreError};

const NOTES_FILE: &str = "notes.json";
const CATEGORIES_FILE: &str = "categories.json";

/// Reads and writes the two persisted blobs.
pub struct Storage {
    notes_path: PathBuf,
    categories_path: PathBuf,
}

impl Storage {
    /// Creates a storage adapter rooted at the configured data directory,
    /// creating the directory if needed.
    pub fn new(config: &Config) -> Result<Self> {
        if !config.data_dir.exists() {
            debug!(
                "Data directory does not exist, creating: {}",
                config.data_dir.display()
            );
            fs::create_dir_all(&config.data_dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                StoreError::Directory {
                    path: config.data_dir.clone(),
                }
            })?;
        }

        Ok(Self {
            notes_path: config.data_dir.join(NOTES_FILE),
            categories_path: config.data_dir.join(CATEGORIES_FILE),
        })
    }

    /// Loads the notes blob. Returns `None` when the blob has never been
    /// written.
    pub fn load_notes(&self) -> Result<Option<Vec<Note>>> {
        load_blob(&self.notes_path)
    }

    /// Loads the categories blob. Returns `None` when the blob has never
    /// been written.
    pub fn load_categories(&self) -> Result<Option<Vec<String>>> {
        load_blob(&self.categories_path)
    }

    /// Writes a full snapshot of the notes collection.
    pub fn save_notes(&self, notes: &[Note]) -> Result<()> {
        trace!("Serializing {} notes", notes.len());
        let json = serde_json::to_string_pretty(notes)?;
        write_atomic(&self.notes_path, &json)?;
        debug!("Saved {} notes to {}", notes.len(), self.notes_path.display());
        Ok(())
    }

    /// Writes a full snapshot of the categories collection.
    pub fn save_categories(&self, categories: &[String]) -> Result<()> {
        let json = serde_json::to_string_pretty(categories)?;
        write_atomic(&self.categories_path, &json)?;
        debug!(
            "Saved {} categories to {}",
            categories.len(),
            self.categories_path.display()
        );
        Ok(())
    }
}

fn load_blob<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("Blob not present: {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read blob {}: {}", path.display(), e);
        StoreError::Io(e)
    })?;

    let value = serde_json::from_str(&content)?;
    trace!("Loaded blob from {}", path.display());
    Ok(Some(value))
}

/// Writes content through a temp file in the target directory, then
/// atomically renames it over the destination.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
        error!("Failed to create temporary file: {}", e);
        StoreError::Io(e)
    })?;

    temp_file.write_all(content.as_bytes()).map_err(|e| {
        error!("Failed to write to temporary file: {}", e);
        StoreError::Io(e)
    })?;

    temp_file.flush().map_err(StoreError::Io)?;

    temp_file.persist(path).map_err(|e| {
        error!("Failed to persist file {}: {}", path.display(), e.error);
        StoreError::Io(e.error)
    })?;

    Ok(())
}

/// A snapshot save job for the background writer.
pub(crate) enum PersistJob {
    Notes(Vec<Note>),
    Categories(Vec<String>),
    /// Acknowledged once every previously queued job has committed
    Flush(oneshot::Sender<()>),
}

/// Spawns the writer task draining the persist queue.
///
/// Save failures are logged and swallowed; the in-memory state is already
/// committed by the time a job reaches this queue. The task exits when the
/// store (the only sender) is dropped.
pub(crate) fn spawn_writer(storage: Storage) -> mpsc::UnboundedSender<PersistJob> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        debug!("Persistence writer task started");

        while let Some(job) = rx.recv().await {
            match job {
                PersistJob::Notes(notes) => {
                    if let Err(e) = storage.save_notes(&notes) {
                        error!("Failed to save notes: {}", e);
                    }
                }
                PersistJob::Categories(categories) => {
                    if let Err(e) = storage.save_categories(&categories) {
                        error!("Failed to save categories: {}", e);
                    }
                }
                PersistJob::Flush(ack) => {
                    // Queue order guarantees everything before this point is
                    // already on disk.
                    let _ = ack.send(());
                }
            }
        }

        info!("Persistence writer task stopped");
    });

    tx
}
