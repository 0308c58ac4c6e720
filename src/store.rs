//! The note store: sole owner and mutator of the canonical collections.
//!
//! A `NoteStore` is constructed once at process start via [`NoteStore::open`]
//! and passed by reference to every consumer; there is no global instance.
//! `open` performs the one-time load before the value exists, so consumers
//! can never mutate a store whose persisted state has not been read yet.
//!
//! Mutations apply synchronously to the in-memory collections, then enqueue a
//! fire-and-forget snapshot write (see the storage module) and tick the
//! revision channel subscribers watch. Mutations referencing a missing note
//! or category are silent no-ops.

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{oneshot, watch};

use crate::{
    storage::{spawn_writer, PersistJob},
    Config, Note, NoteDraft, NoteUpdate, Result, Storage, DEFAULT_CATEGORIES, FALLBACK_CATEGORY,
};

/// Owns the canonical notes and categories collections.
pub struct NoteStore {
    /// Canonical notes, most recently created first
    notes: Vec<Note>,
    /// Category names in insertion order, defaults first
    categories: Vec<String>,
    /// Queue feeding the background persistence writer
    persist_tx: tokio::sync::mpsc::UnboundedSender<PersistJob>,
    /// Revision channel ticked on every change
    changed: watch::Sender<u64>,
}

impl NoteStore {
    /// Opens the store: loads both blobs once, then spawns the persistence
    /// writer. A blob that is absent or unreadable leaves its collection at
    /// the default value (empty notes, the four default categories).
    ///
    /// Must be called within a tokio runtime.
    pub async fn open(config: Config) -> Result<Self> {
        let storage = Storage::new(&config)?;

        let notes = match storage.load_notes() {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load notes, starting empty: {}", e);
                Vec::new()
            }
        };

        let categories = match storage.load_categories() {
            Ok(Some(categories)) => categories,
            Ok(None) => default_categories(),
            Err(e) => {
                warn!("Failed to load categories, starting with defaults: {}", e);
                default_categories()
            }
        };

        info!(
            "Note store ready: {} notes, {} categories",
            notes.len(),
            categories.len()
        );

        let (changed, _) = watch::channel(0);

        Ok(Self {
            notes,
            categories,
            persist_tx: spawn_writer(storage),
            changed,
        })
    }

    /// The canonical notes collection, most recently created first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The category names in insertion order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Subscribes to store changes. The receiver observes a new revision
    /// number after every mutation that changed state.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    /// Creates a new note from the draft and returns its id.
    pub fn create_note(&mut self, draft: NoteDraft) -> String {
        let note = Note::new(draft);
        let id = note.id.clone();
        info!("Creating note {}", id);

        self.notes.insert(0, note);
        self.persist_notes();
        self.notify();
        id
    }

    /// Merges the given fields into the matching note and bumps its
    /// `updated_at`. No-op if the id is unknown.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) {
        self.touch_note(id, |note| update.apply(note));
    }

    /// Permanently removes a note. No-op if the id is unknown.
    pub fn delete_note(&mut self, id: &str) {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);

        if self.notes.len() == before {
            debug!("Delete ignored, note {} not found", id);
            return;
        }

        info!("Deleted note {}", id);
        self.persist_notes();
        self.notify();
    }

    /// Flips the pinned flag and bumps `updated_at`. No-op if unknown.
    pub fn toggle_pin(&mut self, id: &str) {
        self.touch_note(id, |note| note.is_pinned = !note.is_pinned);
    }

    /// Flips the archived flag and bumps `updated_at`. No-op if unknown.
    pub fn toggle_archive(&mut self, id: &str) {
        self.touch_note(id, |note| note.is_archived = !note.is_archived);
    }

    /// Appends a tag to a note. No-op if the note is unknown or already
    /// carries the tag (case-sensitive exact match).
    pub fn add_tag(&mut self, id: &str, tag: &str) {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!("Add tag ignored, note {} not found", id);
            return;
        };

        if note.tags.iter().any(|t| t == tag) {
            debug!("Tag {:?} already on note {}", tag, id);
            return;
        }

        note.tags.push(tag.to_string());
        note.updated_at = Utc::now();
        self.persist_notes();
        self.notify();
    }

    /// Removes every exact occurrence of a tag from a note.
    ///
    /// `updated_at` is bumped even when the tag was absent; the mobile
    /// clients rely on this to resort after any tag edit attempt.
    pub fn remove_tag(&mut self, id: &str, tag: &str) {
        self.touch_note(id, |note| note.tags.retain(|t| t != tag));
    }

    /// Appends a category. No-op if the name is already present.
    pub fn add_category(&mut self, name: &str) {
        if self.categories.iter().any(|c| c == name) {
            debug!("Category {:?} already exists", name);
            return;
        }

        info!("Adding category {:?}", name);
        self.categories.push(name.to_string());
        self.persist_categories();
        self.notify();
    }

    /// Removes a category and reassigns every note that referenced it to the
    /// fallback category, bumping each note's `updated_at`.
    ///
    /// No-op if the name is absent or one of the default categories; the
    /// store, not the UI, is the authority on that guard.
    pub fn remove_category(&mut self, name: &str) {
        if DEFAULT_CATEGORIES.contains(&name) {
            warn!("Refusing to remove default category {:?}", name);
            return;
        }

        let before = self.categories.len();
        self.categories.retain(|c| c != name);

        if self.categories.len() == before {
            debug!("Remove ignored, category {:?} not found", name);
            return;
        }

        // Cascade within the same operation so no observer sees a note
        // pointing at a category that no longer exists.
        let now = Utc::now();
        let mut reassigned = 0;
        for note in self.notes.iter_mut().filter(|n| n.category == name) {
            note.category = FALLBACK_CATEGORY.to_string();
            note.updated_at = now;
            reassigned += 1;
        }

        info!(
            "Removed category {:?}, reassigned {} notes to {:?}",
            name, reassigned, FALLBACK_CATEGORY
        );

        self.persist_categories();
        if reassigned > 0 {
            self.persist_notes();
        }
        self.notify();
    }

    /// Waits until every persistence write queued so far has committed.
    /// Useful at shutdown and in tests; normal operation never waits.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.persist_tx.send(PersistJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Applies a mutation to the matching note, bumps its `updated_at`, and
    /// triggers persistence. No-op if the id is unknown.
    fn touch_note<F: FnOnce(&mut Note)>(&mut self, id: &str, mutate: F) {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            debug!("Mutation ignored, note {} not found", id);
            return;
        };

        mutate(note);
        note.updated_at = Utc::now();
        self.persist_notes();
        self.notify();
    }

    fn persist_notes(&self) {
        if self
            .persist_tx
            .send(PersistJob::Notes(self.notes.clone()))
            .is_err()
        {
            warn!("Persistence writer has shut down, dropping notes snapshot");
        }
    }

    fn persist_categories(&self) {
        if self
            .persist_tx
            .send(PersistJob::Categories(self.categories.clone()))
            .is_err()
        {
            warn!("Persistence writer has shut down, dropping categories snapshot");
        }
    }

    fn notify(&self) {
        self.changed.send_modify(|rev| *rev += 1);
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
