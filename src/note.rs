//! Core data structures for the pocketnotes library.
//!
//! This module contains the Note entity together with the draft and
//! partial-update payloads the store accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FALLBACK_CATEGORY;

/// Represents a single note in our system.
///
/// Field names are serialized in camelCase so the persisted JSON matches the
/// layout the mobile clients read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note, immutable once created
    pub id: String,
    /// Note title, may be empty
    pub title: String,
    /// Note body text, may be empty
    pub content: String,
    /// Name of the category this note belongs to
    pub category: String,
    /// Display color token, free-form
    pub color: String,
    /// Tags in insertion order, no duplicates
    pub tags: Vec<String>,
    /// Whether the note is pinned to the top of display lists
    pub is_pinned: bool,
    /// Whether the note is archived (hidden from category views)
    pub is_archived: bool,
    /// Opaque reference to an attached voice recording, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_uri: Option<String>,
    /// When the note was created, set once
    pub created_at: DateTime<Utc>,
    /// Last modification time, bumped on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note from a draft, assigning a fresh id and timestamps.
    pub fn new(draft: NoteDraft) -> Self {
        let now = Utc::now();

        Note {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            color: draft.color,
            tags: Vec::new(),
            is_pinned: false,
            is_archived: false,
            audio_uri: draft.audio_uri,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Creation parameters for a note.
///
/// Only title and content are usually supplied; the rest default to the
/// values a freshly typed note gets on the home screen.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub color: String,
    pub audio_uri: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: FALLBACK_CATEGORY.to_string(),
            color: "#ffffff".to_string(),
            audio_uri: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn audio_uri(mut self, uri: impl Into<String>) -> Self {
        self.audio_uri = Some(uri.into());
        self
    }
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Partial update payload for `NoteStore::update_note`.
///
/// Fields left as `None` are untouched. The audio field is doubly optional
/// so a caller can distinguish "leave as-is" from "clear the recording".
/// A replacement tag list is deduplicated (exact match, first occurrence
/// wins) so the no-duplicates invariant holds no matter which path edits
/// the tags.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub audio_uri: Option<Option<String>>,
}

impl NoteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn audio_uri(mut self, uri: Option<String>) -> Self {
        self.audio_uri = Some(uri);
        self
    }

    /// Applies the populated fields onto a note. The caller is responsible
    /// for bumping `updated_at`.
    pub(crate) fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(category) = self.category {
            note.category = category;
        }
        if let Some(color) = self.color {
            note.color = color;
        }
        if let Some(tags) = self.tags {
            let mut deduped = Vec::with_capacity(tags.len());
            for tag in tags {
                if !deduped.contains(&tag) {
                    deduped.push(tag);
                }
            }
            note.tags = deduped;
        }
        if let Some(audio_uri) = self.audio_uri {
            note.audio_uri = audio_uri;
        }
    }
}
