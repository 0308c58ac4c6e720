//! Shared types for the pocketnotes library.
//!
//! This module contains the Result alias and the small value types used by
//! the query engine and store.

use crate::StoreError;

/// A specialized Result type for pocketnotes operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Categories present on first run. These cannot be removed from the store.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Personal", "Work", "Ideas", "To-Do"];

/// Category every note falls back to when its own category is deleted, and
/// the default for newly created notes.
pub const FALLBACK_CATEGORY: &str = "Personal";

/// Sort criterion for display lists.
///
/// Title sorts ascending; both timestamp criteria sort newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    /// Lexicographic ascending by title
    Title,
    /// Newest created first
    CreatedAt,
    /// Newest updated first
    #[default]
    UpdatedAt,
}

/// Category view selector used by the query engine.
///
/// `"All"` and `"Archived"` are reserved names: `All` shows every
/// non-archived note, `Archived` only archived ones. Any other name selects
/// non-archived notes of that category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every non-archived note
    All,
    /// Every archived note
    Archived,
    /// Non-archived notes whose category equals the given name
    Named(String),
}

impl From<&str> for CategoryFilter {
    fn from(name: &str) -> Self {
        match name {
            "All" => CategoryFilter::All,
            "Archived" => CategoryFilter::Archived,
            other => CategoryFilter::Named(other.to_string()),
        }
    }
}
