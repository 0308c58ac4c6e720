//! Query engine: pure derivations over the canonical notes collection.
//!
//! Nothing in this module mutates the store. Every function takes the
//! current snapshot and returns a fresh display list; consumers re-run their
//! query whenever the store's revision channel ticks.

use log::trace;

use crate::{CategoryFilter, Note, SortCriterion};

/// Free-text search over title, content, and tags.
///
/// An empty or whitespace-only query returns the full collection, archived
/// notes included — search is expected to find everything. Otherwise the
/// match is a case-insensitive substring test with no ranking; the result
/// keeps the collection's order (most recently created first).
pub fn search_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return notes.to_vec();
    }

    let results: Vec<Note> = notes
        .iter()
        .filter(|note| {
            note.title.to_lowercase().contains(&term)
                || note.content.to_lowercase().contains(&term)
                || note.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
        })
        .cloned()
        .collect();

    trace!("Search {:?} matched {} notes", term, results.len());
    results
}

/// Category view of the collection.
///
/// Archived notes appear only in the `Archived` view; every other view,
/// including `All`, excludes them.
pub fn notes_by_category(notes: &[Note], filter: &CategoryFilter) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| match filter {
            CategoryFilter::All => !note.is_archived,
            CategoryFilter::Archived => note.is_archived,
            CategoryFilter::Named(name) => !note.is_archived && &note.category == name,
        })
        .cloned()
        .collect()
}

/// Sorts a display list by the given criterion, then moves pinned notes
/// before unpinned ones.
///
/// The pin pass is a stable partition, not a comparator over both keys, so
/// the primary order within each group is untouched.
pub fn sort_notes(mut notes: Vec<Note>, criterion: SortCriterion) -> Vec<Note> {
    match criterion {
        SortCriterion::Title => notes.sort_by(|a, b| a.title.cmp(&b.title)),
        SortCriterion::CreatedAt => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortCriterion::UpdatedAt => notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }

    // Stable: pinned (key false) sorts before unpinned (key true)
    notes.sort_by_key(|note| !note.is_pinned);
    notes
}

/// The combined filter state a list screen holds: search query, selected
/// category, and sort criterion.
///
/// An active search query takes precedence over the category selection; the
/// result of either path always goes through the sort + pin partition.
#[derive(Debug, Clone)]
pub struct NoteQuery {
    query: String,
    category: CategoryFilter,
    sort: SortCriterion,
}

impl Default for NoteQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
            sort: SortCriterion::default(),
        }
    }
}

impl NoteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn set_sort(&mut self, sort: SortCriterion) {
        self.sort = sort;
    }

    /// Derives the display list from the given snapshot.
    pub fn run(&self, notes: &[Note]) -> Vec<Note> {
        let results = if self.query.trim().is_empty() {
            notes_by_category(notes, &self.category)
        } else {
            search_notes(notes, &self.query)
        };

        sort_notes(results, self.sort)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::NoteDraft;

    fn note(title: &str, content: &str) -> Note {
        Note::new(NoteDraft::new(title, content))
    }

    /// Builds a note whose timestamps are offset by whole minutes, so tests
    /// control relative ordering exactly.
    fn note_at(title: &str, minutes_ago: i64) -> Note {
        let mut n = note(title, "");
        let when = Utc::now() - Duration::minutes(minutes_ago);
        n.created_at = when;
        n.updated_at = when;
        n
    }

    #[test]
    fn empty_query_returns_everything_including_archived() {
        let mut archived = note("hidden", "");
        archived.is_archived = true;
        let notes = vec![note("visible", ""), archived];

        assert_eq!(search_notes(&notes, "").len(), 2);
        assert_eq!(search_notes(&notes, "   ").len(), 2);
    }

    #[test]
    fn search_matches_title_content_and_tags_case_insensitively() {
        let mut tagged = note("untitled", "nothing here");
        tagged.tags.push("Urgent-Errand".to_string());

        let notes = vec![
            note("Grocery List", "milk"),
            note("journal", "bought GROCERIES today"),
            tagged,
            note("unrelated", "zzz"),
        ];

        let by_title = search_notes(&notes, "grocer");
        assert_eq!(by_title.len(), 2);

        let by_tag = search_notes(&notes, "urgent");
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].title, "untitled");
    }

    #[test]
    fn search_matches_archived_notes_too() {
        let mut archived = note("archived grocery run", "");
        archived.is_archived = true;
        let notes = vec![note("unrelated", ""), archived];

        let results = search_notes(&notes, "grocery");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_archived);
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let notes = vec![note("a", "b"), note("c", "d")];
        assert!(search_notes(&notes, "xyz").is_empty());
    }

    #[test]
    fn search_preserves_collection_order() {
        let notes = vec![note("match one", ""), note("skip", ""), note("match two", "")];
        let results = search_notes(&notes, "match");
        assert_eq!(results[0].title, "match one");
        assert_eq!(results[1].title, "match two");
    }

    #[test]
    fn category_views_respect_archival() {
        let mut archived = note("old", "");
        archived.is_archived = true;
        let mut work = note("report", "");
        work.category = "Work".to_string();
        let notes = vec![note("personal", ""), work, archived];

        let all = notes_by_category(&notes, &CategoryFilter::All);
        assert_eq!(all.len(), 2);

        let archived_view = notes_by_category(&notes, &CategoryFilter::Archived);
        assert_eq!(archived_view.len(), 1);
        assert_eq!(archived_view[0].title, "old");

        let work_view = notes_by_category(&notes, &"Work".into());
        assert_eq!(work_view.len(), 1);
        assert_eq!(work_view[0].title, "report");
    }

    #[test]
    fn archived_note_leaves_its_category_view() {
        let mut n = note("groceries", "milk, eggs");
        n.is_archived = true;
        let notes = vec![n];

        assert!(notes_by_category(&notes, &"Personal".into()).is_empty());
        assert_eq!(notes_by_category(&notes, &CategoryFilter::Archived).len(), 1);
    }

    #[test]
    fn reserved_category_names_parse() {
        assert_eq!(CategoryFilter::from("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from("Archived"), CategoryFilter::Archived);
        assert_eq!(
            CategoryFilter::from("Work"),
            CategoryFilter::Named("Work".to_string())
        );
    }

    #[test]
    fn sorts_by_title_ascending() {
        let notes = vec![note_at("banana", 1), note_at("apple", 2), note_at("cherry", 3)];
        let sorted = sort_notes(notes, SortCriterion::Title);
        let titles: Vec<_> = sorted.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["apple", "banana", "cherry"]);
    }

    #[test]
    fn sorts_timestamps_newest_first() {
        let notes = vec![note_at("oldest", 30), note_at("newest", 1), note_at("middle", 10)];

        let by_created = sort_notes(notes.clone(), SortCriterion::CreatedAt);
        assert_eq!(by_created[0].title, "newest");
        assert_eq!(by_created[2].title, "oldest");

        let by_updated = sort_notes(notes, SortCriterion::UpdatedAt);
        assert_eq!(by_updated[0].title, "newest");
    }

    #[test]
    fn pinned_notes_lead_even_when_older() {
        let mut pinned = note_at("old but pinned", 60);
        pinned.is_pinned = true;
        let notes = vec![note_at("fresh", 1), pinned];

        let sorted = sort_notes(notes, SortCriterion::UpdatedAt);
        assert_eq!(sorted[0].title, "old but pinned");
        assert_eq!(sorted[1].title, "fresh");
    }

    #[test]
    fn pin_partition_is_stable_and_sort_is_idempotent() {
        let mut a = note_at("a", 1);
        a.is_pinned = true;
        let mut b = note_at("b", 5);
        b.is_pinned = true;
        let notes = vec![a, note_at("c", 2), b, note_at("d", 8)];

        let once = sort_notes(notes, SortCriterion::UpdatedAt);
        let titles: Vec<_> = once.iter().map(|n| n.title.as_str()).collect();
        // Within each group the updatedAt order holds
        assert_eq!(titles, ["a", "b", "c", "d"]);

        let twice = sort_notes(once.clone(), SortCriterion::UpdatedAt);
        assert_eq!(once, twice);
    }

    #[test]
    fn active_search_overrides_category_selection() {
        let mut work = note("meeting notes", "");
        work.category = "Work".to_string();
        let notes = vec![note("meeting prep", ""), work];

        let mut query = NoteQuery::new();
        query.set_category("Work".into());
        query.set_query("meeting");

        // Both notes match the search even though only one is in Work
        assert_eq!(query.run(&notes).len(), 2);

        query.clear_query();
        assert_eq!(query.run(&notes).len(), 1);
    }

    #[test]
    fn query_results_are_sorted_with_pins_first() {
        let mut pinned = note_at("pinned errand", 90);
        pinned.is_pinned = true;
        let notes = vec![note_at("errand today", 1), pinned, note_at("unrelated", 2)];

        let mut query = NoteQuery::new();
        query.set_query("errand");

        let results = query.run(&notes);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "pinned errand");
    }
}
