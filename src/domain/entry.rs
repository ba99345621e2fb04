//! Entries and their publication lifecycle.
//!
//! An entry moves freely between `draft`, `published` and `archived`, but
//! `published_at` is stamped only once: on the first save that finds the
//! entry published with no timestamp yet. Later saves never move or clear it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::tag::Tag;
use crate::domain::types::{
    CategoryId, EntryContent, EntryId, EntryStatus, EntrySummary, EntryTitle, LikeCount, TagId,
    UserId, Username, ViewCount,
};

/// Returns the `published_at` value an entry must carry once saved.
///
/// The timestamp is set to `now` only when the entry is published and has
/// never been stamped before; every other combination keeps `current`.
pub fn publication_timestamp(
    status: EntryStatus,
    current: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match current {
        Some(stamped) => Some(stamped),
        None if status.is_published() => Some(now),
        None => None,
    }
}

/// Authored article with a lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: EntryTitle,
    pub content: EntryContent,
    pub summary: Option<EntrySummary>,
    pub category_id: Option<CategoryId>,
    pub author_id: UserId,
    pub status: EntryStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
    pub view_count: ViewCount,
    pub like_count: LikeCount,
}

impl Entry {
    /// Applies author edits and runs the pre-save lifecycle hook.
    pub fn apply_changes(&mut self, changes: &EntryChanges, now: NaiveDateTime) {
        self.title = changes.title.clone();
        self.content = changes.content.clone();
        self.summary = changes.summary.clone();
        self.category_id = changes.category_id;
        self.status = changes.status;
        self.prepare_for_save(now);
    }

    /// Pre-save hook: refreshes `updated_at` and stamps the first publication.
    pub fn prepare_for_save(&mut self, now: NaiveDateTime) {
        self.published_at = publication_timestamp(self.status, self.published_at, now);
        self.updated_at = now;
    }
}

/// Information required to create a new [`Entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: EntryTitle,
    pub content: EntryContent,
    pub summary: Option<EntrySummary>,
    pub category_id: Option<CategoryId>,
    pub author_id: UserId,
    pub status: EntryStatus,
    pub tag_ids: Vec<TagId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}

impl NewEntry {
    /// Pre-save hook mirroring [`Entry::prepare_for_save`] for inserts.
    pub fn prepare_for_save(&mut self, now: NaiveDateTime) {
        self.published_at = publication_timestamp(self.status, self.published_at, now);
        self.updated_at = now;
    }
}

/// Author-editable fields of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryChanges {
    pub title: EntryTitle,
    pub content: EntryContent,
    pub summary: Option<EntrySummary>,
    pub category_id: Option<CategoryId>,
    pub status: EntryStatus,
    pub tag_ids: Vec<TagId>,
}

/// Entry enriched with the related records needed for display.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub category: Option<Category>,
    pub author_name: Username,
    pub tags: Vec<Tag>,
}

/// Everything the detail page shows for a published entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub view: EntryView,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(seconds: i64) -> NaiveDateTime {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn sample_entry(status: EntryStatus) -> Entry {
        Entry {
            id: EntryId::new(1).unwrap(),
            title: EntryTitle::new("Rust").unwrap(),
            content: EntryContent::new("A systems language.").unwrap(),
            summary: None,
            category_id: None,
            author_id: UserId::new(1).unwrap(),
            status,
            created_at: at(0),
            updated_at: at(0),
            published_at: None,
            view_count: ViewCount::default(),
            like_count: LikeCount::default(),
        }
    }

    fn changes(status: EntryStatus) -> EntryChanges {
        EntryChanges {
            title: EntryTitle::new("Rust").unwrap(),
            content: EntryContent::new("A systems language.").unwrap(),
            summary: None,
            category_id: None,
            status,
            tag_ids: vec![],
        }
    }

    #[test]
    fn stamps_only_unstamped_published_entries() {
        assert_eq!(publication_timestamp(EntryStatus::Draft, None, at(5)), None);
        assert_eq!(
            publication_timestamp(EntryStatus::Archived, None, at(5)),
            None
        );
        assert_eq!(
            publication_timestamp(EntryStatus::Published, None, at(5)),
            Some(at(5))
        );
        assert_eq!(
            publication_timestamp(EntryStatus::Published, Some(at(1)), at(5)),
            Some(at(1))
        );
        assert_eq!(
            publication_timestamp(EntryStatus::Draft, Some(at(1)), at(5)),
            Some(at(1))
        );
    }

    #[test]
    fn lifecycle_keeps_first_publication_time() {
        let mut entry = sample_entry(EntryStatus::Draft);
        entry.prepare_for_save(at(10));
        assert_eq!(entry.published_at, None);

        entry.apply_changes(&changes(EntryStatus::Published), at(20));
        assert_eq!(entry.published_at, Some(at(20)));

        entry.apply_changes(&changes(EntryStatus::Archived), at(30));
        assert_eq!(entry.published_at, Some(at(20)));

        entry.apply_changes(&changes(EntryStatus::Published), at(40));
        assert_eq!(entry.published_at, Some(at(20)));
        assert_eq!(entry.updated_at, at(40));
    }

    #[test]
    fn new_entry_created_published_is_stamped() {
        let mut entry = NewEntry {
            title: EntryTitle::new("Rust").unwrap(),
            content: EntryContent::new("body").unwrap(),
            summary: None,
            category_id: None,
            author_id: UserId::new(1).unwrap(),
            status: EntryStatus::Published,
            tag_ids: vec![],
            created_at: at(3),
            updated_at: at(3),
            published_at: None,
        };
        entry.prepare_for_save(at(3));
        assert_eq!(entry.published_at, Some(at(3)));
    }
}
