use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::entry::{Entry as DomainEntry, NewEntry as DomainNewEntry};
use crate::domain::types::{
    CategoryId, EntryContent, EntryStatus, EntrySummary, EntryTitle, LikeCount,
    TypeConstraintError, ViewCount,
};

/// Diesel model representing the `entries` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::entries)]
pub struct Entry {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category_id: Option<i32>,
    pub author_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
    pub view_count: i32,
    pub like_count: i32,
}

/// Insertable form of [`Entry`]. Counters start at their column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::entries)]
pub struct NewEntry<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub summary: &'a str,
    pub category_id: Option<i32>,
    pub author_id: i32,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}

/// Columns rewritten when an author saves an entry.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::entries)]
#[diesel(treat_none_as_null = true)]
pub struct EntryChangeset<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub summary: &'a str,
    pub category_id: Option<i32>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}

/// Blank summaries are stored as empty strings.
fn summary_column(summary: Option<&EntrySummary>) -> &str {
    summary.map(EntrySummary::as_str).unwrap_or_default()
}

impl TryFrom<Entry> for DomainEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: Entry) -> Result<Self, Self::Error> {
        let summary = if entry.summary.trim().is_empty() {
            None
        } else {
            Some(EntrySummary::new(entry.summary)?)
        };

        Ok(Self {
            id: entry.id.try_into()?,
            title: EntryTitle::new(entry.title)?,
            content: EntryContent::new(entry.content)?,
            summary,
            category_id: entry.category_id.map(CategoryId::new).transpose()?,
            author_id: entry.author_id.try_into()?,
            status: EntryStatus::try_from(entry.status)?,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            published_at: entry.published_at,
            view_count: ViewCount::new(entry.view_count)?,
            like_count: LikeCount::new(entry.like_count)?,
        })
    }
}

impl<'a> From<&'a DomainNewEntry> for NewEntry<'a> {
    fn from(entry: &'a DomainNewEntry) -> Self {
        Self {
            title: entry.title.as_str(),
            content: entry.content.as_str(),
            summary: summary_column(entry.summary.as_ref()),
            category_id: entry.category_id.map(CategoryId::get),
            author_id: entry.author_id.get(),
            status: entry.status.as_str(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            published_at: entry.published_at,
        }
    }
}

impl<'a> From<&'a DomainEntry> for EntryChangeset<'a> {
    fn from(entry: &'a DomainEntry) -> Self {
        Self {
            title: entry.title.as_str(),
            content: entry.content.as_str(),
            summary: summary_column(entry.summary.as_ref()),
            category_id: entry.category_id.map(CategoryId::get),
            status: entry.status.as_str(),
            updated_at: entry.updated_at,
            published_at: entry.published_at,
        }
    }
}
