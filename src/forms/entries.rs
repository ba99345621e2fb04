use chrono::NaiveDateTime;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::entry::{EntryChanges, NewEntry};
use crate::domain::types::{
    CategoryId, EntryContent, EntryStatus, EntrySummary, EntryTitle, TagId, TypeConstraintError,
    UserId,
};

/// Create/edit entry form.
///
/// Browsers submit the tag multi-select as repeated `tags` keys, so the form
/// is decoded from raw key/value pairs with [`EntryForm::from_pairs`].
#[derive(Debug, Default, Validate)]
pub struct EntryForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 500))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub category: Option<i32>,
    pub tags: Vec<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum EntryFormError {
    #[error("Entry form validation failed: {0}")]
    Validation(String),
    #[error("Entry form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Entry form field `{0}` is malformed")]
    Malformed(&'static str),
}

impl From<ValidationErrors> for EntryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for EntryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl EntryForm {
    /// Collect form fields from urlencoded pairs. Blank `category` means no
    /// category; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, EntryFormError> {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value,
                "summary" => form.summary = value,
                "content" => form.content = value,
                "status" => form.status = Some(value),
                "category" if value.trim().is_empty() => form.category = None,
                "category" => {
                    form.category = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| EntryFormError::Malformed("category"))?,
                    )
                }
                "tags" => form.tags.push(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| EntryFormError::Malformed("tags"))?,
                ),
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Validated content of an [`EntryForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFormPayload {
    pub title: EntryTitle,
    pub summary: Option<EntrySummary>,
    pub content: EntryContent,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Vec<TagId>,
    pub status: EntryStatus,
}

impl EntryFormPayload {
    pub fn into_new_entry(self, author_id: UserId, now: NaiveDateTime) -> NewEntry {
        NewEntry {
            title: self.title,
            content: self.content,
            summary: self.summary,
            category_id: self.category_id,
            author_id,
            status: self.status,
            tag_ids: self.tag_ids,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn into_changes(self) -> EntryChanges {
        EntryChanges {
            title: self.title,
            content: self.content,
            summary: self.summary,
            category_id: self.category_id,
            status: self.status,
            tag_ids: self.tag_ids,
        }
    }
}

impl TryFrom<EntryForm> for EntryFormPayload {
    type Error = EntryFormError;

    fn try_from(value: EntryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let summary = if value.summary.trim().is_empty() {
            None
        } else {
            Some(EntrySummary::new(value.summary)?)
        };

        let status = match value.status.as_deref() {
            None | Some("") => EntryStatus::default(),
            Some(status) => EntryStatus::try_from(status)?,
        };

        Ok(Self {
            title: EntryTitle::new(value.title)?,
            summary,
            content: EntryContent::new(value.content)?,
            category_id: value.category.map(CategoryId::new).transpose()?,
            tag_ids: value
                .tags
                .into_iter()
                .map(TagId::new)
                .collect::<Result<Vec<_>, _>>()?,
            status,
        })
    }
}
