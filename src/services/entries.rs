//! Entry browsing, authoring and the ownership gate.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::entry::{Entry, EntryDetail, EntryView};
use crate::domain::tag::Tag;
use crate::domain::types::{CategoryId, EntryId, TagId};
use crate::forms::entries::EntryFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, Pagination};
use crate::repository::{
    CategoryReader, CommentReader, EntryListQuery, EntryReader, EntryWriter, TagReader,
};

use super::{ServiceError, ServiceResult};

/// Filters accepted by the public entry listing.
///
/// Identifiers that are not positive are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilters {
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub page: usize,
}

/// Published entries matching `filters`, newest first, one page at a time.
///
/// Out-of-range pages clamp to the first or last page.
pub fn list_entries<R>(filters: &EntryFilters, repo: &R) -> ServiceResult<Paginated<EntryView>>
where
    R: EntryReader,
{
    let mut query = EntryListQuery::published();

    if let Some(search) = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        query = query.search(search);
    }
    if let Some(category_id) = filters.category_id.and_then(|id| CategoryId::new(id).ok()) {
        query = query.category(category_id);
    }
    if let Some(tag_id) = filters.tag_id.and_then(|id| TagId::new(id).ok()) {
        query = query.tag(tag_id);
    }

    let pagination = Pagination {
        page: filters.page,
        per_page: DEFAULT_ITEMS_PER_PAGE,
    };
    let query = query.paginate(pagination.page, pagination.per_page);

    match repo.list_entries(query) {
        Ok((total, entries)) => Ok(Paginated::new(entries, pagination, total)),
        Err(e) => {
            log::error!("Failed to list entries: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Published entry with its top-level comments. Counts one view.
pub fn show_entry<R>(entry_id: i32, repo: &R) -> ServiceResult<EntryDetail>
where
    R: EntryWriter + CommentReader,
{
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    let view = match repo.view_published_entry(entry_id) {
        Ok(Some(view)) => view,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load entry {entry_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let comments = match repo.list_top_level_comments(entry_id) {
        Ok(comments) => comments,
        Err(e) => {
            log::error!("Failed to list comments of entry {entry_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(EntryDetail { view, comments })
}

/// Every entry written by `user`, in any status, newest first.
pub fn list_my_entries<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<EntryView>>
where
    R: EntryReader,
{
    match repo.list_entries(EntryListQuery::default().author(user.id)) {
        Ok((_total, entries)) => Ok(entries),
        Err(e) => {
            log::error!("Failed to list entries of user {}: {e}", user.id);
            Err(ServiceError::Internal)
        }
    }
}

/// Categories and tags offered by the entry form.
pub fn entry_form_options<R>(repo: &R) -> ServiceResult<(Vec<Category>, Vec<Tag>)>
where
    R: CategoryReader + TagReader,
{
    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let tags = repo.list_tags().map_err(|e| {
        log::error!("Failed to list tags: {e}");
        ServiceError::Internal
    })?;
    Ok((categories, tags))
}

/// Rejects payloads that reference a missing category or tag.
fn ensure_references_exist<R>(payload: &EntryFormPayload, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + TagReader,
{
    if let Some(category_id) = payload.category_id {
        match repo.get_category_by_id(category_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ServiceError::Validation(format!(
                    "Category {category_id} does not exist"
                )));
            }
            Err(e) => {
                log::error!("Failed to get category: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    if payload.tag_ids.is_empty() {
        return Ok(());
    }

    let found = repo.get_tags_by_ids(&payload.tag_ids).map_err(|e| {
        log::error!("Failed to get tags: {e}");
        ServiceError::Internal
    })?;
    match payload
        .tag_ids
        .iter()
        .find(|id| !found.iter().any(|tag| tag.id == **id))
    {
        Some(missing) => Err(ServiceError::Validation(format!(
            "Tag {missing} does not exist"
        ))),
        None => Ok(()),
    }
}

/// Create an entry authored by `user`.
pub fn create_entry<R>(
    payload: EntryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Entry>
where
    R: EntryWriter + CategoryReader + TagReader,
{
    ensure_references_exist(&payload, repo)?;

    let new_entry = payload.into_new_entry(user.id, Utc::now().naive_utc());
    match repo.create_entry(&new_entry) {
        Ok(entry) => {
            log::info!("User {} created entry {}", user.id, entry.id);
            Ok(entry)
        }
        Err(e) => {
            log::error!("Failed to create entry: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Entry owned by `user`, for the edit form and the delete confirmation.
///
/// Entries of other authors are reported exactly like missing ones.
pub fn get_owned_entry<R>(
    entry_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<EntryView>
where
    R: EntryReader,
{
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_entry_for_author(entry_id, user.id) {
        Ok(Some(entry)) => Ok(entry),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get entry {entry_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Apply an edit to an entry owned by `user`.
pub fn update_entry<R>(
    entry_id: i32,
    payload: EntryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Entry>
where
    R: EntryWriter + CategoryReader + TagReader,
{
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    ensure_references_exist(&payload, repo)?;

    let changes = payload.into_changes();
    match repo.update_entry(entry_id, user.id, &changes, Utc::now().naive_utc()) {
        Ok(Some(entry)) => Ok(entry),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update entry {entry_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete an entry owned by `user` together with its tags and comments.
pub fn delete_entry<R>(entry_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: EntryWriter,
{
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    match repo.delete_entry(entry_id, user.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("User {} deleted entry {entry_id}", user.id);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete entry {entry_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Count one like of a published entry.
pub fn like_entry<R>(entry_id: i32, repo: &R) -> ServiceResult<()>
where
    R: EntryWriter,
{
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    match repo.like_published_entry(entry_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to like entry {entry_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
