use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryWithCount, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::entry::{Entry, EntryChanges, EntryView, NewEntry};
use crate::domain::tag::{NewTag, Tag, TagWithCount};
use crate::domain::types::{CategoryId, EntryId, EntryStatus, TagId, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::pagination::Pagination;

pub mod category;
pub mod comment;
pub mod entry;
pub mod errors;
pub mod tag;
pub mod user;

use errors::RepositoryResult;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryListQuery {
    /// Restrict to a single lifecycle status.
    pub status: Option<EntryStatus>,
    /// Case-insensitive substring matched against title, content and summary.
    pub search: Option<String>,
    /// Filter by category identifier.
    pub category_id: Option<CategoryId>,
    /// Restrict to entries carrying a tag.
    pub tag_id: Option<TagId>,
    /// Filter by author.
    pub author_id: Option<UserId>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl EntryListQuery {
    /// Query over published entries only.
    pub fn published() -> Self {
        Self {
            status: Some(EntryStatus::Published),
            ..Self::default()
        }
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn tag(mut self, tag_id: TagId) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
    pub fn author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new user. Duplicate usernames fail with a conflict.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// All categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// All categories ordered by name with their published entry counts.
    fn list_categories_with_counts(&self) -> RepositoryResult<Vec<CategoryWithCount>>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Delete a category; its entries stay with no category.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for tag entities.
pub trait TagReader {
    /// All tags ordered by name.
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    /// All tags ordered by name with their published entry counts.
    fn list_tags_with_counts(&self) -> RepositoryResult<Vec<TagWithCount>>;
    /// Tags among `ids` that exist.
    fn get_tags_by_ids(&self, ids: &[TagId]) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations for tag entities.
pub trait TagWriter {
    /// Persist a new tag. Duplicate names fail with a conflict.
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag>;
}

/// Read-only operations for entries.
pub trait EntryReader {
    /// List entries matching the query, newest first. Returns the total
    /// number of matches together with the requested page.
    fn list_entries(&self, query: EntryListQuery) -> RepositoryResult<(usize, Vec<EntryView>)>;
    /// Published entry by id, without counting a view.
    fn get_published_entry(&self, id: EntryId) -> RepositoryResult<Option<Entry>>;
    /// Look up an entry by the (id, author) pair used by the ownership gate.
    fn get_entry_for_author(
        &self,
        id: EntryId,
        author_id: UserId,
    ) -> RepositoryResult<Option<EntryView>>;
}

/// Write operations for entries.
pub trait EntryWriter {
    /// Insert an entry with its tags, running the pre-save lifecycle hook.
    fn create_entry(&self, entry: &NewEntry) -> RepositoryResult<Entry>;
    /// Apply `changes` to the entry owned by `author_id`, running the
    /// pre-save lifecycle hook. Returns `None` when no such entry exists.
    fn update_entry(
        &self,
        id: EntryId,
        author_id: UserId,
        changes: &EntryChanges,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<Entry>>;
    /// Delete the entry owned by `author_id`, returning the affected rows.
    fn delete_entry(&self, id: EntryId, author_id: UserId) -> RepositoryResult<usize>;
    /// Count one view of a published entry and return it. Returns `None`
    /// when the entry does not exist or is not published.
    fn view_published_entry(&self, id: EntryId) -> RepositoryResult<Option<EntryView>>;
    /// Count one like of a published entry, returning the affected rows.
    fn like_published_entry(&self, id: EntryId) -> RepositoryResult<usize>;
}

/// Read-only operations for comments.
pub trait CommentReader {
    /// Comments without a parent on `entry_id`, newest first.
    fn list_top_level_comments(&self, entry_id: EntryId) -> RepositoryResult<Vec<Comment>>;
}

/// Write operations for comments.
pub trait CommentWriter {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
}
