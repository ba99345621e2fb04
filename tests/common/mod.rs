//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use encyclopedia::db::{DbPool, establish_connection_pool};
use encyclopedia::domain::category::{Category, NewCategory};
use encyclopedia::domain::entry::{Entry, NewEntry};
use encyclopedia::domain::tag::{NewTag, Tag};
use encyclopedia::domain::types::{
    CategoryId, CategoryName, EntryContent, EntryStatus, EntryTitle, TagId, TagName, UserId,
    Username,
};
use encyclopedia::domain::user::{NewUser, User};
use encyclopedia::repository::{
    CategoryWriter, DieselRepository, EntryWriter, TagWriter, UserWriter,
};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Fixed timestamp `seconds` after the epoch.
pub fn at(seconds: i64) -> NaiveDateTime {
    DateTime::from_timestamp(seconds, 0)
        .expect("valid timestamp")
        .naive_utc()
}

pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        password_hash: "not-a-real-hash".into(),
        created_at: at(0),
    })
    .expect("should create user")
}

pub fn create_category(repo: &DieselRepository, name: &str) -> Category {
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).expect("valid category name"),
        description: String::new(),
        created_at: at(0),
    })
    .expect("should create category")
}

pub fn create_tag(repo: &DieselRepository, name: &str) -> Tag {
    repo.create_tag(&NewTag {
        name: TagName::new(name).expect("valid tag name"),
    })
    .expect("should create tag")
}

/// Builder-ish description of an entry to insert.
pub struct EntrySeed<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub status: EntryStatus,
    pub author: UserId,
    pub category: Option<CategoryId>,
    pub tags: Vec<TagId>,
    pub created: i64,
}

impl<'a> EntrySeed<'a> {
    pub fn new(title: &'a str, status: EntryStatus, author: UserId, created: i64) -> Self {
        Self {
            title,
            content: "Lorem ipsum",
            status,
            author,
            category: None,
            tags: vec![],
            created,
        }
    }

    pub fn content(mut self, content: &'a str) -> Self {
        self.content = content;
        self
    }

    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags(mut self, tags: Vec<TagId>) -> Self {
        self.tags = tags;
        self
    }

    pub fn insert(self, repo: &DieselRepository) -> Entry {
        repo.create_entry(&NewEntry {
            title: EntryTitle::new(self.title).expect("valid title"),
            content: EntryContent::new(self.content).expect("valid content"),
            summary: None,
            category_id: self.category,
            author_id: self.author,
            status: self.status,
            tag_ids: self.tags,
            created_at: at(self.created),
            updated_at: at(self.created),
            published_at: None,
        })
        .expect("should create entry")
    }
}
