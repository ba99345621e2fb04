use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::db::unicode_lower;
use crate::domain::category::Category;
use crate::domain::entry::{Entry, EntryChanges, EntryView, NewEntry};
use crate::domain::tag::Tag;
use crate::domain::types::{EntryId, EntryStatus, TagId, TagName, UserId, Username};
use crate::models::category::Category as DbCategory;
use crate::models::entry::{Entry as DbEntry, EntryChangeset, NewEntry as DbNewEntry};
use crate::models::tag::EntryTag;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, EntryListQuery, EntryReader, EntryWriter};

/// Escape `LIKE` wildcards so user input only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unique_tag_ids(tag_ids: &[TagId]) -> Vec<i32> {
    tag_ids
        .iter()
        .map(|id| id.get())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn replace_tags(conn: &mut SqliteConnection, entry_id: i32, tag_ids: &[TagId]) -> QueryResult<()> {
    use crate::schema::entry_tags;

    diesel::delete(entry_tags::table.filter(entry_tags::entry_id.eq(entry_id))).execute(conn)?;

    let rows: Vec<EntryTag> = unique_tag_ids(tag_ids)
        .into_iter()
        .map(|tag_id| EntryTag { entry_id, tag_id })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(entry_tags::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

/// Attach category, author name and tags to a batch of entry rows, keeping
/// the order of `rows`.
fn load_views(conn: &mut SqliteConnection, rows: Vec<DbEntry>) -> RepositoryResult<Vec<EntryView>> {
    use crate::schema::{categories, entry_tags, tags, users};

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let entry_ids: Vec<i32> = rows.iter().map(|e| e.id).collect();
    let category_ids: Vec<i32> = rows
        .iter()
        .filter_map(|e| e.category_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let author_ids: Vec<i32> = rows
        .iter()
        .map(|e| e.author_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let categories: HashMap<i32, Category> = categories::table
        .filter(categories::id.eq_any(category_ids))
        .load::<DbCategory>(conn)?
        .into_iter()
        .map(|c| Category::try_from(c).map(|category| (category.id.get(), category)))
        .collect::<Result<_, _>>()?;

    let authors: HashMap<i32, String> = users::table
        .filter(users::id.eq_any(author_ids))
        .select((users::id, users::username))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    let mut tags_by_entry: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (entry_id, tag_id, name) in entry_tags::table
        .inner_join(tags::table)
        .filter(entry_tags::entry_id.eq_any(entry_ids))
        .order(tags::name.asc())
        .select((entry_tags::entry_id, tags::id, tags::name))
        .load::<(i32, i32, String)>(conn)?
    {
        tags_by_entry.entry(entry_id).or_default().push(Tag {
            id: TagId::new(tag_id)?,
            name: TagName::new(name)?,
        });
    }

    rows.into_iter()
        .map(|row| -> RepositoryResult<EntryView> {
            let entry = Entry::try_from(row)?;
            let author_name = authors.get(&entry.author_id.get()).ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "entry {} references missing author {}",
                    entry.id, entry.author_id
                ))
            })?;
            Ok(EntryView {
                category: entry
                    .category_id
                    .and_then(|id| categories.get(&id.get()).cloned()),
                author_name: Username::new(author_name.as_str())?,
                tags: tags_by_entry.remove(&entry.id.get()).unwrap_or_default(),
                entry,
            })
        })
        .collect()
}

impl EntryReader for DieselRepository {
    fn list_entries(&self, query: EntryListQuery) -> RepositoryResult<(usize, Vec<EntryView>)> {
        use crate::schema::{entries, entry_tags};

        let mut conn = self.conn()?;

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

        let query_builder = || {
            let mut items = entries::table.into_boxed::<Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(entries::status.eq(status.as_str()));
            }

            if let Some(pattern) = &search {
                items = items.filter(
                    unicode_lower(entries::title.nullable())
                        .like(pattern.clone())
                        .escape('\\')
                        .or(unicode_lower(entries::content.nullable())
                            .like(pattern.clone())
                            .escape('\\'))
                        .or(unicode_lower(entries::summary.nullable()).like(pattern.clone()).escape('\\')),
                );
            }

            if let Some(category_id) = query.category_id {
                items = items.filter(entries::category_id.eq(category_id.get()));
            }

            if let Some(tag_id) = query.tag_id {
                items = items.filter(
                    entries::id.eq_any(
                        entry_tags::table
                            .filter(entry_tags::tag_id.eq(tag_id.get()))
                            .select(entry_tags::entry_id),
                    ),
                );
            }

            if let Some(author_id) = query.author_id {
                items = items.filter(entries::author_id.eq(author_id.get()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            let offset = pagination.offset(total) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order((entries::created_at.desc(), entries::id.desc()))
            .load::<DbEntry>(&mut conn)?;

        Ok((total, load_views(&mut conn, rows)?))
    }

    fn get_published_entry(&self, id: EntryId) -> RepositoryResult<Option<Entry>> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        let row = entries::table
            .filter(entries::id.eq(id.get()))
            .filter(entries::status.eq(EntryStatus::Published.as_str()))
            .first::<DbEntry>(&mut conn)
            .optional()?;

        Ok(row.map(Entry::try_from).transpose()?)
    }

    fn get_entry_for_author(
        &self,
        id: EntryId,
        author_id: UserId,
    ) -> RepositoryResult<Option<EntryView>> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        let row = entries::table
            .filter(entries::id.eq(id.get()))
            .filter(entries::author_id.eq(author_id.get()))
            .first::<DbEntry>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(load_views(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }
}

impl EntryWriter for DieselRepository {
    fn create_entry(&self, entry: &NewEntry) -> RepositoryResult<Entry> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        let mut entry = entry.clone();
        entry.prepare_for_save(entry.created_at);

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let db_entry: DbNewEntry = (&entry).into();
            let created = diesel::insert_into(entries::table)
                .values(&db_entry)
                .get_result::<DbEntry>(conn)?;

            replace_tags(conn, created.id, &entry.tag_ids)?;

            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_entry(
        &self,
        id: EntryId,
        author_id: UserId,
        changes: &EntryChanges,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<Entry>> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = entries::table
                .filter(entries::id.eq(id.get()))
                .filter(entries::author_id.eq(author_id.get()))
                .first::<DbEntry>(conn)
                .optional()?;

            let Some(row) = row else {
                return Ok(None);
            };

            let mut entry = Entry::try_from(row)?;
            entry.apply_changes(changes, now);

            diesel::update(entries::table.filter(entries::id.eq(entry.id.get())))
                .set(EntryChangeset::from(&entry))
                .execute(conn)?;

            replace_tags(conn, entry.id.get(), &changes.tag_ids)?;

            Ok(Some(entry))
        })
    }

    fn delete_entry(&self, id: EntryId, author_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::{comments, entries, entry_tags};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            let owned = entries::table
                .filter(entries::id.eq(id.get()))
                .filter(entries::author_id.eq(author_id.get()))
                .select(entries::id)
                .first::<i32>(conn)
                .optional()?;

            let Some(entry_id) = owned else {
                return Ok(0);
            };

            diesel::delete(comments::table.filter(comments::entry_id.eq(entry_id)))
                .execute(conn)?;
            diesel::delete(entry_tags::table.filter(entry_tags::entry_id.eq(entry_id)))
                .execute(conn)?;
            Ok(diesel::delete(entries::table.filter(entries::id.eq(entry_id))).execute(conn)?)
        })?;

        Ok(affected)
    }

    fn view_published_entry(&self, id: EntryId) -> RepositoryResult<Option<EntryView>> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(
                entries::table
                    .filter(entries::id.eq(id.get()))
                    .filter(entries::status.eq(EntryStatus::Published.as_str())),
            )
            .set(entries::view_count.eq(entries::view_count + 1))
            .execute(conn)?;

            if affected == 0 {
                return Ok(None);
            }

            let row = entries::table
                .filter(entries::id.eq(id.get()))
                .first::<DbEntry>(conn)?;

            Ok(load_views(conn, vec![row])?.pop())
        })
    }

    fn like_published_entry(&self, id: EntryId) -> RepositoryResult<usize> {
        use crate::schema::entries;

        let mut conn = self.conn()?;

        let affected = diesel::update(
            entries::table
                .filter(entries::id.eq(id.get()))
                .filter(entries::status.eq(EntryStatus::Published.as_str())),
        )
        .set(entries::like_count.eq(entries::like_count + 1))
        .execute(&mut conn)?;

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("rust"), "rust");
    }

    #[test]
    fn deduplicates_tag_ids() {
        let ids = [
            TagId::new(3).unwrap(),
            TagId::new(1).unwrap(),
            TagId::new(3).unwrap(),
        ];
        assert_eq!(unique_tag_ids(&ids), vec![1, 3]);
    }
}
