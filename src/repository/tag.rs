use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::tag::{NewTag, Tag, TagWithCount};
use crate::domain::types::{EntryStatus, TagId};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let items = tags::table
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Tag>, _>>()?;

        Ok(items)
    }

    fn list_tags_with_counts(&self) -> RepositoryResult<Vec<TagWithCount>> {
        use crate::schema::{entries, entry_tags};

        let tags = self.list_tags()?;

        let mut conn = self.conn()?;
        let counts: HashMap<i32, i64> = entry_tags::table
            .inner_join(entries::table)
            .filter(entries::status.eq(EntryStatus::Published.as_str()))
            .group_by(entry_tags::tag_id)
            .select((entry_tags::tag_id, diesel::dsl::count_star()))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        Ok(tags
            .into_iter()
            .map(|tag| {
                let entry_count = counts.get(&tag.id.get()).copied().unwrap_or(0) as usize;
                TagWithCount { tag, entry_count }
            })
            .collect())
    }

    fn get_tags_by_ids(&self, ids: &[TagId]) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::tags;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();

        let items = tags::table
            .filter(tags::id.eq_any(raw_ids))
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Tag>, _>>()?;

        Ok(items)
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, tag: &NewTag) -> RepositoryResult<Tag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(tags::table)
            .values(DbNewTag {
                name: tag.name.as_str(),
            })
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
