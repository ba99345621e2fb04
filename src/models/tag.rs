use diesel::prelude::*;

use crate::domain::tag::Tag as DomainTag;
use crate::domain::types::{TagName, TypeConstraintError};

/// Diesel model representing the `tags` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tags)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
}

/// Row of the `entry_tags` join table.
#[derive(Debug, Clone, Copy, Insertable, Queryable)]
#[diesel(table_name = crate::schema::entry_tags)]
pub struct EntryTag {
    pub entry_id: i32,
    pub tag_id: i32,
}

impl TryFrom<Tag> for DomainTag {
    type Error = TypeConstraintError;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        Ok(Self {
            id: tag.id.try_into()?,
            name: TagName::new(tag.name)?,
        })
    }
}
