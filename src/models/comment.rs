use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentContent, CommentId, TypeConstraintError, Username};

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub entry_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub entry_id: i32,
    pub author_id: i32,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
    pub parent_id: Option<i32>,
}

/// Comment row joined with its author's username.
impl TryFrom<(Comment, String)> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from((comment, author_name): (Comment, String)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            entry_id: comment.entry_id.try_into()?,
            author_id: comment.author_id.try_into()?,
            author_name: Username::new(author_name)?,
            content: CommentContent::new(comment.content)?,
            created_at: comment.created_at,
            parent_id: comment.parent_id.map(CommentId::new).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewComment> for NewComment<'a> {
    fn from(comment: &'a DomainNewComment) -> Self {
        Self {
            entry_id: comment.entry_id.get(),
            author_id: comment.author_id.get(),
            content: comment.content.as_str(),
            created_at: comment.created_at,
            parent_id: comment.parent_id.map(CommentId::get),
        }
    }
}
