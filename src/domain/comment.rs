use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentContent, CommentId, EntryId, UserId, Username};

/// Comment left on an entry.
///
/// Replies reference their parent through `parent_id`; a comment without a
/// parent is a top-level comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub author_name: Username,
    pub content: CommentContent,
    pub created_at: NaiveDateTime,
    pub parent_id: Option<CommentId>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub entry_id: EntryId,
    pub author_id: UserId,
    pub content: CommentContent,
    pub created_at: NaiveDateTime,
    pub parent_id: Option<CommentId>,
}
