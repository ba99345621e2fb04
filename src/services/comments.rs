use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::EntryId;
use crate::forms::comments::{CommentForm, CommentFormPayload};
use crate::repository::{CommentWriter, EntryReader};

use super::{ServiceError, ServiceResult};

/// Leave a top-level comment on a published entry.
///
/// Anonymous callers get `Unauthenticated`, invalid content `Validation`
/// and unpublished or missing entries `NotFound`; none of them store a row.
pub fn post_comment<R>(
    entry_id: i32,
    form: CommentForm,
    user: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: EntryReader + CommentWriter,
{
    let user = user.ok_or(ServiceError::Unauthenticated)?;
    let payload = CommentFormPayload::try_from(form)?;
    let entry_id = EntryId::new(entry_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_published_entry(entry_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get entry {entry_id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let comment = NewComment {
        entry_id,
        author_id: user.id,
        content: payload.content,
        created_at: Utc::now().naive_utc(),
        parent_id: None,
    };

    repo.create_comment(&comment).map_err(|e| {
        log::error!("Failed to create comment on entry {entry_id}: {e}");
        ServiceError::Internal
    })
}
