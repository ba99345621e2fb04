use crate::domain::tag::TagWithCount;
use crate::repository::TagReader;

use super::{ServiceError, ServiceResult};

/// All tags ordered by name with their published entry counts.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<TagWithCount>>
where
    R: TagReader,
{
    repo.list_tags_with_counts().map_err(|e| {
        log::error!("Failed to list tags: {e}");
        ServiceError::Internal
    })
}
