use crate::domain::category::CategoryWithCount;
use crate::repository::CategoryReader;

use super::{ServiceError, ServiceResult};

/// All categories ordered by name with their published entry counts.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryWithCount>>
where
    R: CategoryReader,
{
    match repo.list_categories_with_counts() {
        Ok(categories) => Ok(categories),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}
