use serde::{Deserialize, Serialize};

use crate::domain::types::{TagId, TagName};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTag {
    pub name: TagName,
}

/// Tag together with the number of published entries carrying it.
#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub entry_count: usize,
}
