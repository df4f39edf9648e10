use serde::{Deserialize, Serialize};
use validator::Validate;

/// Page size used when a listing request does not give a `limit`.
pub const DEFAULT_LIMIT: i64 = 100;

/// A `limit`/`offset` window over an ordered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Paging {
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

impl Paging {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}
