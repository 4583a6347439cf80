//! Limit/offset paging for list endpoints

use serde::Deserialize;

use super::DomainError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

const INVALID_PAGINATION: &str = "Invalid limit or offset.";

/// Raw query string values before parsing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Pagination {
    /// Builds a window; limit must be positive and offset non-negative
    pub fn new(limit: i64, offset: i64) -> Result<Self, DomainError> {
        if limit <= 0 || offset < 0 {
            return Err(DomainError::invalid_request(INVALID_PAGINATION));
        }

        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Applies the window to an already ordered sequence
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = DomainError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let limit = parse_or(params.limit.as_deref(), DEFAULT_LIMIT)?;
        let offset = parse_or(params.offset.as_deref(), DEFAULT_OFFSET)?;

        Self::new(limit, offset)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> Result<i64, DomainError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::invalid_request(INVALID_PAGINATION)),
    }
}
