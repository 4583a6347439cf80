//! Pagination query extractor

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::domain::{Pagination, PaginationParams};

use super::error::ApiError;

const INVALID_PAGINATION: &str = "Invalid limit or offset.";

/// `?limit=&offset=` parsed into a validated [`Pagination`]
#[derive(Debug, Clone, Copy)]
pub struct Page(pub Pagination);

impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request(INVALID_PAGINATION))?;

        Pagination::try_from(params)
            .map(Page)
            .map_err(ApiError::from)
    }
}
