//! Page-number pagination shared by every list endpoint.

use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

use crate::api::request_result::RequestError;
use crate::config::{Config, PaginationConfig};

const INVALID_PAGE: &str = "Invalid page.";

/// Requested page, read from `?page=` and `?per_page=`.
///
/// `page` is 1-based. `per_page` falls back to the configured default when
/// absent or zero and is clamped to the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl Pagination {
    /// # Errors
    /// Rejects page 0.
    pub fn new(
        page: Option<u64>,
        per_page: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, RequestError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(RequestError::bad_request(INVALID_PAGE));
        }

        let per_page = match per_page {
            Some(0) | None => config.default_page_size,
            Some(size) => size,
        }
        .clamp(1, config.max_page_size.max(1));

        Ok(Self { page, per_page })
    }

    /// Run `query` for the requested page.
    ///
    /// # Errors
    /// `NotFound` when the page lies past the last one (page 1 of an empty
    /// result is an empty page, not an error).
    pub async fn fetch<E, C>(
        self,
        db: &C,
        query: Select<E>,
    ) -> Result<Page<E::Model>, RequestError>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Send + Sync + 'static,
        C: ConnectionTrait,
    {
        let paginator = query.paginate(db, self.per_page);
        let count = paginator.num_items().await?;
        let last_page = count.div_ceil(self.per_page).max(1);

        if self.page > last_page {
            return Err(RequestError::NotFound);
        }

        let results = paginator.fetch_page(self.page - 1).await?;

        Ok(Page {
            count,
            next: (self.page < last_page).then_some(self.page + 1),
            previous: (self.page > 1).then_some(self.page - 1),
            results,
        })
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
    Config: FromRef<S>,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| RequestError::bad_request(INVALID_PAGE))?;

        let config = Config::from_ref(state);

        Self::new(query.page, query.per_page, &config.pagination)
    }
}

/// One page of results plus navigation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
