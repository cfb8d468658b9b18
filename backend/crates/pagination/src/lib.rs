//! Page-window pagination primitives shared by AECO list endpoints.
//!
//! Inbound adapters deserialise raw [`PageParams`] from the query string and
//! normalise them into a [`PageRequest`]. Defaults are applied and the page
//! size is capped so a single request cannot pull an unbounded result set.
//! Responses wrap the selected items in a [`Paginated`] envelope carrying the
//! total count so clients can render pagination controls.

use serde::{Deserialize, Serialize};

/// Page number used when the client does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Upper bound applied to client-supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while normalising pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

/// Raw pagination parameters as received from a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Requested number of items per page.
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Normalise the parameters into a validated [`PageRequest`].
    ///
    /// Missing values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_PAGE_SIZE`];
    /// page sizes above [`MAX_PAGE_SIZE`] are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] when either value is zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageParams, MAX_PAGE_SIZE};
    ///
    /// let request = PageParams { page: Some(2), page_size: Some(500) }
    ///     .normalise()
    ///     .expect("valid params");
    /// assert_eq!(request.page(), 2);
    /// assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    /// ```
    pub fn normalise(self) -> Result<PageRequest, PageError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        PageRequest::new(page, page_size.min(MAX_PAGE_SIZE))
    }
}

/// Validated page window.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE` when built through [`PageParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Construct a page window.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] when `page` or `page_size` is zero.
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        Ok(Self { page, page_size })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items to skip before the window starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// List envelope returned by paginated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items in the requested window.
    pub items: Vec<T>,
    /// Total number of items matching the query across all pages.
    pub total: u64,
    /// One-based page number of this window.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Number of pages needed to cover `total` at this page size.
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Wrap a window of items with its pagination metadata.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let size = u64::from(request.page_size());
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: total.div_ceil(size),
        }
    }
}
