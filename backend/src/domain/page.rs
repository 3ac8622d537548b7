//! Page parameters handed to the upstream sources.
//!
//! Parsing and defaulting belong to the inbound adapter; these types only
//! guarantee that what reaches a source is already in range.

use std::num::NonZeroU32;

use super::UserId;

/// Page number used when a caller omits one.
pub const DEFAULT_PAGE_NUM: u32 = 1;
/// Page size used when a caller omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Validation errors for [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestValidationError {
    /// Page numbers start at 1.
    #[error("page_num must be at least 1")]
    ZeroPageNum,
    /// Pages hold at least one record.
    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

/// One-based page coordinates.
///
/// # Examples
/// ```
/// use public_api::domain::PageRequest;
///
/// let page = PageRequest::new(2, 25).expect("valid page");
/// assert_eq!(page.page_num(), 2);
/// assert!(PageRequest::new(0, 25).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_num: NonZeroU32,
    page_size: NonZeroU32,
}

impl PageRequest {
    /// Validate page coordinates.
    pub fn new(page_num: u32, page_size: u32) -> Result<Self, PageRequestValidationError> {
        let page_num = NonZeroU32::new(page_num).ok_or(PageRequestValidationError::ZeroPageNum)?;
        let page_size =
            NonZeroU32::new(page_size).ok_or(PageRequestValidationError::ZeroPageSize)?;
        Ok(Self {
            page_num,
            page_size,
        })
    }

    /// One-based page number.
    #[must_use]
    pub fn page_num(&self) -> u32 {
        self.page_num.get()
    }

    /// Maximum records in the page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_num: NonZeroU32::MIN,
            page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Listing page request with an optional owner filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingQuery {
    /// Page coordinates.
    pub page: PageRequest,
    /// Restrict the page to listings owned by this user.
    pub user_filter: Option<UserId>,
}

impl ListingQuery {
    /// Query one page of listings regardless of owner.
    #[must_use]
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            user_filter: None,
        }
    }

    /// Restrict the query to one owner.
    #[must_use]
    pub fn with_user_filter(mut self, user_id: UserId) -> Self {
        self.user_filter = Some(user_id);
        self
    }
}
