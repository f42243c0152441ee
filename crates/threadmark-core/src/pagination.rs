use thiserror::Error;

/// Sentinel returned by the query methods for out-of-range pages or items.
pub const OUT_OF_RANGE: i64 = -1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PagerError {
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Read-only page arithmetic over a fixed sequence of items.
///
/// A `Pager` owns its items and page size for its whole lifetime; every query
/// is a pure function of those two inputs. Range violations answer with
/// [`OUT_OF_RANGE`] instead of failing — the only rejected input is a zero
/// page size at construction, which would poison every later division.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    items: Vec<T>,
    page_size: usize,
}

impl<T> Pager<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Result<Self, PagerError> {
        if page_size == 0 {
            return Err(PagerError::InvalidPageSize);
        }
        Ok(Self { items, page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of items.
    pub fn item_count(&self) -> i64 {
        self.items.len() as i64
    }

    /// Number of pages needed to hold every item; zero when there are none.
    pub fn page_count(&self) -> i64 {
        (self.items.len().div_ceil(self.page_size)) as i64
    }

    /// Number of items actually present on the given zero-based page.
    ///
    /// Full pages report the page size; the final page reports the remainder.
    pub fn page_item_count(&self, page: i64) -> i64 {
        if page < 0 || page >= self.page_count() {
            return OUT_OF_RANGE;
        }
        let start = page as usize * self.page_size;
        let remaining = self.items.len() - start;
        remaining.min(self.page_size) as i64
    }

    /// Zero-based page holding the item at `item_index`.
    pub fn page_index(&self, item_index: i64) -> i64 {
        if item_index < 0 || item_index >= self.item_count() {
            return OUT_OF_RANGE;
        }
        item_index / self.page_size as i64
    }

    /// Borrowed view of one page's items, `None` when the page is out of range.
    pub fn page_slice(&self, page: i64) -> Option<&[T]> {
        if page < 0 || page >= self.page_count() {
            return None;
        }
        let start = page as usize * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        Some(&self.items[start..end])
    }
}
