//! Pagination types.

/// Zero-based page coordinates for a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// First page at the given size.
    pub fn first(size: u32) -> Self {
        Self { page: 0, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(10)
    }
}

/// One page of results.
///
/// Invariants: `items.len() <= size`, and `page * size < total` unless
/// `items` is empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, size: u32) -> Self {
        Self {
            items,
            total,
            page,
            size,
        }
    }

    /// An empty first page.
    pub fn empty(size: u32) -> Self {
        Self::new(Vec::new(), 0, 0, size)
    }

    /// Number of pages needed to show `total` items at this page size.
    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.size)
    }

    pub fn is_last_page(&self) -> bool {
        self.page + 1 >= self.page_count()
    }

    /// Enforce `items.len() <= size`, dropping any overflow.
    ///
    /// Returns the number of items dropped.
    pub fn normalize(&mut self) -> usize {
        let limit = self.size as usize;
        if self.size == 0 || self.items.len() <= limit {
            return 0;
        }
        let dropped = self.items.len() - limit;
        self.items.truncate(limit);
        dropped
    }

    /// Whether the page satisfies its invariants.
    pub fn is_consistent(&self) -> bool {
        let fits = self.size == 0 || self.items.len() <= self.size as usize;
        let in_range =
            self.items.is_empty() || u64::from(self.page) * u64::from(self.size) < self.total;
        fits && in_range
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Number of pages needed for `total` items at `size` per page.
pub fn page_count(total: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Spring Data style page, as returned by the log search endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub first: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last: bool,
}

impl<T> From<PageResponse<T>> for Paginated<T> {
    fn from(page: PageResponse<T>) -> Self {
        Paginated {
            items: page.content,
            total: page.total_elements,
            page: page.number,
            size: page.size,
        }
    }
}
