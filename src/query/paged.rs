//! Paginated queries.

use logwatch_types::Paginated;
use tokio::sync::watch;

use super::{FetchState, Query, QueryHandle, Trigger};

/// A filter plus page coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Paged<F> {
    pub filter: F,
    pub page: u32,
    pub size: u32,
}

impl<F> Paged<F> {
    /// First page of `filter` at `size` per page.
    pub fn first(filter: F, size: u32) -> Self {
        Self {
            filter,
            page: 0,
            size,
        }
    }
}

/// Outputs that know how many pages the full result spans.
pub trait Pages {
    fn page_count(&self) -> u32;
}

impl<T> Pages for Paginated<T> {
    fn page_count(&self) -> u32 {
        Paginated::<T>::page_count(self)
    }
}

/// A [`QueryHandle`] that owns page, size and filter.
///
/// Changing the filter or the size goes back to the first page. Moving
/// between pages is bounded by the page count of the last committed
/// response.
pub struct PagedHandle<Q: Query> {
    handle: QueryHandle<Q>,
    current: Q::Params,
}

impl<Q, F> PagedHandle<Q>
where
    Q: Query<Params = Paged<F>>,
    Q::Output: Pages,
    F: Clone + PartialEq,
{
    /// Mount the query on the first page of `filter`. A zero size is
    /// treated as one row per page.
    pub fn mount(query: Q, filter: F, size: u32) -> Self {
        let current = Paged::first(filter, size.max(1));
        let handle = QueryHandle::new(query);
        handle.set_params(current.clone());
        Self { handle, current }
    }

    pub fn filter(&self) -> &F {
        &self.current.filter
    }

    pub fn page(&self) -> u32 {
        self.current.page
    }

    pub fn size(&self) -> u32 {
        self.current.size
    }

    /// Page count from the last committed response, if any.
    pub fn page_count(&self) -> Option<u32> {
        self.handle.state().data.map(|data| data.page_count())
    }

    /// Replace the filter and return to the first page.
    pub fn set_filter(&mut self, filter: F) -> Trigger {
        if self.current.filter == filter {
            return Trigger::Unchanged;
        }
        self.current.filter = filter;
        self.current.page = 0;
        self.apply()
    }

    /// Change the page size and return to the first page. Zero is ignored.
    pub fn set_size(&mut self, size: u32) -> Trigger {
        if size == 0 || self.current.size == size {
            return Trigger::Unchanged;
        }
        self.current.size = size;
        self.current.page = 0;
        self.apply()
    }

    /// Jump to `page`, clamped to the last known page.
    pub fn set_page(&mut self, page: u32) -> Trigger {
        let last = self.page_count().unwrap_or(1).saturating_sub(1);
        let page = page.min(last);
        if self.current.page == page {
            return Trigger::Unchanged;
        }
        self.current.page = page;
        self.apply()
    }

    pub fn next_page(&mut self) -> Trigger {
        match self.page_count() {
            Some(count) if self.current.page + 1 < count => self.set_page(self.current.page + 1),
            _ => Trigger::Unchanged,
        }
    }

    pub fn prev_page(&mut self) -> Trigger {
        match self.current.page.checked_sub(1) {
            Some(page) => self.set_page(page),
            None => Trigger::Unchanged,
        }
    }

    pub fn refresh(&self) -> Trigger {
        self.handle.refresh()
    }

    pub fn state(&self) -> FetchState<Q::Output> {
        self.handle.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Q::Output>> {
        self.handle.subscribe()
    }

    pub async fn settled(&self) -> FetchState<Q::Output> {
        self.handle.settled().await
    }

    pub fn handle(&self) -> &QueryHandle<Q> {
        &self.handle
    }

    fn apply(&self) -> Trigger {
        self.handle.set_params(self.current.clone())
    }
}

impl<Q: Query> std::fmt::Debug for PagedHandle<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedHandle")
            .field("handle", &self.handle)
            .field("current", &self.current)
            .finish()
    }
}
