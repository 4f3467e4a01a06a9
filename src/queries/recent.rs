//! The paginated recent-errors table.

use std::sync::Arc;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{LogEvent, PageRequest, Paginated, RecentErrorsFilter};

use crate::query::{Paged, Query};
use crate::source::LogSource;

#[derive(Debug, Clone)]
pub struct RecentErrorsQuery {
    source: Arc<dyn LogSource>,
}

impl RecentErrorsQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for RecentErrorsQuery {
    type Params = Paged<RecentErrorsFilter>;
    type Output = Paginated<LogEvent>;

    fn name(&self) -> &'static str {
        "recent_errors"
    }

    async fn fetch(
        &self,
        params: &Paged<RecentErrorsFilter>,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError> {
        let request = PageRequest::new(params.page, params.size);
        self.source
            .recent_errors(&params.filter, request, cancel)
            .await
    }
}
