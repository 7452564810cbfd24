use std::{collections::HashSet, sync::Arc};

use log::{info, warn};

use crate::{HtmlExtractor, PageFetcher, PageRequest, PaginationCursor, Showcase, StdResult};

/// The state of a walk through the collections index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Another page is available behind the cursor.
    HasCursor(PaginationCursor),

    /// The last page was reached.
    Done,
}

/// Walks every page of the collections index.
pub struct ShowcaseWalker {
    page_fetcher: Arc<dyn PageFetcher>,
}

impl ShowcaseWalker {
    /// Creates a new `ShowcaseWalker` instance with the given page fetcher.
    pub fn new(page_fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { page_fetcher }
    }

    /// Fetches all the pages and concatenates their collections in page order.
    pub async fn walk(&self) -> StdResult<Vec<Showcase>> {
        let mut showcases = vec![];
        let mut visited = HashSet::new();
        let mut cursor = None;
        loop {
            match self.visit(cursor, &mut showcases, &mut visited).await? {
                PaginationState::HasCursor(next) => cursor = Some(next),
                PaginationState::Done => break,
            }
        }
        info!("Walked the collections index: {} collections", showcases.len());

        Ok(showcases)
    }

    async fn visit(
        &self,
        cursor: Option<PaginationCursor>,
        showcases: &mut Vec<Showcase>,
        visited_cursors: &mut HashSet<PaginationCursor>,
    ) -> StdResult<PaginationState> {
        let document = self
            .page_fetcher
            .fetch_page(&PageRequest::showcase_index(cursor))
            .await?;
        let (page_showcases, next_cursor) = HtmlExtractor::showcases(&document);
        showcases.extend(page_showcases);

        Ok(Self::transition(next_cursor, visited_cursors))
    }

    fn transition(
        next_cursor: Option<PaginationCursor>,
        visited_cursors: &mut HashSet<PaginationCursor>,
    ) -> PaginationState {
        match next_cursor {
            Some(cursor) if visited_cursors.insert(cursor.clone()) => {
                PaginationState::HasCursor(cursor)
            }
            Some(cursor) => {
                warn!("Cursor {cursor} was already visited, stopping pagination");
                PaginationState::Done
            }
            None => PaginationState::Done,
        }
    }
}
