use serde::Serialize;

/// Everything a UI needs to render one entity kind's list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreState<S, D> {
    /// Current page, in server order.
    pub items: Vec<S>,
    pub selected: Option<D>,
    /// A list request is in flight and nothing is cached yet.
    pub loading: bool,
    pub loading_details: bool,
    pub error: Option<String>,
    /// Zero-indexed.
    pub current_page: u32,
    pub total_pages: u32,
    /// Last committed search filter.
    pub search_term: String,
}

impl<S, D> Default for StoreState<S, D> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            loading_details: false,
            error: None,
            current_page: 0,
            total_pages: 0,
            search_term: String::new(),
        }
    }
}

impl<S, D> StoreState<S, D> {
    pub fn has_next_page(&self) -> bool {
        self.current_page.saturating_add(1) < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 0
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_next: self.has_next_page(),
            has_previous: self.has_previous_page(),
        }
    }
}

/// Pagination cursor projected out of a `StoreState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}
