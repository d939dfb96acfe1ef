//! Search + pagination state machine driving a single listing view.

use serde::{Deserialize, Serialize};

use crate::pagination::{
    DEFAULT_MAX_VISIBLE_PAGES, Navigator, Paginated, WindowPolicy, WindowStrategy, paginate,
    total_pages,
};
use crate::search::{SearchQuery, Searchable, filter};

/// Per-listing display settings, fixed for the lifetime of the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ViewSettings {
    pub page_size: usize,
    #[serde(default)]
    pub window: WindowPolicy,
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

fn default_max_visible() -> usize {
    DEFAULT_MAX_VISIBLE_PAGES
}

impl ViewSettings {
    pub fn new(page_size: usize, window: WindowPolicy) -> Self {
        Self {
            page_size: page_size.max(1),
            window,
            max_visible: DEFAULT_MAX_VISIBLE_PAGES,
        }
    }
}

/// The user-owned part of a view: what was typed and which page is shown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub query: SearchQuery,
    pub navigator: Navigator,
}

/// Filters `items` by the state's query and pages through the result.
pub struct PagedFilterView<'a, T> {
    items: &'a [T],
    filtered: Vec<&'a T>,
    state: ViewState,
    settings: ViewSettings,
}

impl<'a, T: Searchable> PagedFilterView<'a, T> {
    pub fn new(items: &'a [T], state: ViewState, settings: ViewSettings) -> Self {
        let filtered = filter(items, &state.query);
        Self {
            items,
            filtered,
            state,
            settings,
        }
    }

    /// Applies a new query and always returns to the first page.
    pub fn on_query_change(&mut self, query: impl Into<SearchQuery>) {
        self.state.query = query.into();
        self.filtered = filter(self.items, &self.state.query);
        self.state.navigator.reset();
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        self.state.navigator.go_to(page, total)
    }

    pub fn next(&mut self) -> bool {
        let total = self.total_pages();
        self.state.navigator.next(total)
    }

    pub fn previous(&mut self) -> bool {
        let total = self.total_pages();
        self.state.navigator.previous(total)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.settings.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.state.navigator.current_page()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    /// Builds the render payload for the current page.
    pub fn render(&self) -> Paginated<&'a T> {
        let total = self.total_pages();
        let navigator = &self.state.navigator;
        let page = navigator.current_page();

        Paginated {
            items: paginate(&self.filtered, page, self.settings.page_size).to_vec(),
            pages: self
                .settings
                .window
                .window(page, total, self.settings.max_visible),
            page,
            total_pages: total,
            total_items: self.filtered.len(),
            is_first_page: navigator.is_first_page(),
            is_last_page: navigator.is_last_page(total),
        }
    }
}
