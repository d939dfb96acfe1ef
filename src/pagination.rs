//! Page arithmetic, page-window generation and page navigation shared by the
//! posts and members listings.

use serde::{Deserialize, Serialize};

/// Number of page buttons shown before the window starts truncating.
pub const DEFAULT_MAX_VISIBLE_PAGES: usize = 5;

/// One entry of a rendered page window.
///
/// Serializes as the page number or `null` for an ellipsis so templates can
/// test the entry with `{% if page %}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageEntry {
    Page(usize),
    Ellipsis,
}

/// Number of pages needed to show `count` items, `0` for an empty collection.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Returns the `page`-th (1-based) slice of `items`.
///
/// The page is not clamped: a page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Decides which page buttons to render around the current page.
pub trait WindowStrategy {
    /// Window used once `total_pages` exceeds `max_visible`.
    fn truncated(&self, current_page: usize, total_pages: usize, max_visible: usize)
    -> Vec<PageEntry>;

    fn window(&self, current_page: usize, total_pages: usize, max_visible: usize) -> Vec<PageEntry> {
        let max_visible = max_visible.max(1);
        if total_pages <= max_visible {
            return (1..=total_pages).map(PageEntry::Page).collect();
        }
        self.truncated(current_page.max(1), total_pages, max_visible)
    }
}

/// First and last page always shown, one neighbour on each side of the
/// current page, ellipses over the gaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedOffsetClamp;

impl WindowStrategy for FixedOffsetClamp {
    fn truncated(
        &self,
        current_page: usize,
        total_pages: usize,
        _max_visible: usize,
    ) -> Vec<PageEntry> {
        let last_page = total_pages;
        let band_start = current_page.saturating_sub(1).max(2);
        let band_end = current_page.saturating_add(1).min(last_page - 1);

        let mut pages = vec![PageEntry::Page(1)];
        if band_start > 2 {
            pages.push(PageEntry::Ellipsis);
        }
        pages.extend((band_start..=band_end).map(PageEntry::Page));
        if band_end < last_page - 1 {
            pages.push(PageEntry::Ellipsis);
        }
        pages.push(PageEntry::Page(last_page));

        pages
    }
}

/// A contiguous run of `max_visible` pages pinned to the start, the end, or
/// centred on the current page. Never emits ellipses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeBand;

impl WindowStrategy for ModeBand {
    fn truncated(
        &self,
        current_page: usize,
        total_pages: usize,
        max_visible: usize,
    ) -> Vec<PageEntry> {
        let half = max_visible / 2;

        let start = if current_page <= half + 1 {
            1
        } else if current_page >= total_pages - half {
            total_pages + 1 - max_visible
        } else {
            current_page - half
        };

        (start..start + max_visible).map(PageEntry::Page).collect()
    }
}

/// Configurable choice between the two window strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    #[default]
    FixedOffset,
    ModeBand,
}

impl WindowStrategy for WindowPolicy {
    fn truncated(
        &self,
        current_page: usize,
        total_pages: usize,
        max_visible: usize,
    ) -> Vec<PageEntry> {
        match self {
            WindowPolicy::FixedOffset => {
                FixedOffsetClamp.truncated(current_page, total_pages, max_visible)
            }
            WindowPolicy::ModeBand => ModeBand.truncated(current_page, total_pages, max_visible),
        }
    }
}

/// Tracks the current page. The page total is supplied by the caller on every
/// transition because it depends on the filtered collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    current_page: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

impl Navigator {
    pub fn new(current_page: usize) -> Self {
        Self {
            current_page: current_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves to `page` when it lies within `1..=total_pages` and returns
    /// `true`. Out-of-range requests are ignored.
    pub fn go_to(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        self.go_to(self.current_page.saturating_add(1), total_pages)
    }

    pub fn previous(&mut self, total_pages: usize) -> bool {
        self.go_to(self.current_page.saturating_sub(1), total_pages)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self, total_pages: usize) -> bool {
        self.current_page >= total_pages
    }
}

/// Everything a template needs to render one page of a listing.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<PageEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl<T: Clone> Paginated<&T> {
    /// Detaches the page from the collection it was sliced from.
    pub fn cloned(self) -> Paginated<T> {
        Paginated {
            items: self.items.into_iter().cloned().collect(),
            pages: self.pages,
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            is_first_page: self.is_first_page,
            is_last_page: self.is_last_page,
        }
    }
}
