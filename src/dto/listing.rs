use serde::Serialize;

use crate::pagination::Paginated;
use crate::view::ViewState;

/// Data required to render one listing page.
#[derive(Debug, Serialize)]
pub struct ListingPageData<T> {
    /// Current page of the filtered collection; absent when loading failed.
    pub listing: Option<Paginated<T>>,
    /// Fetch failure shown in place of the listing.
    pub error: Option<String>,
    /// Search query echoed back into the search box.
    pub query: String,
    /// View state to persist after navigation.
    #[serde(skip)]
    pub state: ViewState,
}
