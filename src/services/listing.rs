//! The listing workflow shared by the posts and members pages: load the
//! collection once, then search and page through it per browser.

use std::sync::Arc;

use validator::Validate;

use crate::dto::listing::ListingPageData;
use crate::forms::listing::{MAX_QUERY_LENGTH, NavigationQuery, SearchForm, Step};
use crate::search::Searchable;
use crate::services::{ServiceError, ServiceResult};
use crate::session::SessionContext;
use crate::sources::{ItemSource, ItemStore, LoadState};
use crate::view::{PagedFilterView, ViewSettings, ViewState};

/// One listing call site: its item source, cached collection and display
/// settings.
pub struct ListingService<T> {
    store: ItemStore<T>,
    source: Arc<dyn ItemSource<T>>,
    settings: ViewSettings,
}

impl<T> ListingService<T>
where
    T: Searchable + Clone + Send + Sync,
{
    pub fn new(source: Arc<dyn ItemSource<T>>, settings: ViewSettings) -> Self {
        Self {
            store: ItemStore::new(),
            source,
            settings,
        }
    }

    /// Renders the current page after applying a page click or step.
    pub async fn show(
        &self,
        ctx: &SessionContext,
        state: ViewState,
        navigation: NavigationQuery,
    ) -> ListingPageData<T> {
        let loaded = self.store.load_or_fetch(self.source.as_ref(), ctx).await;
        let query = state.query.as_str().to_string();

        let items = match loaded.as_ref() {
            LoadState::Loaded(items) => items.as_slice(),
            LoadState::Failed(message) => {
                return ListingPageData {
                    listing: None,
                    error: Some(message.clone()),
                    query,
                    state,
                };
            }
        };

        let mut view = PagedFilterView::new(items, state, self.settings);
        if let Some(page) = navigation.page {
            view.go_to(page);
        }
        match navigation.step {
            Some(Step::Next) => {
                view.next();
            }
            Some(Step::Previous) => {
                view.previous();
            }
            None => {}
        }

        let listing = view.render().cloned();

        ListingPageData {
            listing: Some(listing),
            error: None,
            query,
            state: view.into_state(),
        }
    }

    /// Applies a new search query; the view always returns to page one.
    pub async fn search(&self, state: ViewState, form: &SearchForm) -> ServiceResult<ViewState> {
        if form.validate().is_err() {
            return Err(ServiceError::Validation(format!(
                "Search query must be at most {MAX_QUERY_LENGTH} characters"
            )));
        }

        let current = self.store.current().await;
        let items = current.as_deref().and_then(LoadState::items).unwrap_or(&[]);

        let mut view = PagedFilterView::new(items, state, self.settings);
        view.on_query_change(form.q.as_str());
        Ok(view.into_state())
    }

    /// Refetches the collection. The view state is left untouched, and a
    /// failure leaves any previously loaded collection in place.
    pub async fn refresh(&self, ctx: &SessionContext) -> ServiceResult<usize> {
        let state = self.store.refresh(self.source.as_ref(), ctx).await?;
        Ok(state.items().map_or(0, <[T]>::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::Post;
    use crate::pagination::{PageEntry::Page, WindowPolicy};
    use crate::sources::FetchError;
    use crate::sources::tests::{ScriptedSource, ctx};

    fn posts(count: i32) -> Vec<Post> {
        (1..=count)
            .map(|id| Post {
                id,
                user_id: 1,
                title: if id % 10 == 0 {
                    format!("milestone {id}")
                } else {
                    format!("post {id}")
                },
                body: String::new(),
            })
            .collect()
    }

    fn service(responses: Vec<Result<Vec<Post>, FetchError>>) -> ListingService<Post> {
        ListingService::new(
            Arc::new(ScriptedSource::new(responses)),
            ViewSettings::new(5, WindowPolicy::FixedOffset),
        )
    }

    fn ids(data: &ListingPageData<Post>) -> Vec<i32> {
        data.listing
            .as_ref()
            .map(|listing| listing.items.iter().map(|post| post.id).collect())
            .unwrap_or_default()
    }

    fn nav(page: Option<usize>, step: Option<Step>) -> NavigationQuery {
        NavigationQuery { page, step }
    }

    fn search_form(q: &str) -> SearchForm {
        SearchForm { q: q.to_string() }
    }

    #[actix_web::test]
    async fn first_page_of_fresh_view() {
        let service = service(vec![Ok(posts(12))]);

        let data = service
            .show(&ctx(), ViewState::default(), NavigationQuery::default())
            .await;

        assert_eq!(ids(&data), vec![1, 2, 3, 4, 5]);
        let listing = data.listing.expect("listing");
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.pages, vec![Page(1), Page(2), Page(3)]);
    }

    #[actix_web::test]
    async fn page_clicks_and_steps_update_state() {
        let service = service(vec![Ok(posts(23))]);

        let data = service
            .show(&ctx(), ViewState::default(), nav(Some(3), None))
            .await;
        assert_eq!(ids(&data), vec![11, 12, 13, 14, 15]);

        let data = service
            .show(&ctx(), data.state, nav(None, Some(Step::Next)))
            .await;
        assert_eq!(data.state.navigator.current_page(), 4);

        let data = service
            .show(&ctx(), data.state, nav(Some(99), None))
            .await;
        assert_eq!(data.state.navigator.current_page(), 4);
    }

    #[actix_web::test]
    async fn search_resets_page() {
        let service = service(vec![Ok(posts(23))]);
        let data = service
            .show(&ctx(), ViewState::default(), nav(Some(3), None))
            .await;

        let state = service
            .search(data.state, &search_form("MILESTONE"))
            .await
            .expect("valid query");
        assert_eq!(state.navigator.current_page(), 1);

        let data = service
            .show(&ctx(), state, NavigationQuery::default())
            .await;
        assert_eq!(ids(&data), vec![10, 20]);
        assert_eq!(data.query, "MILESTONE");
        assert_eq!(data.listing.expect("listing").total_pages, 1);
    }

    #[actix_web::test]
    async fn fetch_failure_is_display_state() {
        let service = service(vec![Err(FetchError::Status(500)), Ok(posts(3))]);

        let data = service
            .show(&ctx(), ViewState::default(), NavigationQuery::default())
            .await;
        assert!(data.listing.is_none());
        assert_eq!(data.error.as_deref(), Some("HTTP error! Status: 500"));

        assert_eq!(service.refresh(&ctx()).await.expect("refetched"), 3);
        let data = service
            .show(&ctx(), ViewState::default(), NavigationQuery::default())
            .await;
        assert_eq!(ids(&data), vec![1, 2, 3]);
    }

    #[actix_web::test]
    async fn refresh_does_not_reset_stale_page() {
        let service = service(vec![Ok(posts(23)), Ok(posts(4))]);
        let data = service
            .show(&ctx(), ViewState::default(), nav(Some(5), None))
            .await;

        service.refresh(&ctx()).await.expect("refetched");
        let data = service
            .show(&ctx(), data.state, NavigationQuery::default())
            .await;

        let listing = data.listing.expect("listing");
        assert_eq!(listing.page, 5);
        assert!(listing.items.is_empty());
        assert_eq!(listing.total_items, 4);
    }

    #[actix_web::test]
    async fn failed_refresh_is_reported_only_to_caller() {
        let service = service(vec![Ok(posts(12)), Err(FetchError::Status(401))]);
        let alice = ctx();
        let bob = SessionContext::new("expired-token", "bob@example.com");

        let data = service
            .show(&alice, ViewState::default(), NavigationQuery::default())
            .await;
        assert!(data.error.is_none());

        let err = service.refresh(&bob).await.unwrap_err();
        assert!(matches!(err, ServiceError::Fetch(FetchError::Status(401))));
        assert_eq!(err.to_string(), "HTTP error! Status: 401");

        let data = service
            .show(&alice, data.state, NavigationQuery::default())
            .await;
        assert!(data.error.is_none());
        assert_eq!(ids(&data), vec![1, 2, 3, 4, 5]);
    }

    #[actix_web::test]
    async fn over_long_query_is_rejected() {
        let service = service(vec![Ok(posts(12))]);
        let data = service
            .show(&ctx(), ViewState::default(), nav(Some(2), None))
            .await;

        let result = service
            .search(data.state, &search_form(&"x".repeat(MAX_QUERY_LENGTH + 1)))
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let state = service
            .search(ViewState::default(), &search_form(&"x".repeat(MAX_QUERY_LENGTH)))
            .await
            .expect("longest accepted query");
        assert_eq!(state.query.as_str().len(), MAX_QUERY_LENGTH);
    }
}
