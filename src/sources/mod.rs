//! Item sources feeding the listing views and the cache holding their last
//! result.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::session::SessionContext;

pub mod http;

pub use http::HttpItemSource;

/// Any failure to obtain a collection. Callers only display it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("HTTP error! Status: {0}")]
    Status(u16),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Supplies a whole collection per call. No partial results.
#[async_trait]
pub trait ItemSource<T>: Send + Sync {
    async fn fetch(&self, ctx: &SessionContext) -> Result<Vec<T>, FetchError>;
}

/// Collection being served, or the failure when none was ever loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn items(&self) -> Option<&[T]> {
        match self {
            LoadState::Loaded(items) => Some(items),
            LoadState::Failed(_) => None,
        }
    }
}

/// Shared holder of the last fetched collection of one source.
pub struct ItemStore<T> {
    state: RwLock<Option<Arc<LoadState<T>>>>,
}

impl<T> Default for ItemStore<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }
}

impl<T: Send + Sync> ItemStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stored state without fetching.
    pub async fn current(&self) -> Option<Arc<LoadState<T>>> {
        self.state.read().await.clone()
    }

    /// Returns the stored state, fetching only when nothing was loaded yet.
    pub async fn load_or_fetch(
        &self,
        source: &dyn ItemSource<T>,
        ctx: &SessionContext,
    ) -> Arc<LoadState<T>> {
        if let Some(state) = self.current().await {
            return state;
        }
        self.refresh(source, ctx)
            .await
            .unwrap_or_else(|err| Arc::new(LoadState::Failed(err.to_string())))
    }

    /// Fetches unconditionally. A success replaces the stored state; a failure
    /// is only stored when there is no loaded collection to keep serving.
    pub async fn refresh(
        &self,
        source: &dyn ItemSource<T>,
        ctx: &SessionContext,
    ) -> Result<Arc<LoadState<T>>, FetchError> {
        match source.fetch(ctx).await {
            Ok(items) => {
                log::info!("Fetched {} items", items.len());
                let state = Arc::new(LoadState::Loaded(items));
                *self.state.write().await = Some(Arc::clone(&state));
                Ok(state)
            }
            Err(err) => {
                log::error!("Error fetching data: {err}");
                let mut state = self.state.write().await;
                if !matches!(state.as_deref(), Some(LoadState::Loaded(_))) {
                    *state = Some(Arc::new(LoadState::Failed(err.to_string())));
                }
                Err(err)
            }
        }
    }
}
