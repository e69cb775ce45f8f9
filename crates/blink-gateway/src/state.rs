use std::sync::Arc;

use blink_core::UrlStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn UrlStore>,
    base_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn UrlStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: public_base_url.into(),
        }
    }

    pub fn store(&self) -> &dyn UrlStore {
        self.store.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
