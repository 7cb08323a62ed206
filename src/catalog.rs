//! Menu catalog state.
//!
//! Read-only data refreshed from the backend on dashboard mount and tab
//! switches. A failed refresh keeps whatever was shown before: the catalog
//! is non-critical read data and a remount retries it, so failures are
//! logged rather than surfaced to the cashier.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::api::Backend;
use crate::models::{CategoryCount, MenuItem};

pub struct Catalog {
    backend: Arc<dyn Backend>,
    items: RwLock<Vec<MenuItem>>,
    categories: RwLock<Vec<CategoryCount>>,
}

impl Catalog {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            items: RwLock::new(Vec::new()),
            categories: RwLock::new(Vec::new()),
        }
    }

    /// Fetch menu items and category summaries. Each fetch is independent;
    /// on error the previous state of that dataset is left unchanged.
    pub async fn refresh(&self) {
        match self.backend.menu().await {
            Ok(items) => {
                *self.items.write().unwrap_or_else(|e| e.into_inner()) = items;
            }
            Err(e) => warn!(error = %e, "menu fetch failed, keeping previous items"),
        }
        match self.backend.categories().await {
            Ok(categories) => {
                *self.categories.write().unwrap_or_else(|e| e.into_inner()) = categories;
            }
            Err(e) => warn!(error = %e, "category fetch failed, keeping previous categories"),
        }
    }

    /// Current items, optionally restricted to one category.
    pub fn items(&self, category: Option<&str>) -> Vec<MenuItem> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        match category {
            Some(c) => items.iter().filter(|i| i.category == c).cloned().collect(),
            None => items.clone(),
        }
    }

    pub fn categories(&self) -> Vec<CategoryCount> {
        self.categories
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn find(&self, menu_item_id: &str) -> Option<MenuItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|i| i.id == menu_item_id)
            .cloned()
    }
}
