//! Sales reporting data.
//!
//! Pulled when the reports tab activates: dashboard aggregates (today +
//! all-time), today's popular-items ranking, and the most recent orders.
//! The three fetches are independent; one failing leaves the others and
//! its own previous dataset untouched.

use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::api::Backend;
use crate::models::{DailySales, DashboardStats, Order, PopularItem};

/// How many orders the history list shows.
pub const RECENT_ORDERS_LIMIT: usize = 20;

pub struct Reports {
    backend: Arc<dyn Backend>,
    stats: RwLock<Option<DashboardStats>>,
    today: RwLock<Option<DailySales>>,
    recent: RwLock<Vec<Order>>,
}

impl Reports {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            stats: RwLock::new(None),
            today: RwLock::new(None),
            recent: RwLock::new(Vec::new()),
        }
    }

    /// Refresh all three datasets. Failures are logged per dataset and do
    /// not block the others.
    pub async fn refresh(&self) {
        let (stats, today, recent) = tokio::join!(
            self.backend.dashboard_stats(),
            self.backend.today_sales(),
            self.backend.recent_orders(RECENT_ORDERS_LIMIT),
        );

        match stats {
            Ok(s) => *self.stats.write().unwrap_or_else(|e| e.into_inner()) = Some(s),
            Err(e) => warn!(error = %e, "dashboard stats fetch failed"),
        }
        match today {
            Ok(t) => *self.today.write().unwrap_or_else(|e| e.into_inner()) = Some(t),
            Err(e) => warn!(error = %e, "today sales fetch failed"),
        }
        match recent {
            Ok(r) => *self.recent.write().unwrap_or_else(|e| e.into_inner()) = r,
            Err(e) => warn!(error = %e, "recent orders fetch failed"),
        }
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.stats.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn today(&self) -> Option<DailySales> {
        self.today.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn popular_items(&self) -> Vec<PopularItem> {
        self.today
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|t| t.popular_items.clone())
            .unwrap_or_default()
    }

    pub fn recent_orders(&self) -> Vec<Order> {
        self.recent.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
