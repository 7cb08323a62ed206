//! Wire types shared with the kasir backend.
//!
//! Shapes mirror the backend's REST contract exactly; the client treats
//! every server-returned value as authoritative and never mutates a
//! persisted `Order`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated cashier, as returned by `/auth/login` and `/auth/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub name: String,
    pub role: String,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

/// A menu catalog entry. Owned and versioned by the backend; immutable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// One row of `GET /menu/categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// One cart line: quantity of a menu item with name/price snapshotted at
/// the moment it was first added. Also the order-item wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal (price snapshot x quantity).
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Body of `POST /orders`. The backend computes `change_amount` itself and
/// rejects drafts where the cash tendered does not cover the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub cash_received: f64,
    pub cashier_id: String,
    pub cashier_name: String,
}

/// A persisted sale, as returned by the backend. `total_amount`,
/// `change_amount`, and `order_date` are server-authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    pub cash_received: f64,
    pub change_amount: f64,
    pub cashier_id: String,
    pub cashier_name: String,
    pub order_date: DateTime<Utc>,
    #[serde(default = "default_order_status")]
    pub status: String,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

fn default_order_status() -> String {
    "completed".to_string()
}

/// Order/revenue counters for one period of `GET /dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub orders: i64,
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_items: Option<i64>,
}

/// Body of `GET /dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today: PeriodStats,
    pub all_time: PeriodStats,
}

/// One entry of the popular-items ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub name: String,
    pub quantity: i64,
}

/// Body of `GET /orders/today`: today's aggregates plus the top items
/// ranked by quantity sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: String,
    pub total_orders: i64,
    pub total_revenue: f64,
    #[serde(default)]
    pub popular_items: Vec<PopularItem>,
}
