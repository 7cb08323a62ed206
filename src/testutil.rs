//! Shared test doubles: a scriptable in-memory [`Backend`].

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::Backend;
use crate::error::PosError;
use crate::models::{
    CategoryCount, DailySales, DashboardStats, LoginResponse, MenuItem, Order, OrderDraft,
    PeriodStats, PopularItem, User,
};

pub(crate) fn sample_user() -> User {
    User {
        id: "u-1".to_string(),
        username: "kasir".to_string(),
        name: "Kasir Utama".to_string(),
        role: "kasir".to_string(),
    }
}

pub(crate) fn sample_menu_item(id: &str, name: &str, price: f64, category: &str) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price,
        category: category.to_string(),
        image_url: String::new(),
        available: true,
        created_at: None,
    }
}

pub(crate) fn sample_menu() -> Vec<MenuItem> {
    vec![
        sample_menu_item("m-1", "Nasi Goreng Seafood", 25000.0, "Nasi Goreng"),
        sample_menu_item("m-2", "Soto Ayam", 20000.0, "Soto"),
        sample_menu_item("m-3", "Es Teh Manis", 5000.0, "Minuman"),
    ]
}

pub(crate) fn sample_categories() -> Vec<CategoryCount> {
    vec![
        CategoryCount {
            category: "Nasi Goreng".to_string(),
            count: 1,
        },
        CategoryCount {
            category: "Soto".to_string(),
            count: 1,
        },
        CategoryCount {
            category: "Minuman".to_string(),
            count: 1,
        },
    ]
}

pub(crate) fn sample_stats() -> DashboardStats {
    DashboardStats {
        today: PeriodStats {
            orders: 2,
            revenue: 76000.0,
            menu_items: None,
        },
        all_time: PeriodStats {
            orders: 10,
            revenue: 380000.0,
            menu_items: Some(12),
        },
    }
}

pub(crate) fn sample_daily_sales() -> DailySales {
    DailySales {
        date: "2026-08-04".to_string(),
        total_orders: 2,
        total_revenue: 76000.0,
        popular_items: vec![
            PopularItem {
                name: "Nasi Goreng Seafood".to_string(),
                quantity: 3,
            },
            PopularItem {
                name: "Es Teh Manis".to_string(),
                quantity: 2,
            },
        ],
    }
}

/// Scriptable backend. Every operation returns its configured result; the
/// default construction answers like a healthy server with sample data.
/// `create_order` mimics the real backend: it computes the change, rejects
/// insufficient cash, and stamps the order date.
pub(crate) struct MockBackend {
    login: Mutex<Result<LoginResponse, PosError>>,
    profile: Mutex<Result<User, PosError>>,
    menu: Mutex<Result<Vec<MenuItem>, PosError>>,
    categories: Mutex<Result<Vec<CategoryCount>, PosError>>,
    create_order: Mutex<Option<Result<Order, PosError>>>,
    recent_orders: Mutex<Result<Vec<Order>, PosError>>,
    today_sales: Mutex<Result<DailySales, PosError>>,
    dashboard_stats: Mutex<Result<DashboardStats, PosError>>,
    /// Every draft the mock received, in submission order.
    pub order_drafts: Mutex<Vec<OrderDraft>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            login: Mutex::new(Ok(LoginResponse {
                access_token: "jwt-test-token".to_string(),
                token_type: "bearer".to_string(),
                user: sample_user(),
            })),
            profile: Mutex::new(Ok(sample_user())),
            menu: Mutex::new(Ok(sample_menu())),
            categories: Mutex::new(Ok(sample_categories())),
            create_order: Mutex::new(None),
            recent_orders: Mutex::new(Ok(Vec::new())),
            today_sales: Mutex::new(Ok(sample_daily_sales())),
            dashboard_stats: Mutex::new(Ok(sample_stats())),
            order_drafts: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_login(&self, err: PosError) {
        *self.login.lock().expect("lock") = Err(err);
    }

    pub fn fail_profile(&self, err: PosError) {
        *self.profile.lock().expect("lock") = Err(err);
    }

    pub fn set_menu(&self, items: Vec<MenuItem>) {
        *self.menu.lock().expect("lock") = Ok(items);
    }

    pub fn fail_menu(&self, err: PosError) {
        *self.menu.lock().expect("lock") = Err(err);
    }

    pub fn fail_categories(&self, err: PosError) {
        *self.categories.lock().expect("lock") = Err(err);
    }

    pub fn fail_create_order(&self, err: PosError) {
        *self.create_order.lock().expect("lock") = Some(Err(err));
    }

    /// Return to the default server-like settlement behaviour.
    pub fn reset_create_order(&self) {
        *self.create_order.lock().expect("lock") = None;
    }

    pub fn set_recent_orders(&self, orders: Vec<Order>) {
        *self.recent_orders.lock().expect("lock") = Ok(orders);
    }

    pub fn fail_recent_orders(&self, err: PosError) {
        *self.recent_orders.lock().expect("lock") = Err(err);
    }

    pub fn fail_today_sales(&self, err: PosError) {
        *self.today_sales.lock().expect("lock") = Err(err);
    }

    pub fn fail_dashboard_stats(&self, err: PosError) {
        *self.dashboard_stats.lock().expect("lock") = Err(err);
    }

    fn settle(&self, draft: &OrderDraft) -> Result<Order, PosError> {
        let change = draft.cash_received - draft.total_amount;
        if change < 0.0 {
            return Err(PosError::Api {
                status: 400,
                detail: "Uang yang diterima kurang dari total".to_string(),
            });
        }
        Ok(Order {
            id: "order-test-1".to_string(),
            items: draft.items.clone(),
            total_amount: draft.total_amount,
            payment_method: "cash".to_string(),
            cash_received: draft.cash_received,
            change_amount: change,
            cashier_id: draft.cashier_id.clone(),
            cashier_name: draft.cashier_name.clone(),
            order_date: Utc
                .with_ymd_and_hms(2026, 8, 4, 3, 30, 0)
                .single()
                .expect("valid timestamp"),
            status: "completed".to_string(),
        })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse, PosError> {
        self.login.lock().expect("lock").clone()
    }

    async fn profile(&self) -> Result<User, PosError> {
        self.profile.lock().expect("lock").clone()
    }

    async fn menu(&self) -> Result<Vec<MenuItem>, PosError> {
        self.menu.lock().expect("lock").clone()
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>, PosError> {
        self.categories.lock().expect("lock").clone()
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, PosError> {
        self.order_drafts.lock().expect("lock").push(draft.clone());
        match &*self.create_order.lock().expect("lock") {
            Some(result) => result.clone(),
            None => self.settle(draft),
        }
    }

    async fn recent_orders(&self, _limit: usize) -> Result<Vec<Order>, PosError> {
        self.recent_orders.lock().expect("lock").clone()
    }

    async fn today_sales(&self) -> Result<DailySales, PosError> {
        self.today_sales.lock().expect("lock").clone()
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, PosError> {
        self.dashboard_stats.lock().expect("lock").clone()
    }
}
