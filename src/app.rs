//! Application shell: routing, orchestration, and state-change events.
//!
//! The `App` owns the session, catalog, cart, payment flow, and reports,
//! and routes between the loading gate, the login screen, and the
//! dashboard tabs. Observers register a callback and receive explicit
//! [`AppEvent`] notifications instead of relying on any rendering
//! framework's reactivity.

use std::sync::{Arc, Mutex};

use crate::api::Backend;
use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::PosError;
use crate::models::{CartItem, Order, OrderDraft, User};
use crate::payment::{self, PaymentFlow, PaymentStage};
use crate::reports::Reports;
use crate::session::SessionService;
use crate::storage::{TokenCell, TokenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Cashier,
    Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Startup gate while the stored credential resolves. Consumers must
    /// not render login or dashboard yet.
    Loading,
    Login,
    Dashboard(Tab),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ScreenChanged(Screen),
    OrderSettled(Order),
    SessionEnded,
}

/// What the payment modal shows when it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPrompt {
    pub total: f64,
    pub quick_amounts: Vec<f64>,
}

type Listener = Box<dyn Fn(&AppEvent) + Send + Sync>;

pub struct App {
    backend: Arc<dyn Backend>,
    session: SessionService,
    catalog: Catalog,
    reports: Reports,
    cart: Mutex<Cart>,
    payment: PaymentFlow,
    screen: Mutex<Screen>,
    listeners: Mutex<Vec<Listener>>,
}

impl App {
    pub fn new(
        backend: Arc<dyn Backend>,
        tokens: Arc<TokenCell>,
        store: Box<dyn TokenStore>,
    ) -> Self {
        Self {
            session: SessionService::new(backend.clone(), tokens, store),
            catalog: Catalog::new(backend.clone()),
            reports: Reports::new(backend.clone()),
            cart: Mutex::new(Cart::new()),
            payment: PaymentFlow::new(),
            screen: Mutex::new(Screen::Loading),
            listeners: Mutex::new(Vec::new()),
            backend,
        }
    }

    // -- Observation --------------------------------------------------------

    pub fn subscribe(&self, listener: impl Fn(&AppEvent) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    fn emit(&self, event: AppEvent) {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.iter() {
            listener(&event);
        }
    }

    pub fn screen(&self) -> Screen {
        *self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_screen(&self, next: Screen) {
        {
            let mut screen = self.screen.lock().unwrap_or_else(|e| e.into_inner());
            if *screen == next {
                return;
            }
            *screen = next;
        }
        self.emit(AppEvent::ScreenChanged(next));
    }

    // -- Routing ------------------------------------------------------------

    /// Resolve the stored credential, then route to login or dashboard.
    /// The screen leaves `Loading` exactly once.
    pub async fn startup(&self) {
        self.session.restore().await;
        if self.session.is_authenticated() {
            self.catalog.refresh().await;
            self.set_screen(Screen::Dashboard(Tab::Cashier));
        } else {
            self.set_screen(Screen::Login);
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, PosError> {
        let user = self.session.login(username, password).await?;
        self.catalog.refresh().await;
        self.set_screen(Screen::Dashboard(Tab::Cashier));
        Ok(user)
    }

    /// Unconditional: clears the session, the cart, and any payment in
    /// progress, then shows the login screen.
    pub fn logout(&self) {
        self.session.logout();
        self.cart.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.payment.cancel();
        self.set_screen(Screen::Login);
        self.emit(AppEvent::SessionEnded);
    }

    pub async fn select_tab(&self, tab: Tab) {
        match tab {
            Tab::Cashier => self.catalog.refresh().await,
            Tab::Reports => self.reports.refresh().await,
        }
        self.set_screen(Screen::Dashboard(tab));
    }

    // -- Component access ---------------------------------------------------

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn reports(&self) -> &Reports {
        &self.reports
    }

    // -- Cart ---------------------------------------------------------------

    /// Add one unit of a catalog item to the cart; returns the resulting
    /// line quantity.
    pub fn add_to_cart(&self, menu_item_id: &str) -> Result<u32, PosError> {
        let item = self
            .catalog
            .find(menu_item_id)
            .ok_or_else(|| PosError::Validation("Menu tidak ditemukan".to_string()))?;
        let mut cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        cart.add_item(&item);
        Ok(cart.quantity_of(menu_item_id))
    }

    pub fn set_cart_quantity(&self, menu_item_id: &str, quantity: i64) {
        self.cart
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set_quantity(menu_item_id, quantity);
    }

    pub fn cart_lines(&self) -> Vec<CartItem> {
        self.cart
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .lines()
            .to_vec()
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.lock().unwrap_or_else(|e| e.into_inner()).total()
    }

    // -- Payment ------------------------------------------------------------

    /// Open the payment modal; rejected with "cart empty" when there is
    /// nothing to pay for.
    pub fn begin_payment(&self) -> Result<PaymentPrompt, PosError> {
        let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        self.payment.begin(&cart)?;
        let total = cart.total();
        Ok(PaymentPrompt {
            total,
            quick_amounts: payment::quick_amounts(total),
        })
    }

    pub fn cancel_payment(&self) {
        self.payment.cancel();
    }

    pub fn payment_stage(&self) -> PaymentStage {
        self.payment.stage()
    }

    /// Validate the tendered cash and submit the order. On success the
    /// cart clears and the settled order (with server-computed change) is
    /// returned for the receipt; on failure the flow returns to
    /// Collecting and the cart stays intact for a retry.
    pub async fn submit_payment(&self, tendered_input: &str) -> Result<Order, PosError> {
        let tendered = payment::parse_tendered(tendered_input)?;

        let (items, total) = {
            let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
            (cart.lines().to_vec(), cart.total())
        };
        payment::validate_tendered(tendered, total)?;

        let cashier = self.session.current_user().ok_or_else(|| {
            PosError::Auth("Sesi berakhir, silakan login kembali".to_string())
        })?;

        self.payment.start_submit()?;

        let draft = OrderDraft {
            items,
            total_amount: total,
            cash_received: tendered,
            cashier_id: cashier.id,
            cashier_name: cashier.name,
        };

        match self.backend.create_order(&draft).await {
            Ok(order) => {
                self.cart.lock().unwrap_or_else(|e| e.into_inner()).clear();
                self.payment.settle();
                if self.screen() == Screen::Dashboard(Tab::Reports) {
                    self.reports.refresh().await;
                }
                self.emit(AppEvent::OrderSettled(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.payment.reject();
                Err(e)
            }
        }
    }
}
