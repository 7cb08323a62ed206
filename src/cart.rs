//! In-progress order cart.
//!
//! An ordered collection of lines keyed by menu item id, at most one line
//! per item. Name and price are snapshotted when an item is first added so
//! a catalog refresh mid-order cannot change what the customer is charged.
//! All operations are synchronous state transitions on the UI thread.

use crate::models::{CartItem, MenuItem};

#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a menu item: increments the existing line, or
    /// appends a new line with quantity 1.
    pub fn add_item(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartItem {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
        });
    }

    /// Set a line's quantity. Zero or below removes the line; quantities
    /// never persist at <= 0.
    pub fn set_quantity(&mut self, menu_item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(menu_item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == menu_item_id) {
            line.quantity = quantity as u32;
        }
    }

    pub fn remove_item(&mut self, menu_item_id: &str) {
        self.lines.retain(|l| l.menu_item_id != menu_item_id);
    }

    /// Running total, recomputed on every read.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartItem::subtotal).sum()
    }

    /// Invoked only after a successful order submission (or logout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    pub fn quantity_of(&self, menu_item_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.menu_item_id == menu_item_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }
}
