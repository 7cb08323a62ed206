//! Kasir POS - restaurant cashier terminal.
//!
//! Core components for a single-terminal cashier workflow against the
//! kasir REST backend: session and credential lifecycle, menu catalog,
//! order cart, cash payment flow, sales reporting, and receipt rendering.
//! The binary in `main.rs` wires these into an interactive terminal
//! front-end; any other front-end can drive [`app::App`] the same way and
//! observe state changes through its event subscription.

pub mod api;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod payment;
pub mod receipt;
pub mod reports;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testutil;

pub use api::{ApiClient, Backend};
pub use app::{App, AppEvent, Screen, Tab};
pub use config::Config;
pub use error::PosError;
