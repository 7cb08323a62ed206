//! Receipt rendering for a settled order.
//!
//! Pure text layout at a fixed paper width; every amount on the receipt
//! comes from the server-returned order (the client never recomputes the
//! total or the change for the final record). Printing is delegated to
//! the host's print facility behind [`ReceiptPrinter`].

use std::io::Write;

use chrono::Local;

use crate::error::PosError;
use crate::format::{format_order_date, format_rupiah};
use crate::models::Order;

#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub store_name: String,
    pub paper_width: usize,
    pub footer_text: Option<String>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            store_name: "Kasir Indonesia".to_string(),
            paper_width: 32,
            footer_text: Some("Terima kasih atas kunjungan Anda".to_string()),
        }
    }
}

/// Host print facility. The terminal ships a console implementation; a
/// real deployment substitutes the printer spooler.
pub trait ReceiptPrinter: Send + Sync {
    fn print(&self, rendered: &str) -> Result<(), PosError>;
}

/// Prints receipts to standard output.
pub struct ConsolePrinter;

impl ReceiptPrinter for ConsolePrinter {
    fn print(&self, rendered: &str) -> Result<(), PosError> {
        let mut out = std::io::stdout().lock();
        out.write_all(rendered.as_bytes())
            .and_then(|()| out.write_all(b"\n"))
            .map_err(|e| PosError::Print(format!("Gagal mencetak struk: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn rule(width: usize) -> String {
    "-".repeat(width)
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Label on the left, amount right-aligned to the paper edge.
fn amount_row(label: &str, amount: &str, width: usize) -> String {
    let used = label.chars().count() + amount.chars().count();
    if used >= width {
        return format!("{label} {amount}");
    }
    format!("{label}{}{amount}", " ".repeat(width - used))
}

/// Render a settled order as receipt text.
pub fn render_receipt(order: &Order, cfg: &ReceiptConfig) -> String {
    let width = cfg.paper_width;
    let mut lines: Vec<String> = Vec::new();

    lines.push(center(&cfg.store_name, width));
    lines.push(rule(width));

    let short_id: String = order.id.chars().take(8).collect();
    lines.push(format!("No. Order : {short_id}"));
    lines.push(format!("Kasir     : {}", order.cashier_name));
    lines.push(format!(
        "Tanggal   : {}",
        format_order_date(&order.order_date.with_timezone(&Local))
    ));
    lines.push(rule(width));

    for item in &order.items {
        lines.push(item.name.clone());
        lines.push(amount_row(
            &format!("  {} x {}", item.quantity, format_rupiah(item.price)),
            &format_rupiah(item.subtotal()),
            width,
        ));
    }
    lines.push(rule(width));

    lines.push(amount_row(
        "Total",
        &format_rupiah(order.total_amount),
        width,
    ));
    lines.push(amount_row(
        "Tunai",
        &format_rupiah(order.cash_received),
        width,
    ));
    lines.push(amount_row(
        "Kembalian",
        &format_rupiah(order.change_amount),
        width,
    ));

    if let Some(footer) = &cfg.footer_text {
        lines.push(rule(width));
        lines.push(center(footer, width));
    }

    lines.join("\n")
}
