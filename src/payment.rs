//! Cash payment flow.
//!
//! A single payment attempt walks Idle -> Collecting -> Validating ->
//! Submitting -> Settled | Rejected. Validation happens on the cashier's
//! input while Collecting; a rejected submission returns to Collecting
//! with the backend's message and the cart untouched, so the cashier can
//! retry. There is no automatic retry.

use std::sync::Mutex;

use crate::cart::Cart;
use crate::error::PosError;

/// Quick-amount rounding steps, in rupiah.
const QUICK_AMOUNT_STEPS: [f64; 2] = [50_000.0, 100_000.0];

const EMPTY_CART: &str = "Keranjang masih kosong";
const INVALID_AMOUNT: &str = "Jumlah uang tidak valid";
const INSUFFICIENT_CASH: &str = "Uang yang diterima kurang dari total";
const ALREADY_SUBMITTING: &str = "Pembayaran sedang diproses";
const NOT_COLLECTING: &str = "Pembayaran belum dimulai";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStage {
    /// No payment in progress.
    Idle,
    /// The payment modal is open, waiting for cash tendered.
    Collecting,
    /// The order has been posted; the pay control stays disabled until
    /// the backend answers.
    Submitting,
}

pub struct PaymentFlow {
    stage: Mutex<PaymentStage>,
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self {
            stage: Mutex::new(PaymentStage::Idle),
        }
    }

    pub fn stage(&self) -> PaymentStage {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open the payment modal. Entering with an empty cart is rejected
    /// and the flow does not advance.
    pub fn begin(&self, cart: &Cart) -> Result<(), PosError> {
        if cart.is_empty() {
            return Err(PosError::Validation(EMPTY_CART.to_string()));
        }
        let mut stage = self.stage.lock().unwrap_or_else(|e| e.into_inner());
        if *stage == PaymentStage::Submitting {
            return Err(PosError::Validation(ALREADY_SUBMITTING.to_string()));
        }
        *stage = PaymentStage::Collecting;
        Ok(())
    }

    /// Move Collecting -> Submitting. Guards against double submission
    /// while a post is already in flight.
    pub fn start_submit(&self) -> Result<(), PosError> {
        let mut stage = self.stage.lock().unwrap_or_else(|e| e.into_inner());
        match *stage {
            PaymentStage::Collecting => {
                *stage = PaymentStage::Submitting;
                Ok(())
            }
            PaymentStage::Submitting => Err(PosError::Validation(ALREADY_SUBMITTING.to_string())),
            PaymentStage::Idle => Err(PosError::Validation(NOT_COLLECTING.to_string())),
        }
    }

    /// Settled: the order persisted, the modal closes.
    pub fn settle(&self) {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner()) = PaymentStage::Idle;
    }

    /// Rejected: back to Collecting so the cashier may fix and retry.
    pub fn reject(&self) {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner()) = PaymentStage::Collecting;
    }

    /// Close the modal without submitting.
    pub fn cancel(&self) {
        *self.stage.lock().unwrap_or_else(|e| e.into_inner()) = PaymentStage::Idle;
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tendered-cash helpers
// ---------------------------------------------------------------------------

/// Parse the cashier's cash input. Accepts plain numbers and Indonesian
/// thousands grouping ("40.000"), rejects negatives and garbage.
pub fn parse_tendered(input: &str) -> Result<f64, PosError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PosError::Validation(INVALID_AMOUNT.to_string()));
    }

    let candidate = if is_grouped_digits(trimmed) {
        trimmed.replace('.', "")
    } else {
        trimmed.to_string()
    };

    match candidate.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(PosError::Validation(INVALID_AMOUNT.to_string())),
    }
}

/// True for strings like "40.000" or "1.250.000": digit groups of three
/// separated by dots, where the dots are thousands separators rather than
/// a decimal point.
fn is_grouped_digits(s: &str) -> bool {
    let mut groups = s.split('.');
    let first = match groups.next() {
        Some(g) => g,
        None => return false,
    };
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut rest = 0;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        rest += 1;
    }
    rest > 0
}

/// Reject submission whenever the cash tendered does not cover the total.
pub fn validate_tendered(tendered: f64, total: f64) -> Result<(), PosError> {
    if tendered < total {
        return Err(PosError::Validation(INSUFFICIENT_CASH.to_string()));
    }
    Ok(())
}

/// Live change preview: tendered minus total, shown only once the
/// tendered amount covers the total. Never negative.
pub fn change_preview(tendered: f64, total: f64) -> Option<f64> {
    if tendered >= total {
        Some(tendered - total)
    } else {
        None
    }
}

/// Quick-amount suggestions: the exact total, then the total rounded up
/// to the next 50k and 100k, deduplicated by value.
pub fn quick_amounts(total: f64) -> Vec<f64> {
    let mut amounts = vec![total];
    for step in QUICK_AMOUNT_STEPS {
        let rounded = (total / step).ceil() * step;
        if !amounts.iter().any(|a| (a - rounded).abs() < f64::EPSILON) {
            amounts.push(rounded);
        }
    }
    amounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MenuItem;

    fn cart_with_total(price: f64) -> Cart {
        let item = MenuItem {
            id: "m-1".to_string(),
            name: "Nasi Goreng Spesial".to_string(),
            description: String::new(),
            price,
            category: "Nasi Goreng".to_string(),
            image_url: String::new(),
            available: true,
            created_at: None,
        };
        let mut cart = Cart::new();
        cart.add_item(&item);
        cart
    }

    #[test]
    fn empty_cart_cannot_enter_the_flow() {
        let flow = PaymentFlow::new();
        let err = flow.begin(&Cart::new()).expect_err("empty cart rejected");
        assert_eq!(err, PosError::Validation("Keranjang masih kosong".into()));
        assert_eq!(flow.stage(), PaymentStage::Idle);
    }

    #[test]
    fn flow_walks_collect_submit_settle() {
        let flow = PaymentFlow::new();
        flow.begin(&cart_with_total(22000.0)).expect("flow opens");
        assert_eq!(flow.stage(), PaymentStage::Collecting);

        flow.start_submit().expect("submission starts");
        assert_eq!(flow.stage(), PaymentStage::Submitting);

        flow.settle();
        assert_eq!(flow.stage(), PaymentStage::Idle);
    }

    #[test]
    fn double_submission_is_blocked() {
        let flow = PaymentFlow::new();
        flow.begin(&cart_with_total(22000.0)).expect("flow opens");
        flow.start_submit().expect("first submission starts");

        let err = flow.start_submit().expect_err("second submission blocked");
        assert_eq!(err, PosError::Validation("Pembayaran sedang diproses".into()));
    }

    #[test]
    fn rejection_returns_to_collecting_for_a_retry() {
        let flow = PaymentFlow::new();
        flow.begin(&cart_with_total(22000.0)).expect("flow opens");
        flow.start_submit().expect("submission starts");

        flow.reject();
        assert_eq!(flow.stage(), PaymentStage::Collecting);
        flow.start_submit().expect("retry is possible");
    }

    #[test]
    fn cancel_closes_the_modal() {
        let flow = PaymentFlow::new();
        flow.begin(&cart_with_total(22000.0)).expect("flow opens");
        flow.cancel();
        assert_eq!(flow.stage(), PaymentStage::Idle);
    }

    #[test]
    fn submit_without_collecting_is_rejected() {
        let flow = PaymentFlow::new();
        assert!(flow.start_submit().is_err());
    }

    #[test]
    fn parses_plain_and_grouped_amounts() {
        assert_eq!(parse_tendered("40000").expect("plain"), 40000.0);
        assert_eq!(parse_tendered(" 40000 ").expect("trimmed"), 40000.0);
        assert_eq!(parse_tendered("40.000").expect("grouped"), 40000.0);
        assert_eq!(parse_tendered("1.250.000").expect("grouped"), 1250000.0);
    }

    #[test]
    fn rejects_negative_and_malformed_amounts() {
        assert!(parse_tendered("-5000").is_err());
        assert!(parse_tendered("").is_err());
        assert!(parse_tendered("abc").is_err());
        assert!(parse_tendered("NaN").is_err());
    }

    #[test]
    fn decimal_input_is_not_mistaken_for_grouping() {
        // "40.00" has a two-digit group, so the dot is a decimal point.
        assert_eq!(parse_tendered("40.00").expect("decimal"), 40.0);
        assert_eq!(parse_tendered("40.5").expect("decimal"), 40.5);
    }

    #[test]
    fn insufficient_cash_is_rejected_up_to_the_total() {
        let total = 38000.0;
        assert!(validate_tendered(0.0, total).is_err());
        assert!(validate_tendered(37999.0, total).is_err());
        assert!(validate_tendered(total, total).is_ok());
        assert!(validate_tendered(40000.0, total).is_ok());
    }

    #[test]
    fn change_preview_is_never_negative() {
        assert_eq!(change_preview(40000.0, 38000.0), Some(2000.0));
        assert_eq!(change_preview(38000.0, 38000.0), Some(0.0));
        assert_eq!(change_preview(30000.0, 38000.0), None);
    }

    #[test]
    fn quick_amounts_round_up_and_deduplicate() {
        assert_eq!(quick_amounts(38000.0), vec![38000.0, 50000.0, 100000.0]);
        assert_eq!(quick_amounts(120000.0), vec![120000.0, 150000.0, 200000.0]);
        // Totals already on a boundary collapse duplicates.
        assert_eq!(quick_amounts(50000.0), vec![50000.0, 100000.0]);
        assert_eq!(quick_amounts(100000.0), vec![100000.0]);
        assert_eq!(quick_amounts(200000.0), vec![200000.0]);
    }
}
