//! Buyback price calculator.
//!
//! Starts from the like-new catalog price of the requested storage
//! variant and walks the declared condition through a fixed sequence of
//! rules: critical override, functional fault, Face ID, battery,
//! cosmetic matrix, then accessories.  Each rule is applied to the
//! running price, so deductions compound, and each one records the gap
//! it introduced.

use crate::catalog::{is_unset, BuybackRecord, ConditionTier};
use crate::condition::{classify, Severity};
use crate::error::Unpriced;
use crate::models::{BuybackParams, Deduction, PricedQuote, PricingResult};
use tracing::debug;

pub const CRITICAL_LABEL: &str = "Critical Damage / Locked";
pub const FUNCTIONAL_LABEL: &str = "Functional Issues";
pub const FACE_ID_LABEL: &str = "Face ID Fault";
pub const BATTERY_LABEL: &str = "Battery Service";
pub const COSMETIC_LABEL: &str = "Cosmetic Condition";
pub const ACCESSORIES_LABEL: &str = "Missing Accessories";

/// Share of the base price kept for a dead or locked device.
const CRITICAL_RETAINED: f64 = 0.25;
const CRITICAL_DEDUCTED: f64 = 0.75;
const FUNCTIONAL_FACTOR: f64 = 0.60;
const FACE_ID_FACTOR: f64 = 0.50;
const BATTERY_SERVICE_FACTOR: f64 = 0.85;
/// Lowest offer for a device that powers on and is unlocked.
pub const PRICE_FLOOR: f64 = 5.0;
const EXPECTED_CONTROLLERS: i64 = 2;
const CONTROLLER_VALUE: f64 = 30.0;

/// Round to the nearest unit, halves up, clamped at zero.
pub(crate) fn round_amount(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value.round() as u32
}

/// Running price plus the deductions recorded so far.
struct Tally {
    price: f64,
    deductions: Vec<Deduction>,
}

impl Tally {
    fn new(price: f64) -> Self {
        Self {
            price,
            deductions: Vec::new(),
        }
    }

    fn scale(&mut self, factor: f64, label: &str) {
        let before = self.price;
        self.price *= factor;
        self.deductions
            .push(Deduction::new(label, round_amount(before - self.price)));
    }

    /// Subtract a flat amount, recording it only if the rounded price
    /// moved.
    fn subtract(&mut self, amount: f64, label: &str) {
        let before = round_amount(self.price);
        self.price = (self.price - amount).max(0.0);
        let diff = before - round_amount(self.price);
        if diff != 0 {
            self.deductions.push(Deduction::new(label, diff));
        }
    }

    fn finish(self) -> PricedQuote {
        PricedQuote {
            price: round_amount(self.price),
            deductions: self.deductions,
        }
    }
}

/// Like-new base price for `storage`.
pub fn base_price(records: &[BuybackRecord], storage: &str) -> Result<f64, Unpriced> {
    let record = records
        .iter()
        .find(|r| r.storage == storage && r.condition == ConditionTier::LikeNew);
    match record.map(|r| r.price) {
        None => Err(Unpriced::MissingBasePrice {
            storage: storage.to_string(),
        }),
        Some(price) if is_unset(price) => Err(Unpriced::MissingBasePrice {
            storage: storage.to_string(),
        }),
        Some(price) if !price.is_finite() || price < 0.0 => Err(Unpriced::InvalidBasePrice {
            storage: storage.to_string(),
            price,
        }),
        Some(price) => Ok(price),
    }
}

/// Compute a buyback offer from the device's like-new catalog records.
pub fn buyback_quote(params: &BuybackParams, records: &[BuybackRecord]) -> Result<PricedQuote, Unpriced> {
    let base = base_price(records, &params.storage)?;
    let mut tally = Tally::new(base);

    match classify(params) {
        Severity::Critical => {
            tally.price = base * CRITICAL_RETAINED;
            tally
                .deductions
                .push(Deduction::new(CRITICAL_LABEL, round_amount(base * CRITICAL_DEDUCTED)));
        }
        Severity::Graded(grading) => {
            if grading.functional_fault {
                tally.scale(FUNCTIONAL_FACTOR, FUNCTIONAL_LABEL);
            }
            if grading.face_id_fault {
                tally.scale(FACE_ID_FACTOR, FACE_ID_LABEL);
            }
            if grading.battery_service {
                tally.scale(BATTERY_SERVICE_FACTOR, BATTERY_LABEL);
            }
            if grading.cosmetic < 1.0 {
                tally.scale(grading.cosmetic, COSMETIC_LABEL);
            }
            if tally.price < PRICE_FLOOR {
                tally.price = PRICE_FLOOR;
            }
        }
    }

    // Accessories apply on both branches.
    if let Some(count) = params.controller_count {
        let missing = EXPECTED_CONTROLLERS.saturating_sub(count);
        if missing > 0 {
            tally.subtract(missing as f64 * CONTROLLER_VALUE, ACCESSORIES_LABEL);
        }
    }

    Ok(tally.finish())
}

/// Caller-facing buyback calculation.  Never fails: anything that
/// cannot be quoted comes back as `{price: 0, deductions: []}`.
pub fn calculate_buyback_price(params: &BuybackParams, buyback_prices: &[BuybackRecord]) -> PricingResult {
    let outcome = buyback_quote(params, buyback_prices);
    if let Err(reason) = &outcome {
        debug!(storage = %params.storage, %reason, "buyback quote unpriced");
    }
    PricingResult::from(outcome)
}
