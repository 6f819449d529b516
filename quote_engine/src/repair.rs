//! Repair price calculator.
//!
//! Each requested issue is resolved to a unit price, the prices are
//! ranked from most to least expensive, and a bundle discount is applied
//! by rank: the most expensive repair is charged in full, the second at
//! 75% and every further one at 50%.  Flat fees are added last.

use crate::buyback::round_amount;
use crate::catalog::{is_unset, RepairPriceTable};
use crate::config::RepairExtras;
use crate::error::Unpriced;
use crate::models::{PricedQuote, RepairParams, ScreenQuality};
use tracing::debug;

/// Issue id for "needs inspection".  Its presence forces price 0.
pub const DIAGNOSTIC_ISSUE: &str = "other";
pub const SCREEN_ISSUE: &str = "screen";
pub const BATTERY_ISSUE: &str = "battery";

/// Candidates when no screen grade was selected; the cheapest wins.
const SCREEN_VARIANTS: [&str; 4] = ["screen_generic", "screen_original", "screen_oled", "screen"];
const BATTERY_FALLBACKS: [&str; 3] = ["battery", "battery_original", "battery_generic"];

/// Share of the unit price charged at each rank.
pub fn bundle_rate(rank: usize) -> f64 {
    match rank {
        0 => 1.0,
        1 => 0.75,
        _ => 0.5,
    }
}

/// Unit price of one issue, `0.0` when the catalog cannot price it.
pub fn resolve_issue_price(issue: &str, quality: Option<ScreenQuality>, prices: &RepairPriceTable) -> f64 {
    match issue {
        SCREEN_ISSUE => match quality {
            Some(quality) => prices.get(quality.price_key()).unwrap_or(0.0),
            None => cheapest_screen(prices),
        },
        // Falls through on missing keys only; a listed 0 is kept.
        BATTERY_ISSUE => BATTERY_FALLBACKS
            .iter()
            .find_map(|key| prices.get(key))
            .unwrap_or(0.0),
        other => prices.get(other).unwrap_or(0.0),
    }
}

fn cheapest_screen(prices: &RepairPriceTable) -> f64 {
    SCREEN_VARIANTS
        .iter()
        .filter_map(|key| prices.get(key))
        .filter(|price| *price > 0.0)
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(0.0)
}

/// Sum of the rank-discounted prices, each rounded before summing.
pub fn bundle_total(unit_prices: &mut [f64]) -> f64 {
    unit_prices.sort_by(|a, b| b.total_cmp(a));
    unit_prices
        .iter()
        .enumerate()
        .map(|(rank, price)| (price * bundle_rate(rank)).round())
        .sum()
}

/// Compute a repair quote against a device's price table.
pub fn repair_quote(
    params: &RepairParams,
    prices: &RepairPriceTable,
    extras: &RepairExtras,
) -> Result<PricedQuote, Unpriced> {
    if params.repair_issues.is_empty() {
        return Err(Unpriced::NoIssues);
    }
    if params.repair_issues.contains(DIAGNOSTIC_ISSUE) {
        return Err(Unpriced::NeedsInspection);
    }

    // One unpriced issue invalidates the whole bundle.
    let mut unit_prices = params
        .repair_issues
        .iter()
        .map(|issue| {
            let price = resolve_issue_price(issue, params.selected_screen_quality, prices);
            if is_unset(price) {
                Err(Unpriced::MissingIssuePrice {
                    issue: issue.clone(),
                })
            } else {
                Ok(price)
            }
        })
        .collect::<Result<Vec<f64>, Unpriced>>()?;

    let total = bundle_total(&mut unit_prices) + extras.surcharge(params);
    Ok(PricedQuote {
        price: round_amount(total),
        deductions: Vec::new(),
    })
}

/// Caller-facing repair calculation with the default flat fees.
/// Returns 0 whenever the request cannot be quoted.
pub fn calculate_repair_price(params: &RepairParams, repair_prices: &RepairPriceTable) -> u32 {
    calculate_repair_price_with(params, repair_prices, &RepairExtras::default())
}

pub fn calculate_repair_price_with(
    params: &RepairParams,
    repair_prices: &RepairPriceTable,
    extras: &RepairExtras,
) -> u32 {
    match repair_quote(params, repair_prices, extras) {
        Ok(quote) => quote.price,
        Err(reason) => {
            debug!(issues = params.repair_issues.len(), %reason, "repair quote unpriced");
            0
        }
    }
}
