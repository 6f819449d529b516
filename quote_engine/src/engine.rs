//! Quote computation engine.
//!
//! The `engine` module turns a [`PricingRequest`] into a
//! [`QuoteResponse`].  It resolves the device in a [`PriceCatalog`]
//! first and only then runs the pure calculators on that snapshot, so
//! fetching and computing never interleave.  Batches are spread across
//! CPU cores with [`rayon`].

use crate::buyback::buyback_quote;
use crate::catalog::{DeviceKey, PriceCatalog};
use crate::config::RepairExtras;
use crate::error::Unpriced;
use crate::models::{PricingRequest, QuoteResponse};
use crate::repair::repair_quote;
use rayon::prelude::*;
use tracing::debug;

/// Quote one request against `catalog`.
pub fn quote(request: &PricingRequest, catalog: &dyn PriceCatalog, extras: &RepairExtras) -> QuoteResponse {
    let unknown = || Unpriced::UnknownDevice(DeviceKey::from(request.device()).to_string());
    let outcome = match request {
        PricingRequest::Buyback(params) => catalog
            .buyback_records(&params.device)
            .ok_or_else(unknown)
            .and_then(|records| buyback_quote(params, records)),
        PricingRequest::Repair(params) => catalog
            .repair_prices(&params.device)
            .ok_or_else(unknown)
            .and_then(|prices| repair_quote(params, prices, extras)),
    };
    if let Err(reason) = &outcome {
        debug!(kind = %request.kind(), %reason, "quote unpriced");
    }
    QuoteResponse::from_outcome(request.kind(), outcome)
}

/// Quote every request in parallel.  Results keep the input order.
pub fn quote_batch(
    requests: &[PricingRequest],
    catalog: &dyn PriceCatalog,
    extras: &RepairExtras,
) -> Vec<QuoteResponse> {
    requests
        .par_iter()
        .map(|request| quote(request, catalog, extras))
        .collect()
}
