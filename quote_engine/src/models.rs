//! Data models for the Quote Engine.
//!
//! The `models` module defines the serialisable requests and results
//! exchanged with the pricing calculators.  Field names follow the
//! storefront's JSON conventions (`turnsOn`, `screenState`,
//! `repairIssues`, ...), so a quote form can be posted as-is.
//!
//! Condition flags are `Option<bool>`: an unanswered question is
//! `None` and is treated as "assume fine".  Only an explicit `false`
//! selects a deduction path.

use crate::error::Unpriced;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifies the device being quoted.  These strings only serve as
/// catalog lookup keys and never enter the arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceRef {
    pub brand: String,
    pub model: String,
    /// e.g. `"smartphone"`, `"tablet"`, `"console"`.
    pub device_type: String,
}

/// Declared state of the display glass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenState {
    Flawless,
    Scratches,
    Cracked,
}

/// Declared state of the housing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyState {
    Flawless,
    Scratches,
    Dents,
    Bent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryHealth {
    Normal,
    /// The OS reports the battery as needing service.
    Service,
}

/// Replacement screen grade chosen by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenQuality {
    Generic,
    Oled,
    Original,
}

impl ScreenQuality {
    /// Key of this variant in a device's repair price table.
    pub fn price_key(self) -> &'static str {
        match self {
            ScreenQuality::Generic => "screen_generic",
            ScreenQuality::Oled => "screen_oled",
            ScreenQuality::Original => "screen_original",
        }
    }
}

impl FromStr for ScreenQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(ScreenQuality::Generic),
            "oled" => Ok(ScreenQuality::Oled),
            "original" => Ok(ScreenQuality::Original),
            other => Err(format!("unknown screen quality {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Courier,
    Shop,
    Post,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierTier {
    Brussels,
    National,
    #[serde(other)]
    Other,
}

/// Parameters of a buyback (we buy the device) quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuybackParams {
    #[serde(flatten)]
    pub device: DeviceRef,
    /// Storage variant key such as `"128GB"`.
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub turns_on: Option<bool>,
    #[serde(default)]
    pub works_correctly: Option<bool>,
    #[serde(default)]
    pub is_unlocked: Option<bool>,
    #[serde(default)]
    pub face_id_working: Option<bool>,
    #[serde(default)]
    pub battery_health: Option<BatteryHealth>,
    #[serde(default)]
    pub screen_state: Option<ScreenState>,
    #[serde(default)]
    pub body_state: Option<BodyState>,
    /// Number of controllers handed in with a console.
    #[serde(default)]
    pub controller_count: Option<i64>,
}

/// Parameters of a repair quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairParams {
    #[serde(flatten)]
    pub device: DeviceRef,
    /// Issue identifiers such as `"screen"`, `"battery"`, `"charging"`.
    #[serde(default)]
    pub repair_issues: BTreeSet<String>,
    /// `""` on the wire means the customer did not pick a grade.
    #[serde(default, deserialize_with = "quality_or_blank")]
    pub selected_screen_quality: Option<ScreenQuality>,
    #[serde(default)]
    pub has_hydrogel: bool,
    #[serde(default)]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default)]
    pub courier_tier: Option<CourierTier>,
}

fn quality_or_blank<'de, D>(deserializer: D) -> Result<Option<ScreenQuality>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A quote request, tagged on the wire by `"kind"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PricingRequest {
    Buyback(BuybackParams),
    Repair(RepairParams),
}

impl PricingRequest {
    pub fn kind(&self) -> QuoteKind {
        match self {
            PricingRequest::Buyback(_) => QuoteKind::Buyback,
            PricingRequest::Repair(_) => QuoteKind::Repair,
        }
    }

    pub fn device(&self) -> &DeviceRef {
        match self {
            PricingRequest::Buyback(params) => &params.device,
            PricingRequest::Repair(params) => &params.device,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    Buyback,
    Repair,
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteKind::Buyback => write!(f, "buyback"),
            QuoteKind::Repair => write!(f, "repair"),
        }
    }
}

/// One itemised reduction of a buyback offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub label: String,
    pub amount: u32,
}

impl Deduction {
    pub fn new(label: impl Into<String>, amount: u32) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A successfully computed quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedQuote {
    pub price: u32,
    /// In application order.  Always empty for repairs.
    pub deductions: Vec<Deduction>,
}

/// Caller-facing buyback result.  A `price` of 0 means "cannot quote",
/// never a literal zero-value offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub price: u32,
    pub deductions: Vec<Deduction>,
}

impl PricingResult {
    pub fn unpriced() -> Self {
        Self::default()
    }
}

impl From<Result<PricedQuote, Unpriced>> for PricingResult {
    fn from(outcome: Result<PricedQuote, Unpriced>) -> Self {
        match outcome {
            Ok(quote) => PricingResult {
                price: quote.price,
                deductions: quote.deductions,
            },
            Err(_) => PricingResult::unpriced(),
        }
    }
}

/// Response returned by the engine and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub kind: QuoteKind,
    pub price: u32,
    pub deductions: Vec<Deduction>,
    /// `false` when `price` is the 0 "cannot quote" sentinel.
    pub quoted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl QuoteResponse {
    pub fn from_outcome(kind: QuoteKind, outcome: Result<PricedQuote, Unpriced>) -> Self {
        match outcome {
            Ok(quote) => QuoteResponse {
                kind,
                price: quote.price,
                deductions: quote.deductions,
                quoted: true,
                reason: None,
            },
            Err(reason) => QuoteResponse {
                kind,
                price: 0,
                deductions: Vec::new(),
                quoted: false,
                reason: Some(reason.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<PricingRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<QuoteResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn buyback_request_reads_storefront_fields() {
        let request: PricingRequest = serde_json::from_value(json!({
            "kind": "buyback",
            "brand": "Apple",
            "model": "iPhone 13",
            "deviceType": "smartphone",
            "storage": "128GB",
            "turnsOn": true,
            "faceIdWorking": false,
            "batteryHealth": "service",
            "screenState": "cracked",
            "bodyState": "dents",
            "controllerCount": null
        }))
        .unwrap();

        let PricingRequest::Buyback(params) = request else {
            panic!("expected a buyback request");
        };
        assert_eq!(params.device.model, "iPhone 13");
        assert_eq!(params.turns_on, Some(true));
        assert_eq!(params.works_correctly, None);
        assert_eq!(params.face_id_working, Some(false));
        assert_eq!(params.battery_health, Some(BatteryHealth::Service));
        assert_eq!(params.screen_state, Some(ScreenState::Cracked));
        assert_eq!(params.body_state, Some(BodyState::Dents));
        assert_eq!(params.controller_count, None);
    }

    #[test]
    fn blank_screen_quality_means_unselected() {
        let request: PricingRequest = serde_json::from_value(json!({
            "kind": "repair",
            "brand": "Samsung",
            "model": "Galaxy S21",
            "deviceType": "smartphone",
            "repairIssues": ["screen", "battery"],
            "selectedScreenQuality": "",
            "deliveryMethod": "courier",
            "courierTier": "brussels"
        }))
        .unwrap();

        let PricingRequest::Repair(params) = request else {
            panic!("expected a repair request");
        };
        assert_eq!(params.selected_screen_quality, None);
        assert_eq!(params.repair_issues.len(), 2);
        assert_eq!(params.delivery_method, Some(DeliveryMethod::Courier));
        assert_eq!(params.courier_tier, Some(CourierTier::Brussels));
        assert!(!params.has_hydrogel);
    }

    #[test]
    fn unknown_delivery_method_is_tolerated() {
        let params: RepairParams = serde_json::from_value(json!({
            "repairIssues": ["battery"],
            "selectedScreenQuality": "OLED",
            "deliveryMethod": "drone"
        }))
        .unwrap();
        assert_eq!(params.delivery_method, Some(DeliveryMethod::Other));
        assert_eq!(params.selected_screen_quality, Some(ScreenQuality::Oled));
    }

    #[test]
    fn unknown_screen_quality_is_rejected() {
        let result = serde_json::from_value::<RepairParams>(json!({
            "repairIssues": ["screen"],
            "selectedScreenQuality": "refurbished"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unpriced_outcome_collapses_to_zero() {
        let result = PricingResult::from(Err(Unpriced::NoIssues));
        assert_eq!(result, PricingResult::unpriced());

        let response = QuoteResponse::from_outcome(QuoteKind::Repair, Err(Unpriced::NeedsInspection));
        assert_eq!(response.price, 0);
        assert!(!response.quoted);
        assert!(response.reason.is_some());
    }
}
