//! Reference scenarios for the public calculator surface.

use pretty_assertions::assert_eq;
use quote_engine::catalog::{BuybackRecord, RepairPriceTable};
use quote_engine::models::{BatteryHealth, BodyState, BuybackParams, RepairParams, ScreenState};
use quote_engine::{calculate_buyback_price, calculate_repair_price, Deduction, PricingResult};

fn catalog() -> Vec<BuybackRecord> {
    vec![BuybackRecord::like_new("128GB", 400.0)]
}

fn healthy() -> BuybackParams {
    BuybackParams {
        storage: "128GB".into(),
        turns_on: Some(true),
        works_correctly: Some(true),
        is_unlocked: Some(true),
        face_id_working: Some(true),
        battery_health: Some(BatteryHealth::Normal),
        screen_state: Some(ScreenState::Flawless),
        body_state: Some(BodyState::Flawless),
        ..Default::default()
    }
}

fn repair_prices() -> RepairPriceTable {
    [
        ("screen_generic", 100.0),
        ("screen_oled", 150.0),
        ("screen_original", 200.0),
        ("battery", 50.0),
    ]
    .into_iter()
    .collect()
}

fn repair(ids: &[&str]) -> RepairParams {
    RepairParams {
        repair_issues: ids.iter().map(|id| id.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn flawless_device_keeps_full_price() {
    assert_eq!(
        calculate_buyback_price(&healthy(), &catalog()),
        PricingResult {
            price: 400,
            deductions: vec![],
        }
    );
}

#[test]
fn cracked_and_dented_device() {
    let params = BuybackParams {
        screen_state: Some(ScreenState::Cracked),
        body_state: Some(BodyState::Dents),
        ..healthy()
    };
    assert_eq!(
        calculate_buyback_price(&params, &catalog()),
        PricingResult {
            price: 100,
            deductions: vec![Deduction::new("Cosmetic Condition", 300)],
        }
    );
}

#[test]
fn device_that_does_not_power_on() {
    let params = BuybackParams {
        turns_on: Some(false),
        ..healthy()
    };
    assert_eq!(
        calculate_buyback_price(&params, &catalog()),
        PricingResult {
            price: 100,
            deductions: vec![Deduction::new("Critical Damage / Locked", 300)],
        }
    );
}

#[test]
fn functional_fault_then_battery_service() {
    let params = BuybackParams {
        works_correctly: Some(false),
        battery_health: Some(BatteryHealth::Service),
        ..healthy()
    };
    assert_eq!(
        calculate_buyback_price(&params, &catalog()),
        PricingResult {
            price: 204,
            deductions: vec![
                Deduction::new("Functional Issues", 160),
                Deduction::new("Battery Service", 36),
            ],
        }
    );
}

#[test]
fn screen_and_battery_bundle() {
    assert_eq!(calculate_repair_price(&repair(&["screen", "battery"]), &repair_prices()), 138);
}

#[test]
fn diagnostic_only_request() {
    assert_eq!(calculate_repair_price(&repair(&["other"]), &repair_prices()), 0);
    assert_eq!(calculate_repair_price(&repair(&["other"]), &RepairPriceTable::new()), 0);
    assert_eq!(calculate_repair_price(&repair(&["screen", "other"]), &repair_prices()), 0);
    assert_eq!(calculate_repair_price(&repair(&["screen"]), &repair_prices()), 100);
}
