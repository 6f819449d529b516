//! Condition classification for buyback quotes.
//!
//! Buyback pricing is not a lookup of a condition tier in the catalog.
//! The declared condition is classified here into either a critical
//! failure, which overrides every other rule, or a grading that lists
//! which deductions apply and the cosmetic multiplier to use.

use crate::models::{BatteryHealth, BodyState, BuybackParams, ScreenState};

/// Multiplier for any screen/body combination outside the matrix,
/// including an unanswered screen or body question.
pub const FALLBACK_MULTIPLIER: f64 = 0.25;

/// Cosmetic multiplier for a screen/body combination.
///
/// | screen \ body | flawless | scratches | dents | bent |
/// |---|---|---|---|---|
/// | flawless  | 1.00 | 0.80 | 0.65 | 0.40 |
/// | scratches | 0.75 | 0.65 | 0.50 | 0.30 |
/// | cracked   | 0.40 | 0.35 | 0.25 | 0.20 |
pub fn cosmetic_multiplier(screen: Option<ScreenState>, body: Option<BodyState>) -> f64 {
    use BodyState as B;
    use ScreenState as S;

    match (screen, body) {
        (Some(S::Flawless), Some(B::Flawless)) => 1.00,
        (Some(S::Flawless), Some(B::Scratches)) => 0.80,
        (Some(S::Flawless), Some(B::Dents)) => 0.65,
        (Some(S::Flawless), Some(B::Bent)) => 0.40,
        (Some(S::Scratches), Some(B::Flawless)) => 0.75,
        (Some(S::Scratches), Some(B::Scratches)) => 0.65,
        (Some(S::Scratches), Some(B::Dents)) => 0.50,
        (Some(S::Scratches), Some(B::Bent)) => 0.30,
        (Some(S::Cracked), Some(B::Flawless)) => 0.40,
        (Some(S::Cracked), Some(B::Scratches)) => 0.35,
        (Some(S::Cracked), Some(B::Dents)) => 0.25,
        (Some(S::Cracked), Some(B::Bent)) => 0.20,
        _ => FALLBACK_MULTIPLIER,
    }
}

/// Outcome of classifying a device's declared condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    /// Does not power on, or is locked.  Bypasses the grading entirely.
    Critical,
    Graded(Grading),
}

/// Deductions that apply to a device which powers on and is unlocked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grading {
    pub functional_fault: bool,
    pub face_id_fault: bool,
    pub battery_service: bool,
    pub cosmetic: f64,
}

impl Grading {
    pub fn is_like_new(&self) -> bool {
        !self.functional_fault && !self.face_id_fault && !self.battery_service && self.cosmetic >= 1.0
    }
}

/// Classify the declared condition.  Only an explicit `false` counts
/// as a failure; `None` means the question was not answered.
pub fn classify(params: &BuybackParams) -> Severity {
    if params.turns_on == Some(false) || params.is_unlocked == Some(false) {
        return Severity::Critical;
    }
    Severity::Graded(Grading {
        functional_fault: params.works_correctly == Some(false),
        face_id_fault: params.face_id_working == Some(false),
        battery_service: params.battery_health == Some(BatteryHealth::Service),
        cosmetic: cosmetic_multiplier(params.screen_state, params.body_state),
    })
}
