//! Arm-dependent result trends across visits.

use trialsim_model::TreatmentArm;

use crate::random::RandomSource;

/// Active-arm window: visits from `first_visit` onward scale the baseline by
/// `factor` and add a uniform draw in `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendWindow {
    pub first_visit: u32,
    pub factor: f64,
    pub low: f64,
    pub high: f64,
}

/// Ordered by `first_visit`; visit 0 always reports the baseline.
pub const ACTIVE_WINDOWS: [TrendWindow; 4] = [
    TrendWindow {
        first_visit: 1,
        factor: 0.975,
        low: -3.0,
        high: 2.0,
    },
    TrendWindow {
        first_visit: 5,
        factor: 0.95,
        low: -5.0,
        high: 1.0,
    },
    TrendWindow {
        first_visit: 8,
        factor: 0.925,
        low: -7.0,
        high: 0.0,
    },
    TrendWindow {
        first_visit: 11,
        factor: 0.9,
        low: -10.0,
        high: -3.0,
    },
];

/// Placebo results wander around the baseline by up to this much.
pub const PLACEBO_SPREAD: f64 = 5.0;

/// Window that applies to an Active-arm visit, if any.
pub fn active_window(visit: u32) -> Option<&'static TrendWindow> {
    ACTIVE_WINDOWS
        .iter()
        .rev()
        .find(|window| visit >= window.first_visit)
}

/// Result for one visit. Visit 0 consumes no draw.
pub fn result_for_visit<R: RandomSource + ?Sized>(
    baseline: f64,
    visit: u32,
    arm: TreatmentArm,
    rng: &mut R,
) -> f64 {
    if visit == 0 {
        return baseline;
    }
    match arm {
        TreatmentArm::Placebo => baseline + rng.uniform_real(-PLACEBO_SPREAD, PLACEBO_SPREAD),
        TreatmentArm::Active => match active_window(visit) {
            Some(window) => baseline * window.factor + rng.uniform_real(window.low, window.high),
            None => baseline,
        },
    }
}
