use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{config::GEAR_SELECT_MIN_WHEEL_RPM, core::state::GearboxState};

/// Highest number of forward gears a gearbox can carry.
pub const MAX_FORWARD_GEARS: usize = 10;

/// First gear ratio used when none is configured.
pub const DEFAULT_FIRST_GEAR_RATIO: f32 = 4.2;

/// Configured ratios at or below this are treated as missing.
pub const MISSING_RATIO_EPSILON: f32 = 0.01;

/// Divisor applied to generated intermediate gears, tightening the spacing
/// toward the top gear.
pub const PROGRESSION_FACTOR: f32 = 1.15;

/// Gearbox layout as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GearboxParams {
    pub automatic: bool,
    pub number_of_gears: usize,
    /// Forward ratios starting at first gear. Missing or near-zero entries
    /// are generated.
    pub ratios: Vec<f32>,
    pub reverse_ratio: f32,
    pub final_drive_ratio: f32,
    /// Engine RPM the clutch holds while slipping under throttle.
    pub clutch_lock_rpm: f32,
}

impl Default for GearboxParams {
    fn default() -> Self {
        Self {
            automatic: true,
            number_of_gears: 5,
            ratios: vec![4.23],
            reverse_ratio: -3.4,
            final_drive_ratio: 3.0,
            clutch_lock_rpm: 3000.0,
        }
    }
}

/// Gear ratio table and shift logic. The current gear lives in
/// [`GearboxState`].
#[derive(Debug, Clone)]
pub struct GearboxModel {
    /// Total ratios (gear × final drive), index 0 is reverse.
    total_ratios: Vec<f32>,
    automatic: bool,
    clutch_lock_rpm: f32,
}

impl GearboxModel {
    pub fn new(params: &GearboxParams) -> Self {
        let gears = params.number_of_gears.clamp(1, MAX_FORWARD_GEARS);
        let ratios = generate_ratios(&params.ratios, gears);

        let mut total_ratios = Vec::with_capacity(gears + 1);
        total_ratios.push(params.reverse_ratio * params.final_drive_ratio);
        total_ratios.extend(ratios.iter().map(|ratio| ratio * params.final_drive_ratio));

        if total_ratios[1..].windows(2).any(|pair| pair[1] > pair[0]) {
            warn!("gear ratios are not decreasing: {:?}", &total_ratios[1..]);
        }

        Self {
            total_ratios,
            automatic: params.automatic,
            clutch_lock_rpm: params.clutch_lock_rpm,
        }
    }

    pub fn number_of_gears(&self) -> usize {
        self.total_ratios.len() - 1
    }

    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    pub fn clutch_lock_rpm(&self) -> f32 {
        self.clutch_lock_rpm
    }

    /// Total ratios indexed by gear, reverse first.
    pub fn ratio_table(&self) -> &[f32] {
        &self.total_ratios
    }

    pub fn ratio(&self, gear: usize) -> f32 {
        self.total_ratios[gear.min(self.number_of_gears())]
    }

    pub fn current_ratio(&self, state: &GearboxState) -> f32 {
        self.ratio(state.gear)
    }

    /// Picks the forward gear whose ratio is the highest one that keeps the
    /// engine below `target_rpm` at the given wheel speed. Keeps the current
    /// gear when none qualifies.
    pub fn select_gear(&self, state: &mut GearboxState, wheel_rpm: f32, target_rpm: f32) {
        let wheel_rpm = if wheel_rpm == 0.0 {
            GEAR_SELECT_MIN_WHEEL_RPM
        } else {
            wheel_rpm
        };
        let max_total_ratio = (target_rpm / wheel_rpm).abs();

        let mut selected = state.gear;
        for gear in (1..=self.number_of_gears()).rev() {
            if max_total_ratio > self.total_ratios[gear] {
                selected = gear;
            }
        }
        self.set_gear(state, selected);
    }

    pub fn shift_up(&self, state: &mut GearboxState) {
        if state.gear < self.number_of_gears() {
            self.set_gear(state, state.gear + 1);
        }
    }

    /// Steps down one gear. First gear steps into reverse.
    pub fn shift_down(&self, state: &mut GearboxState) {
        if state.gear > 0 {
            self.set_gear(state, state.gear - 1);
        }
    }

    pub fn select_reverse(&self, state: &mut GearboxState) {
        self.set_gear(state, 0);
    }

    fn set_gear(&self, state: &mut GearboxState, gear: usize) {
        let gear = gear.min(self.number_of_gears());
        if gear != state.gear {
            debug!("gear {} -> {}", state.gear, gear);
            state.gear = gear;
        }
    }
}

/// Fills in missing forward ratios with a progressive spread from first gear
/// down to an implicit 1:1 top gear. Supplied ratios are kept as they are.
fn generate_ratios(configured: &[f32], gears: usize) -> Vec<f32> {
    let first = match configured.first() {
        Some(&ratio) if ratio > MISSING_RATIO_EPSILON => ratio,
        _ => DEFAULT_FIRST_GEAR_RATIO,
    };

    let geometric_factor = if gears > 1 {
        (1.0 / first).powf(1.0 / (gears - 1) as f32)
    } else {
        1.0
    };

    (1..=gears)
        .map(|gear| {
            if gear == 1 {
                return first;
            }
            match configured.get(gear - 1) {
                Some(&ratio) if ratio > MISSING_RATIO_EPSILON => ratio,
                _ => {
                    let ratio = first * geometric_factor.powi(gear as i32 - 1);
                    if gear != gears {
                        ratio / PROGRESSION_FACTOR
                    } else {
                        ratio
                    }
                }
            }
        })
        .collect()
}
