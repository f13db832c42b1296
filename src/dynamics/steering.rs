use serde::{Deserialize, Serialize};

use crate::{config::STEER_DEADZONE, core::state::SteeringState};

/// Steering rates are in degrees per second, angles in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Largest centre angle the wheels can reach.
    pub lock: f32,
    /// Re-centring rate without input, at standstill.
    pub return_rate_low: f32,
    /// Re-centring rate without input, at and above `high_speed`.
    pub return_rate_high: f32,
    pub adjust_rate_low: f32,
    pub adjust_rate_high: f32,
    /// Speed (m/s) at which steering sensitivity bottoms out.
    pub high_speed: f32,
    pub assist: bool,
    /// Lateral slip (degrees) beyond which assist refuses more lock.
    pub assist_max_slip: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            lock: 30.0,
            return_rate_low: 40.0,
            return_rate_high: 20.0,
            adjust_rate_low: 40.0,
            adjust_rate_high: 40.0,
            high_speed: 15.0,
            assist: true,
            assist_max_slip: 4.5,
        }
    }
}

/// Rate- and slip-limited steering with Ackermann correction.
#[derive(Debug, Clone)]
pub struct SteeringModel {
    params: SteeringParams,
    assist_max_slip_rad: f32,
    time_step: f32,
}

impl SteeringModel {
    pub fn new(params: &SteeringParams, time_step: f32) -> Self {
        Self {
            params: *params,
            assist_max_slip_rad: params.assist_max_slip.to_radians(),
            time_step,
        }
    }

    /// Rates are stored per second and scaled by the tick length on use.
    pub fn set_time_step(&mut self, time_step: f32) {
        self.time_step = time_step;
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn lock(&self) -> f32 {
        self.params.lock
    }

    /// `(adjust, return)` steps in degrees per tick at `velocity`. A
    /// non-positive `high_speed` means the high-speed rates always apply.
    pub fn rates_per_tick(&self, velocity: f32) -> (f32, f32) {
        let p = &self.params;
        let low_speed = if p.high_speed > 0.0 {
            1.0 - (velocity / p.high_speed).abs().clamp(0.0, 1.0)
        } else {
            0.0
        };
        let adjust = p.adjust_rate_high + (p.adjust_rate_low - p.adjust_rate_high) * low_speed;
        let ret = p.return_rate_high + (p.return_rate_low - p.return_rate_high) * low_speed;
        (adjust * self.time_step, ret * self.time_step)
    }

    /// Next centre steer angle from `current_angle`.
    ///
    /// `front_lateral_slip` holds the lateral slip (radians) of the front
    /// left and right wheels.
    pub fn steer_angle(
        &self,
        velocity: f32,
        input: f32,
        current_angle: f32,
        front_lateral_slip: [f32; 2],
    ) -> f32 {
        let (adjust, ret) = self.rates_per_tick(velocity);

        if input.abs() < STEER_DEADZONE {
            return if current_angle.abs() > ret {
                current_angle - ret * current_angle.signum()
            } else {
                0.0
            };
        }

        let direction = input.signum();
        let mut proposed = current_angle + adjust * direction;
        if proposed.abs() > self.params.lock {
            proposed = self.params.lock * direction;
        }

        // Refuse more lock while a front wheel already slides against the
        // requested direction.
        let sliding_against = front_lateral_slip
            .iter()
            .any(|&slip| slip.abs() > self.assist_max_slip_rad && slip.signum() * direction < 0.0);
        if self.params.assist && sliding_against {
            return current_angle;
        }

        proposed
    }

    /// Advances `state` by one tick.
    pub fn update(
        &self,
        state: &mut SteeringState,
        velocity: f32,
        input: f32,
        front_lateral_slip: [f32; 2],
    ) -> f32 {
        state.angle = self.steer_angle(velocity, input, state.angle, front_lateral_slip);
        state.angle
    }

    /// `(left, right)` wheel angles for a centre angle.
    pub fn wheel_angles(&self, center_angle: f32, wheelbase: f32, track: f32) -> (f32, f32) {
        (
            ackermann_angle(center_angle, wheelbase, track, true),
            ackermann_angle(center_angle, wheelbase, track, false),
        )
    }
}

/// Ackermann-corrected angle (degrees) for one front wheel. The left wheel
/// adds the track width to the turn radius, the right wheel subtracts it.
pub fn ackermann_angle(center_angle: f32, wheelbase: f32, track: f32, is_left: bool) -> f32 {
    if center_angle == 0.0 {
        return 0.0;
    }
    let turn_radius = wheelbase / center_angle.to_radians().tan();
    let radius = if is_left {
        turn_radius + track
    } else {
        turn_radius - track
    };
    (wheelbase / radius).atan().to_degrees()
}
