use serde::{Deserialize, Serialize};

/// Torque delivered to the two wheels of one axle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifferentialOutput {
    pub left: f32,
    pub right: f32,
}

impl DifferentialOutput {
    pub fn total(&self) -> f32 {
        self.left + self.right
    }
}

/// Limited-slip tuning for one axle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialModel {
    /// Slip difference at which the full axle torque moves to one wheel.
    /// Zero gives an open differential.
    pub slip_limit: f32,
    /// Carried for future clamping; it does not change the split.
    pub transfer_limit: f32,
}

impl Default for DifferentialModel {
    fn default() -> Self {
        Self {
            slip_limit: 1.0,
            transfer_limit: 1.0,
        }
    }
}

impl DifferentialModel {
    pub fn output(&self, slip_left: f32, slip_right: f32, axle_torque: f32) -> DifferentialOutput {
        split(
            slip_left,
            slip_right,
            self.slip_limit,
            axle_torque,
            self.transfer_limit,
        )
    }
}

/// Splits `axle_torque` between two wheels, biasing it toward the wheel with
/// more slip. The bias ramps linearly with the slip difference and saturates
/// once the difference reaches `slip_limit`.
pub fn split(
    slip_left: f32,
    slip_right: f32,
    slip_limit: f32,
    axle_torque: f32,
    _transfer_limit: f32,
) -> DifferentialOutput {
    let half = 0.5 * axle_torque;
    let slip_differential = slip_right - slip_left;

    let transfer = if slip_limit == 0.0 {
        0.0
    } else if slip_differential.abs() <= slip_limit.abs() {
        slip_differential / slip_limit
    } else {
        slip_differential.signum() * slip_limit.signum()
    };

    let adjustment = half * transfer;
    DifferentialOutput {
        left: half - adjustment,
        right: half + adjustment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equal_slip_splits_evenly() {
        for limit in [0.5, 1.0, -2.0] {
            let out = split(0.0, 0.0, limit, 300.0, 1.0);
            assert_eq!(out, DifferentialOutput { left: 150.0, right: 150.0 });
        }
    }

    #[test]
    fn open_differential_ignores_slip() {
        let out = split(0.0, 0.9, 0.0, 300.0, 1.0);
        assert_eq!(out.left, out.right);
    }

    #[test]
    fn saturates_at_slip_limit() {
        let out = split(0.0, 0.4, 0.4, 300.0, 1.0);
        assert_relative_eq!(out.left, 0.0);
        assert_relative_eq!(out.right, 300.0);

        let out = split(0.0, 2.0, 0.4, 300.0, 1.0);
        assert_relative_eq!(out.left, 0.0);
        assert_relative_eq!(out.right, 300.0);

        let out = split(2.0, 0.0, 0.4, 300.0, 1.0);
        assert_relative_eq!(out.left, 300.0);
        assert_relative_eq!(out.right, 0.0);
    }

    #[test]
    fn ramps_linearly_inside_limit() {
        let out = split(0.1, 0.3, 0.8, 400.0, 1.0);
        assert_relative_eq!(out.left, 150.0);
        assert_relative_eq!(out.right, 250.0);
    }

    #[test]
    fn transfer_limit_does_not_change_split() {
        let a = split(0.1, 0.5, 1.0, 400.0, 0.0);
        let b = split(0.1, 0.5, 1.0, 400.0, 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn split_always_sums_to_axle_torque() {
        let slips = [-1.5, -0.3, 0.0, 0.05, 0.7, 3.0];
        let limits = [-1.0, 0.0, 0.2, 1.0];
        for &l in &slips {
            for &r in &slips {
                for &limit in &limits {
                    for torque in [-250.0, 0.0, 475.0] {
                        let out = split(l, r, limit, torque, 1.0);
                        assert_relative_eq!(out.total(), torque, epsilon = 1e-3);
                    }
                }
            }
        }
    }
}
