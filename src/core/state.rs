use serde::{Deserialize, Serialize};

/// Engine speed carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineState {
    pub rpm: f32,
}

/// Selected gear. 0 is reverse, 1..=N are forward gears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearboxState {
    pub gear: usize,
}

impl Default for GearboxState {
    fn default() -> Self {
        Self { gear: 1 }
    }
}

/// Centre steer angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SteeringState {
    pub angle: f32,
}

/// All state a vehicle carries from one tick to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleDynamicsState {
    pub engine: EngineState,
    pub gearbox: GearboxState,
    pub steering: SteeringState,
}
