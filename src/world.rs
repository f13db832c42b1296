use std::time::Instant;

use crate::{
    config::{VehicleConfig, DEFAULT_TIME_STEP},
    core::types::{ChassisState, DriverInput, WheelContactSample, WheelMap},
    error::Result,
    utils::{
        allocator::{Arena, VehicleId},
        logging::{warn_if_tick_budget_exceeded, ScopedTimer},
        profiling::{StageTimer, TickProfile},
    },
    vehicle::{TickOutput, Vehicle},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A vehicle plus the samples it reads and the output it last produced.
/// Inputs and samples persist until the host replaces them.
struct VehicleSlot {
    vehicle: Vehicle,
    input: Option<DriverInput>,
    chassis: ChassisState,
    contacts: WheelMap<WheelContactSample>,
    output: TickOutput,
}

impl VehicleSlot {
    fn tick(&mut self) {
        self.output = self
            .vehicle
            .tick(self.input.as_ref(), &self.chassis, &self.contacts);
    }
}

/// Owns a fleet of vehicles and steps them on a shared fixed tick.
pub struct VehicleWorld {
    vehicles: Arena<VehicleSlot>,
    time_step: f32,
    time_accumulated: f32,
    parallel_enabled: bool,
    profile: TickProfile,
}

impl Default for VehicleWorld {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP)
    }
}

impl VehicleWorld {
    pub fn new(time_step: f32) -> Self {
        let ts = if time_step <= 0.0 {
            DEFAULT_TIME_STEP
        } else {
            time_step
        };

        Self {
            vehicles: Arena::new(),
            time_step: ts,
            time_accumulated: 0.0,
            parallel_enabled: false,
            profile: TickProfile::default(),
        }
    }

    /// Vehicles tick in parallel only when the `parallel` feature is built.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Changes the shared tick. Every vehicle is re-timed.
    pub fn set_time_step(&mut self, time_step: f32) {
        if time_step <= 0.0 {
            return;
        }
        self.time_step = time_step;
        for slot in self.vehicles.iter_mut() {
            slot.vehicle.set_time_step(time_step);
        }
    }

    /// Adds a built vehicle, switching it to the world's tick.
    pub fn add_vehicle(&mut self, mut vehicle: Vehicle) -> VehicleId {
        vehicle.set_time_step(self.time_step);
        self.vehicles.insert(VehicleSlot {
            vehicle,
            input: None,
            chassis: ChassisState::default(),
            contacts: WheelMap::default(),
            output: TickOutput::default(),
        })
    }

    pub fn spawn(&mut self, config: VehicleConfig) -> Result<VehicleId> {
        Ok(self.add_vehicle(Vehicle::new(config)?))
    }

    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.remove(id).map(|slot| slot.vehicle)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id).map(|slot| &slot.vehicle)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id).map(|slot| &mut slot.vehicle)
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.ids()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// `None` detaches the input source. Returns false for a stale id.
    pub fn set_input(&mut self, id: VehicleId, input: Option<DriverInput>) -> bool {
        self.vehicles
            .get_mut(id)
            .map(|slot| slot.input = input)
            .is_some()
    }

    pub fn set_chassis(&mut self, id: VehicleId, chassis: ChassisState) -> bool {
        self.vehicles
            .get_mut(id)
            .map(|slot| slot.chassis = chassis)
            .is_some()
    }

    pub fn set_contacts(&mut self, id: VehicleId, contacts: WheelMap<WheelContactSample>) -> bool {
        self.vehicles
            .get_mut(id)
            .map(|slot| slot.contacts = contacts)
            .is_some()
    }

    /// What the vehicle produced on the most recent tick.
    pub fn output(&self, id: VehicleId) -> Option<&TickOutput> {
        self.vehicles.get(id).map(|slot| &slot.output)
    }

    /// Timing of the most recent [`VehicleWorld::advance`].
    pub fn profile(&self) -> &TickProfile {
        &self.profile
    }

    /// Runs exactly one tick for every vehicle.
    pub fn tick(&mut self) {
        let label = if self.parallel_enabled {
            "world::tick::parallel"
        } else {
            "world::tick::sequential"
        };
        let _timer = ScopedTimer::new(label);
        let _stage = StageTimer::new(&mut self.profile.vehicle_time);

        if self.parallel_enabled {
            tick_parallel(self.vehicles.slots_mut());
        } else {
            for slot in self.vehicles.iter_mut() {
                slot.tick();
            }
        }
    }

    /// Advances by `dt` seconds of host time using a fixed-step accumulator.
    /// Returns how many ticks ran.
    pub fn advance(&mut self, dt: f32) -> usize {
        self.profile.reset();
        self.profile.vehicle_count = self.vehicles.len();
        let start = Instant::now();

        self.time_accumulated += dt.max(0.0);
        let mut ticks = 0;
        while self.time_accumulated >= self.time_step {
            self.time_accumulated -= self.time_step;

            let tick_start = Instant::now();
            self.tick();
            warn_if_tick_budget_exceeded(tick_start.elapsed(), self.time_step);
            ticks += 1;
        }

        self.profile.tick_count = ticks;
        self.profile.total_time = start.elapsed();
        self.profile.report();
        ticks
    }
}

#[cfg(feature = "parallel")]
fn tick_parallel(slots: &mut [Option<VehicleSlot>]) {
    slots
        .par_iter_mut()
        .filter_map(|slot| slot.as_mut())
        .for_each(VehicleSlot::tick);
}

#[cfg(not(feature = "parallel"))]
fn tick_parallel(slots: &mut [Option<VehicleSlot>]) {
    for slot in slots.iter_mut().filter_map(|slot| slot.as_mut()) {
        slot.tick();
    }
}
