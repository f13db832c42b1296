//! Utility helpers: the vehicle arena, scoped logging timers and tick profiling.

pub mod allocator;
pub mod logging;
pub mod profiling;

pub use allocator::{Arena, VehicleId};
pub use logging::ScopedTimer;
pub use profiling::TickProfile;
