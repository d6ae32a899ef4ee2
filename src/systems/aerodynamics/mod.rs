//! Vehicle-level aerodynamic coefficients.
//!
//! [`AerodynamicCalculator`] combines a [`StabilityCalculator`] (normal
//! force, moments, CP and damping) with a [`DragCalculator`]. Both come in
//! an extended Barrowman flavour computed from the component tree and a
//! table-backed flavour reading measured data.

pub mod calc;
mod cache;
mod calculator;
mod damping;
pub mod drag;
mod geometry;
mod stability;
pub mod sweep;
mod table;
mod traits;

pub use cache::CacheTracker;
pub use calculator::AerodynamicCalculator;
pub use damping::{damping_multiplier, DampingGeometry};
pub use drag::BarrowmanDragCalculator;
pub use geometry::check_geometry;
pub use stability::BarrowmanStabilityCalculator;
pub use sweep::{grid, sweep, sweep_sequential, SweepPoint, SweepResult};
pub use table::{AeroTable, TableDragCalculator, TableStabilityCalculator};
pub use traits::{DragCalculator, ForceBreakdown, StabilityCalculator};
