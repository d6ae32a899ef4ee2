pub mod atmosphere;
pub mod coordinate;
pub mod flight_conditions;
pub mod forces;
pub mod mod_id;
pub mod rocket;
pub mod transform;
pub mod warnings;

pub use atmosphere::AtmosphericConditions;
pub use coordinate::Coordinate;
pub use flight_conditions::{ConditionsListener, FlightConditions};
pub use forces::{AerodynamicForces, DragScope};
pub use mod_id::ModId;
pub use transform::Transformation;
pub use warnings::{DiscardWarnings, Warning, WarningKind, WarningSet, WarningSink};
