pub mod components;
pub mod resources;
pub mod systems;
pub mod utils;

pub use components::rocket::{FlightConfiguration, Rocket, RocketComponent};
pub use components::{AerodynamicForces, Coordinate, FlightConditions, Warning, WarningKind, WarningSet};
pub use resources::AeroConfig;
pub use systems::AerodynamicCalculator;
pub use utils::{AeroError, AeroResult};
