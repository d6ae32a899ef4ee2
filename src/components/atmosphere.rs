use serde::{Deserialize, Serialize};

use crate::utils::{AIR_GAS_CONSTANT, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP};

/// Snapshot of the ambient air around the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericConditions {
    /// Static temperature (K)
    pub temperature: f64,
    /// Static pressure (Pa)
    pub pressure: f64,
}

impl Default for AtmosphericConditions {
    fn default() -> Self {
        Self::new(ISA_SEA_LEVEL_TEMP, ISA_SEA_LEVEL_PRESSURE)
    }
}

impl AtmosphericConditions {
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self {
            temperature,
            pressure,
        }
    }

    /// Air density (kg/m^3) from the ideal gas law.
    pub fn density(&self) -> f64 {
        self.pressure / (AIR_GAS_CONSTANT * self.temperature)
    }

    /// Speed of sound (m/s), linearised around standard conditions.
    pub fn speed_of_sound(&self) -> f64 {
        165.77 + 0.606 * self.temperature
    }

    /// Kinematic viscosity (m^2/s).
    pub fn kinematic_viscosity(&self) -> f64 {
        let dynamic_viscosity = 3.7291e-06 + 4.9944e-08 * self.temperature;
        dynamic_viscosity / self.density()
    }
}
