use serde::{Deserialize, Serialize};

use crate::components::AtmosphericConditions;
use crate::resources::ConfigError;
use crate::utils::{
    AIR_GAS_CONSTANT, GRAVITY, ISA_LAPSE_RATE, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP,
    ISA_TROPOPAUSE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtmosphereType {
    /// Sea-level conditions at every altitude
    Constant,
    /// International Standard Atmosphere (troposphere + lower stratosphere)
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    pub model_type: AtmosphereType,
    pub sea_level_temperature: f64,
    pub sea_level_pressure: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            model_type: AtmosphereType::Standard,
            sea_level_temperature: ISA_SEA_LEVEL_TEMP,
            sea_level_pressure: ISA_SEA_LEVEL_PRESSURE,
        }
    }
}

impl AtmosphereConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sea_level_temperature <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "sea_level_temperature".to_string(),
                value: self.sea_level_temperature.to_string(),
            });
        }
        if self.sea_level_pressure <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "sea_level_pressure".to_string(),
                value: self.sea_level_pressure.to_string(),
            });
        }
        Ok(())
    }

    /// Atmospheric state at a geometric altitude in metres.
    pub fn conditions_at(&self, altitude: f64) -> AtmosphericConditions {
        match self.model_type {
            AtmosphereType::Constant => {
                AtmosphericConditions::new(self.sea_level_temperature, self.sea_level_pressure)
            }
            AtmosphereType::Standard => {
                let t0 = self.sea_level_temperature;
                let exponent = -GRAVITY / (ISA_LAPSE_RATE * AIR_GAS_CONSTANT);
                let h = altitude.max(0.0);

                if h <= ISA_TROPOPAUSE {
                    let temperature = t0 + ISA_LAPSE_RATE * h;
                    let pressure = self.sea_level_pressure * (temperature / t0).powf(exponent);
                    AtmosphericConditions::new(temperature, pressure)
                } else {
                    // Isothermal layer above the tropopause
                    let t11 = t0 + ISA_LAPSE_RATE * ISA_TROPOPAUSE;
                    let p11 = self.sea_level_pressure * (t11 / t0).powf(exponent);
                    let pressure =
                        p11 * (-GRAVITY * (h - ISA_TROPOPAUSE) / (AIR_GAS_CONSTANT * t11)).exp();
                    AtmosphericConditions::new(t11, pressure)
                }
            }
        }
    }
}
