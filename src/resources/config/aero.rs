use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resources::ConfigError;
use crate::utils::{
    CP_WEIGHT_EPSILON, DAMPING_BOOST, LENGTH_RESOLUTION, MAX_DAMPING_FINS, STALL_ANGLE,
    WORST_CP_DIVISIONS,
};

/// Tunable constants of the vehicle-level aerodynamic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroConfig {
    /// Vehicle stall angle in radians, used for the stall margin and large-AOA warning.
    pub stall_angle: f64,
    /// Empirical multiplier applied to pitch and yaw damping moments.
    pub damping_boost: f64,
    /// Maximum number of fins per set counted by the damping estimate.
    pub max_damping_fins: usize,
    /// Number of roll orientations sampled when searching for the worst CP.
    pub worst_cp_divisions: usize,
    /// CP samples with a weight at or below this are ignored by the worst-CP search.
    pub cp_weight_epsilon: f64,
    /// Length resolution (m) used when comparing diameters and positions.
    pub length_resolution: f64,
}

impl Default for AeroConfig {
    fn default() -> Self {
        Self {
            stall_angle: STALL_ANGLE,
            damping_boost: DAMPING_BOOST,
            max_damping_fins: MAX_DAMPING_FINS,
            worst_cp_divisions: WORST_CP_DIVISIONS,
            cp_weight_epsilon: CP_WEIGHT_EPSILON,
            length_resolution: LENGTH_RESOLUTION,
        }
    }
}

#[derive(Default, Debug, Serialize, Clone, Deserialize)]
pub struct AeroConfigBuilder {
    pub stall_angle: Option<f64>,
    pub damping_boost: Option<f64>,
    pub max_damping_fins: Option<usize>,
    pub worst_cp_divisions: Option<usize>,
    pub cp_weight_epsilon: Option<f64>,
    pub length_resolution: Option<f64>,
}

impl AeroConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stall_angle(mut self, angle: f64) -> Self {
        self.stall_angle = Some(angle);
        self
    }

    pub fn damping_boost(mut self, boost: f64) -> Self {
        self.damping_boost = Some(boost);
        self
    }

    pub fn max_damping_fins(mut self, fins: usize) -> Self {
        self.max_damping_fins = Some(fins);
        self
    }

    pub fn worst_cp_divisions(mut self, divisions: usize) -> Self {
        self.worst_cp_divisions = Some(divisions);
        self
    }

    pub fn cp_weight_epsilon(mut self, epsilon: f64) -> Self {
        self.cp_weight_epsilon = Some(epsilon);
        self
    }

    pub fn length_resolution(mut self, resolution: f64) -> Self {
        self.length_resolution = Some(resolution);
        self
    }

    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::JsonError(
                "aerodynamics config must be an object".to_string(),
            ));
        }

        let mut builder = Self::new();

        if let Some(stall_angle) = value.get("stall_angle").and_then(|v| v.as_f64()) {
            builder = builder.stall_angle(stall_angle);
        }

        if let Some(boost) = value.get("damping_boost").and_then(|v| v.as_f64()) {
            builder = builder.damping_boost(boost);
        }

        if let Some(fins) = value.get("max_damping_fins").and_then(|v| v.as_u64()) {
            builder = builder.max_damping_fins(fins as usize);
        }

        if let Some(divisions) = value.get("worst_cp_divisions").and_then(|v| v.as_u64()) {
            builder = builder.worst_cp_divisions(divisions as usize);
        }

        if let Some(epsilon) = value.get("cp_weight_epsilon").and_then(|v| v.as_f64()) {
            builder = builder.cp_weight_epsilon(epsilon);
        }

        if let Some(resolution) = value.get("length_resolution").and_then(|v| v.as_f64()) {
            builder = builder.length_resolution(resolution);
        }

        Ok(builder)
    }

    pub fn build(self) -> Result<AeroConfig, ConfigError> {
        let mut config = AeroConfig::default();

        if let Some(stall_angle) = self.stall_angle {
            if !(stall_angle > 0.0 && stall_angle < std::f64::consts::FRAC_PI_2) {
                return Err(ConfigError::InvalidParameter {
                    name: "stall_angle".to_string(),
                    value: stall_angle.to_string(),
                });
            }
            config.stall_angle = stall_angle;
        }
        if let Some(boost) = self.damping_boost {
            if boost < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "damping_boost".to_string(),
                    value: boost.to_string(),
                });
            }
            config.damping_boost = boost;
        }
        if let Some(fins) = self.max_damping_fins {
            config.max_damping_fins = fins;
        }
        if let Some(divisions) = self.worst_cp_divisions {
            if divisions == 0 {
                return Err(ConfigError::ValidationError(
                    "worst_cp_divisions must be at least 1".to_string(),
                ));
            }
            config.worst_cp_divisions = divisions;
        }
        if let Some(epsilon) = self.cp_weight_epsilon {
            config.cp_weight_epsilon = epsilon.abs();
        }
        if let Some(resolution) = self.length_resolution {
            if resolution <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "length_resolution".to_string(),
                    value: resolution.to_string(),
                });
            }
            config.length_resolution = resolution;
        }

        Ok(config)
    }
}
