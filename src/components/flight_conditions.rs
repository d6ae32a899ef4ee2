use std::f64::consts::PI;
use std::fmt;

use crate::components::{AtmosphericConditions, Coordinate, ModId};
use crate::utils::{DEFAULT_MACH, DEFAULT_REFERENCE_LENGTH, EPSILON, MIN_BETA, SMALL_AOA};

/// Callback invoked after every effective change of a [`FlightConditions`].
pub type ConditionsListener = Box<dyn Fn(&FlightConditions) + Send + Sync>;

/// Momentary flight state used by the aerodynamic calculators.
///
/// Reference length and area are two views of one quantity
/// (`area = π (length / 2)²`), as are Mach number and velocity (through the
/// local speed of sound). Setters only take effect, bump the change token
/// and notify listeners when the stored state actually changes.
pub struct FlightConditions {
    ref_length: f64,
    ref_area: f64,

    aoa: f64,
    sin_aoa: f64,
    sinc_aoa: f64,
    theta: f64,

    mach: f64,
    beta: f64,

    roll_rate: f64,
    pitch_rate: f64,
    yaw_rate: f64,
    pitch_center: Coordinate,

    atmosphere: AtmosphericConditions,

    mod_id: ModId,
    listeners: Vec<ConditionsListener>,
}

impl Clone for FlightConditions {
    /// Independent copy; listeners are not carried over.
    fn clone(&self) -> Self {
        Self {
            ref_length: self.ref_length,
            ref_area: self.ref_area,
            aoa: self.aoa,
            sin_aoa: self.sin_aoa,
            sinc_aoa: self.sinc_aoa,
            theta: self.theta,
            mach: self.mach,
            beta: self.beta,
            roll_rate: self.roll_rate,
            pitch_rate: self.pitch_rate,
            yaw_rate: self.yaw_rate,
            pitch_center: self.pitch_center,
            atmosphere: self.atmosphere,
            mod_id: self.mod_id,
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for FlightConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightConditions")
            .field("ref_length", &self.ref_length)
            .field("aoa", &self.aoa)
            .field("theta", &self.theta)
            .field("mach", &self.mach)
            .field("roll_rate", &self.roll_rate)
            .field("pitch_rate", &self.pitch_rate)
            .field("yaw_rate", &self.yaw_rate)
            .field("pitch_center", &self.pitch_center)
            .field("atmosphere", &self.atmosphere)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Degenerate reference lengths fall back to the default so that every
/// coefficient divides by a positive area.
fn usable_ref_length(length: f64) -> f64 {
    if length.is_finite() && length > EPSILON {
        length
    } else {
        DEFAULT_REFERENCE_LENGTH
    }
}

impl Default for FlightConditions {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_LENGTH)
    }
}

impl FlightConditions {
    pub fn new(ref_length: f64) -> Self {
        let ref_length = usable_ref_length(ref_length);
        let mut conditions = Self {
            ref_length,
            ref_area: PI * (ref_length / 2.0).powi(2),
            aoa: 0.0,
            sin_aoa: 0.0,
            sinc_aoa: 1.0,
            theta: 0.0,
            mach: DEFAULT_MACH,
            beta: 1.0,
            roll_rate: 0.0,
            pitch_rate: 0.0,
            yaw_rate: 0.0,
            pitch_center: Coordinate::ZERO,
            atmosphere: AtmosphericConditions::default(),
            mod_id: ModId::new(),
            listeners: Vec::new(),
        };
        conditions.beta = compressibility_factor(conditions.mach);
        conditions
    }

    fn fire_change(&mut self) {
        self.mod_id = ModId::new();
        for listener in &self.listeners {
            listener(&*self);
        }
    }

    pub fn add_listener(&mut self, listener: ConditionsListener) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn mod_id(&self) -> ModId {
        self.mod_id
    }

    pub fn ref_length(&self) -> f64 {
        self.ref_length
    }

    pub fn set_ref_length(&mut self, length: f64) {
        let length = usable_ref_length(length);
        if self.ref_length == length {
            return;
        }
        self.ref_length = length;
        self.ref_area = PI * (length / 2.0).powi(2);
        self.fire_change();
    }

    pub fn ref_area(&self) -> f64 {
        self.ref_area
    }

    pub fn set_ref_area(&mut self, area: f64) {
        if self.ref_area == area {
            return;
        }
        let length = usable_ref_length((area / PI).max(0.0).sqrt() * 2.0);
        if self.ref_length == length {
            return;
        }
        self.ref_length = length;
        self.ref_area = PI * (length / 2.0).powi(2);
        self.fire_change();
    }

    /// Angle of attack in radians, within `[0, π]`.
    pub fn aoa(&self) -> f64 {
        self.aoa
    }

    pub fn set_aoa(&mut self, aoa: f64) {
        let aoa = aoa.clamp(0.0, PI);
        if self.aoa == aoa {
            return;
        }
        self.aoa = aoa;
        if aoa < SMALL_AOA {
            self.sin_aoa = aoa;
            self.sinc_aoa = 1.0;
        } else {
            self.sin_aoa = aoa.sin();
            self.sinc_aoa = self.sin_aoa / aoa;
        }
        self.fire_change();
    }

    pub fn sin_aoa(&self) -> f64 {
        self.sin_aoa
    }

    /// sin(aoa) / aoa, exactly one at zero angle of attack.
    pub fn sinc_aoa(&self) -> f64 {
        self.sinc_aoa
    }

    /// Roll orientation of the lateral wind, in radians.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        if self.theta == theta {
            return;
        }
        self.theta = theta;
        self.fire_change();
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    pub fn set_mach(&mut self, mach: f64) {
        let mach = mach.max(0.0);
        if self.mach == mach {
            return;
        }
        self.mach = mach;
        self.beta = compressibility_factor(mach);
        self.fire_change();
    }

    /// Prandtl-Glauert factor `sqrt(|1 - M²|)`, bounded below.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Airspeed in m/s.
    pub fn velocity(&self) -> f64 {
        self.mach * self.atmosphere.speed_of_sound()
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        let sound = self.atmosphere.speed_of_sound();
        self.set_mach(velocity / sound);
    }

    pub fn roll_rate(&self) -> f64 {
        self.roll_rate
    }

    pub fn set_roll_rate(&mut self, rate: f64) {
        if self.roll_rate == rate {
            return;
        }
        self.roll_rate = rate;
        self.fire_change();
    }

    pub fn pitch_rate(&self) -> f64 {
        self.pitch_rate
    }

    pub fn set_pitch_rate(&mut self, rate: f64) {
        if self.pitch_rate == rate {
            return;
        }
        self.pitch_rate = rate;
        self.fire_change();
    }

    pub fn yaw_rate(&self) -> f64 {
        self.yaw_rate
    }

    pub fn set_yaw_rate(&mut self, rate: f64) {
        if self.yaw_rate == rate {
            return;
        }
        self.yaw_rate = rate;
        self.fire_change();
    }

    /// Point about which pitch and yaw damping are evaluated.
    pub fn pitch_center(&self) -> Coordinate {
        self.pitch_center
    }

    pub fn set_pitch_center(&mut self, center: Coordinate) {
        if self.pitch_center == center {
            return;
        }
        self.pitch_center = center;
        self.fire_change();
    }

    pub fn atmosphere(&self) -> &AtmosphericConditions {
        &self.atmosphere
    }

    /// Replace the atmosphere; the Mach number is kept.
    pub fn set_atmosphere(&mut self, atmosphere: AtmosphericConditions) {
        if self.atmosphere == atmosphere {
            return;
        }
        self.atmosphere = atmosphere;
        self.fire_change();
    }
}

fn compressibility_factor(mach: f64) -> f64 {
    (1.0 - mach * mach).abs().sqrt().max(MIN_BETA)
}
