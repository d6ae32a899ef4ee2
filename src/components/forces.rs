use serde::{Deserialize, Serialize};

use crate::components::rocket::ComponentId;
use crate::components::{Coordinate, ModId};
use crate::utils::EPSILON;

/// How a drag override applies to the component a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum DragScope {
    /// Drag is computed normally
    #[default]
    Free,
    /// The component carries its own override coefficient
    Overridden(f64),
    /// An ancestor's override covers this component
    OverriddenByAncestor,
}

fn sum(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

macro_rules! coefficient {
    ($(#[$doc:meta])* $field:ident, $setter:ident) => {
        $(#[$doc])*
        pub fn $field(&self) -> Option<f64> {
            self.$field
        }

        pub fn $setter(&mut self, value: f64) {
            if self.$field != Some(value) {
                self.$field = Some(value);
                self.modified();
            }
        }
    };
}

/// Aerodynamic coefficients of one component, assembly or the whole vehicle.
///
/// The center of pressure is stored as a moment (CP scaled by its weight) so
/// that records for several instances combine by plain addition. Fields that
/// have not been computed are `None`; `None` is the identity for [`merge`].
///
/// [`merge`]: AerodynamicForces::merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerodynamicForces {
    /// Component described, `None` for the vehicle total.
    component: Option<ComponentId>,
    drag_scope: DragScope,
    cp_moment: Coordinate,

    cn: Option<f64>,
    cm: Option<f64>,
    c_side: Option<f64>,
    c_yaw: Option<f64>,
    c_roll: Option<f64>,
    c_roll_damp: Option<f64>,
    c_roll_force: Option<f64>,

    friction_cd: Option<f64>,
    pressure_cd: Option<f64>,
    base_cd: Option<f64>,
    override_cd: Option<f64>,
    cd: Option<f64>,
    cd_axial: Option<f64>,

    pitch_damping_moment: Option<f64>,
    yaw_damping_moment: Option<f64>,

    mod_id: ModId,
}

impl Default for AerodynamicForces {
    fn default() -> Self {
        Self {
            component: None,
            drag_scope: DragScope::Free,
            cp_moment: Coordinate::ZERO,
            cn: None,
            cm: None,
            c_side: None,
            c_yaw: None,
            c_roll: None,
            c_roll_damp: None,
            c_roll_force: None,
            friction_cd: None,
            pressure_cd: None,
            base_cd: None,
            override_cd: None,
            cd: None,
            cd_axial: None,
            pitch_damping_moment: None,
            yaw_damping_moment: None,
            mod_id: ModId::new(),
        }
    }
}

impl AerodynamicForces {
    /// Empty record with every coefficient uncomputed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with every coefficient set to zero.
    pub fn zeroed() -> Self {
        let mut forces = Self::new();
        forces.zero();
        forces
    }

    pub fn for_component(component: ComponentId) -> Self {
        let mut forces = Self::zeroed();
        forces.component = Some(component);
        forces
    }

    fn modified(&mut self) {
        self.mod_id = ModId::new();
    }

    pub fn mod_id(&self) -> ModId {
        self.mod_id
    }

    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    pub fn set_component(&mut self, component: Option<ComponentId>) {
        if self.component != component {
            self.component = component;
            self.modified();
        }
    }

    pub fn is_vehicle_total(&self) -> bool {
        self.component.is_none()
    }

    pub fn drag_scope(&self) -> DragScope {
        self.drag_scope
    }

    pub fn set_drag_scope(&mut self, scope: DragScope) {
        if self.drag_scope != scope {
            self.drag_scope = scope;
            self.modified();
        }
    }

    /// Store a center of pressure; its weight becomes CNα.
    pub fn set_cp(&mut self, cp: Coordinate) {
        let moment = Coordinate::new(cp.x * cp.weight, cp.y * cp.weight, cp.z * cp.weight, cp.weight);
        if self.cp_moment != moment {
            self.cp_moment = moment;
            self.modified();
        }
    }

    /// Center of pressure, or the zero coordinate if the weight vanishes.
    pub fn cp(&self) -> Coordinate {
        let w = self.cp_moment.weight;
        if w.abs() < EPSILON {
            return Coordinate::ZERO;
        }
        Coordinate::new(
            self.cp_moment.x / w,
            self.cp_moment.y / w,
            self.cp_moment.z / w,
            w,
        )
    }

    /// Normal force coefficient derivative, the CP weight.
    pub fn cn_alpha(&self) -> f64 {
        self.cp_moment.weight
    }

    coefficient!(
        /// Normal force coefficient
        cn, set_cn
    );
    coefficient!(
        /// Pitching moment coefficient about the reference point
        cm, set_cm
    );
    coefficient!(c_side, set_c_side);
    coefficient!(c_yaw, set_c_yaw);
    coefficient!(
        /// Net roll moment coefficient, forcing minus damping
        c_roll, set_c_roll
    );
    coefficient!(c_roll_damp, set_c_roll_damp);
    coefficient!(c_roll_force, set_c_roll_force);
    coefficient!(cd_axial, set_cd_axial);
    coefficient!(pitch_damping_moment, set_pitch_damping_moment);
    coefficient!(yaw_damping_moment, set_yaw_damping_moment);

    fn overridden(&self) -> bool {
        !matches!(self.drag_scope, DragScope::Free)
    }

    /// Total drag coefficient honoring overrides.
    pub fn cd(&self) -> Option<f64> {
        match self.drag_scope {
            DragScope::OverriddenByAncestor => Some(0.0),
            DragScope::Overridden(cd) => Some(cd),
            DragScope::Free => self.cd,
        }
    }

    pub fn set_cd(&mut self, value: f64) {
        if self.cd != Some(value) {
            self.cd = Some(value);
            self.modified();
        }
    }

    pub fn friction_cd(&self) -> Option<f64> {
        if self.overridden() {
            return Some(0.0);
        }
        self.friction_cd
    }

    pub fn set_friction_cd(&mut self, value: f64) {
        if self.friction_cd != Some(value) {
            self.friction_cd = Some(value);
            self.modified();
        }
    }

    pub fn pressure_cd(&self) -> Option<f64> {
        if self.overridden() {
            return Some(0.0);
        }
        self.pressure_cd
    }

    pub fn set_pressure_cd(&mut self, value: f64) {
        if self.pressure_cd != Some(value) {
            self.pressure_cd = Some(value);
            self.modified();
        }
    }

    pub fn base_cd(&self) -> Option<f64> {
        if self.overridden() {
            return Some(0.0);
        }
        self.base_cd
    }

    pub fn set_base_cd(&mut self, value: f64) {
        if self.base_cd != Some(value) {
            self.base_cd = Some(value);
            self.modified();
        }
    }

    /// Override contribution; only the vehicle total and components owning
    /// an override report one.
    pub fn override_cd(&self) -> Option<f64> {
        match self.drag_scope {
            _ if self.is_vehicle_total() => self.override_cd,
            DragScope::Overridden(_) => self.override_cd,
            _ => Some(0.0),
        }
    }

    pub fn set_override_cd(&mut self, value: f64) {
        if self.override_cd != Some(value) {
            self.override_cd = Some(value);
            self.modified();
        }
    }

    /// Set every coefficient to zero and clear the CP.
    pub fn zero(&mut self) {
        self.cp_moment = Coordinate::ZERO;
        for field in self.fields_mut() {
            *field = Some(0.0);
        }
        self.modified();
    }

    /// Mark every coefficient as uncomputed.
    pub fn reset(&mut self) {
        self.cp_moment = Coordinate::ZERO;
        for field in self.fields_mut() {
            *field = None;
        }
        self.modified();
    }

    fn fields_mut(&mut self) -> [&mut Option<f64>; 15] {
        [
            &mut self.cn,
            &mut self.cm,
            &mut self.c_side,
            &mut self.c_yaw,
            &mut self.c_roll,
            &mut self.c_roll_damp,
            &mut self.c_roll_force,
            &mut self.friction_cd,
            &mut self.pressure_cd,
            &mut self.base_cd,
            &mut self.override_cd,
            &mut self.cd,
            &mut self.cd_axial,
            &mut self.pitch_damping_moment,
            &mut self.yaw_damping_moment,
        ]
    }

    /// Add another record's CP moment and non-axial coefficients.
    ///
    /// Drag fields are left untouched; they are aggregated separately.
    pub fn merge(&mut self, other: &AerodynamicForces) {
        self.cp_moment = self.cp_moment + other.cp_moment;
        self.cn = sum(self.cn, other.cn);
        self.cm = sum(self.cm, other.cm);
        self.c_side = sum(self.c_side, other.c_side);
        self.c_yaw = sum(self.c_yaw, other.c_yaw);
        self.c_roll = sum(self.c_roll, other.c_roll);
        self.c_roll_damp = sum(self.c_roll_damp, other.c_roll_damp);
        self.c_roll_force = sum(self.c_roll_force, other.c_roll_force);
        self.modified();
    }
}
