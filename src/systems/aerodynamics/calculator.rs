use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;

use crate::components::rocket::{ComponentId, FlightConfiguration};
use crate::components::{
    AerodynamicForces, Coordinate, DiscardWarnings, DragScope, FlightConditions, WarningSink,
};
use crate::resources::AeroConfig;
use crate::systems::aerodynamics::cache::CacheTracker;
use crate::systems::aerodynamics::drag::BarrowmanDragCalculator;
use crate::systems::aerodynamics::stability::BarrowmanStabilityCalculator;
use crate::systems::aerodynamics::table::{AeroTable, TableDragCalculator, TableStabilityCalculator};
use crate::systems::aerodynamics::traits::{DragCalculator, StabilityCalculator};
use crate::utils::AeroResult;

fn with_sink<R>(warnings: Option<&mut dyn WarningSink>, f: impl FnOnce(&mut dyn WarningSink) -> R) -> R {
    match warnings {
        Some(warnings) => f(warnings),
        None => f(&mut DiscardWarnings),
    }
}

/// Entry point used by the simulator.
///
/// Pairs a stability provider with a drag provider and discards their
/// cached state whenever the configuration's change tokens move.
pub struct AerodynamicCalculator {
    stability: Box<dyn StabilityCalculator>,
    drag: Box<dyn DragCalculator>,
    config: AeroConfig,
    tracker: CacheTracker,
}

impl AerodynamicCalculator {
    pub fn new(stability: Box<dyn StabilityCalculator>, drag: Box<dyn DragCalculator>) -> Self {
        Self {
            stability,
            drag,
            config: AeroConfig::default(),
            tracker: CacheTracker::new(),
        }
    }

    /// Extended Barrowman calculator with default settings.
    pub fn barrowman() -> Self {
        Self::with_config(AeroConfig::default())
    }

    pub fn with_config(config: AeroConfig) -> Self {
        Self {
            stability: Box::new(BarrowmanStabilityCalculator::with_config(config.clone())),
            drag: Box::new(BarrowmanDragCalculator::new()),
            config,
            tracker: CacheTracker::new(),
        }
    }

    /// Calculator reading every coefficient from measured data.
    ///
    /// The table is validated first; a malformed one is an
    /// [`AeroError::InvalidTable`](crate::utils::AeroError::InvalidTable).
    pub fn from_table(table: AeroTable) -> AeroResult<Self> {
        let table = Arc::new(table);
        Ok(Self::new(
            Box::new(TableStabilityCalculator::new(table.clone())?),
            Box::new(TableDragCalculator::new(table)?),
        ))
    }

    pub fn config(&self) -> &AeroConfig {
        &self.config
    }

    /// Independent calculator of the same kind with empty caches.
    pub fn new_instance(&self) -> Self {
        Self {
            stability: self.stability.new_instance(),
            drag: self.drag.new_instance(),
            config: self.config.clone(),
            tracker: CacheTracker::new(),
        }
    }

    /// Reset every provider if the configuration changed since the last call.
    pub fn check_cache(&mut self, configuration: &FlightConfiguration) -> bool {
        if !self.tracker.check(configuration) {
            return false;
        }
        self.stability.void_cache();
        self.drag.void_cache();
        true
    }

    pub fn void_cache(&mut self) {
        self.stability.void_cache();
        self.drag.void_cache();
    }

    /// Number of cache invalidations so far.
    pub fn generation(&self) -> u64 {
        self.tracker.generation()
    }

    pub fn stall_margin(&self) -> f64 {
        self.stability.stall_margin()
    }

    pub fn cp(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: Option<&mut dyn WarningSink>,
    ) -> AeroResult<Coordinate> {
        self.check_cache(configuration);
        with_sink(warnings, |warnings| {
            self.stability.cp(configuration, conditions, warnings)
        })
    }

    /// CP at the wind direction giving the most forward position.
    ///
    /// Leaves the roll angle of `conditions` at the worst case found. Samples
    /// with a negligible CP weight are ignored; if none qualify the zero
    /// coordinate is returned and the roll angle restored.
    pub fn worst_cp(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &mut FlightConditions,
        warnings: Option<&mut dyn WarningSink>,
    ) -> AeroResult<Coordinate> {
        self.check_cache(configuration);
        let divisions = self.config.worst_cp_divisions.max(1);
        let min_weight = self.config.cp_weight_epsilon;
        let initial = conditions.theta();

        let stability = &mut self.stability;
        let worst = with_sink(warnings, |warnings| -> AeroResult<Option<(f64, Coordinate)>> {
            let mut worst: Option<(f64, Coordinate)> = None;
            for i in 0..divisions {
                let theta = 2.0 * PI * i as f64 / divisions as f64;
                conditions.set_theta(theta);
                let cp = stability.cp(configuration, conditions, warnings)?;
                if cp.weight > min_weight && worst.map_or(true, |(_, w)| cp.x < w.x) {
                    worst = Some((theta, cp));
                }
            }
            Ok(worst)
        })?;

        match worst {
            Some((theta, cp)) => {
                conditions.set_theta(theta);
                Ok(cp)
            }
            None => {
                conditions.set_theta(initial);
                Ok(Coordinate::ZERO)
            }
        }
    }

    /// Vehicle totals with drag and with damping taken out of Cm and Cyaw.
    pub fn aerodynamic_forces(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: Option<&mut dyn WarningSink>,
    ) -> AeroResult<AerodynamicForces> {
        self.check_cache(configuration);
        let (stability, drag) = (&mut self.stability, &mut self.drag);
        with_sink(warnings, |warnings| {
            let mut total = stability.non_axial_forces(configuration, conditions, warnings)?;
            drag.calculate_drag(configuration, conditions, None, &mut total, warnings)?;
            stability.damping_moments(configuration, conditions, &mut total)?;

            let cm = total.cm().unwrap_or(0.0) - total.pitch_damping_moment().unwrap_or(0.0);
            let c_yaw = total.c_yaw().unwrap_or(0.0) - total.yaw_damping_moment().unwrap_or(0.0);
            total.set_cm(cm);
            total.set_c_yaw(c_yaw);
            Ok(total)
        })
    }

    /// Drag coefficients only.
    pub fn axial_forces(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: Option<&mut dyn WarningSink>,
    ) -> AeroResult<AerodynamicForces> {
        self.check_cache(configuration);
        let drag = &mut self.drag;
        with_sink(warnings, |warnings| {
            let mut total = AerodynamicForces::new();
            drag.calculate_drag(configuration, conditions, None, &mut total, warnings)?;
            Ok(total)
        })
    }

    /// Complete coefficients of every active aerodynamic component and assembly.
    ///
    /// The rocket's own record carries the vehicle drag totals.
    pub fn force_analysis(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: Option<&mut dyn WarningSink>,
    ) -> AeroResult<BTreeMap<ComponentId, AerodynamicForces>> {
        self.check_cache(configuration);
        let (stability, drag) = (&mut self.stability, &mut self.drag);
        let rocket = configuration.rocket();

        let (mut breakdown, total) = with_sink(warnings, |warnings| {
            let mut breakdown = stability.force_analysis(configuration, conditions, warnings)?;
            let mut total = AerodynamicForces::zeroed();
            drag.calculate_drag(configuration, conditions, Some(&mut breakdown), &mut total, warnings)?;

            if let Some(record) = breakdown.assemblies.get_mut(&rocket.root()) {
                record.set_friction_cd(total.friction_cd().unwrap_or(0.0));
                record.set_pressure_cd(total.pressure_cd().unwrap_or(0.0));
                record.set_base_cd(total.base_cd().unwrap_or(0.0));
                record.set_override_cd(total.override_cd().unwrap_or(0.0));
            }
            AeroResult::Ok((breakdown, total))
        })?;

        let mut analysis = BTreeMap::new();
        for id in configuration.active_components() {
            let component = rocket.get(id)?;
            let record = if component.is_assembly() {
                breakdown.assemblies.remove(&id)
            } else if component.is_aerodynamic() {
                breakdown.components.remove(&id)
            } else {
                None
            };
            let mut record = match record {
                Some(record) => record,
                None => continue,
            };

            let scope = match component.drag_override {
                Some(o) => DragScope::Overridden(o.cd),
                None if rocket.is_cd_overridden_by_ancestor(id) => DragScope::OverriddenByAncestor,
                None => DragScope::Free,
            };
            record.set_drag_scope(scope);

            let friction = record.friction_cd().unwrap_or(0.0);
            let pressure = record.pressure_cd().unwrap_or(0.0);
            let base = record.base_cd().unwrap_or(0.0);
            // The rocket record reports the vehicle override sum
            let overridden = if id == rocket.root() {
                total.override_cd().unwrap_or(0.0)
            } else {
                record.override_cd().unwrap_or(0.0)
            };
            record.set_friction_cd(friction);
            record.set_pressure_cd(pressure);
            record.set_base_cd(base);
            record.set_override_cd(overridden);

            let cd = base + pressure + friction + overridden;
            record.set_cd(cd);
            record.set_cd_axial(drag.axial_cd(conditions, cd));

            analysis.insert(id, record);
        }

        Ok(analysis)
    }
}
