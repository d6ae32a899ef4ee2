use std::collections::BTreeMap;

use crate::components::rocket::{ComponentId, FlightConfiguration};
use crate::components::{
    AerodynamicForces, FlightConditions, Transformation, Warning, WarningSet, WarningSink,
};
use crate::resources::AeroConfig;
use crate::systems::aerodynamics::calc::{CalcRegistry, ComponentCalc};
use crate::systems::aerodynamics::damping::{damping_multiplier, DampingGeometry};
use crate::systems::aerodynamics::geometry::check_geometry;
use crate::systems::aerodynamics::traits::{ForceBreakdown, StabilityCalculator};
use crate::utils::{pow2, rad_to_deg, sign, AeroResult, EPSILON};

/// Extended Barrowman normal forces, moments and damping.
#[derive(Debug, Clone, Default)]
pub struct BarrowmanStabilityCalculator {
    config: AeroConfig,
    registry: CalcRegistry,
    damping: Option<DampingGeometry>,
    /// Geometry findings of the current cache generation
    geometry_warnings: Option<Vec<Warning>>,
    stall_margin: f64,
}

impl BarrowmanStabilityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AeroConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AeroConfig {
        &self.config
    }

    pub fn registry_builds(&self) -> usize {
        self.registry.builds()
    }
}

/// Sum the instances of one component in vehicle coordinates.
fn component_forces(
    id: ComponentId,
    calc: &ComponentCalc,
    conditions: &FlightConditions,
    transforms: &[Transformation],
    warnings: &mut dyn WarningSink,
) -> AerodynamicForces {
    let mut total = AerodynamicForces::for_component(id);

    for transform in transforms {
        let mut instance = AerodynamicForces::zeroed();
        calc.non_axial_forces(conditions, transform, &mut instance, warnings);

        let cp = transform.transform(&instance.cp()).axial_only();
        instance.set_cp(cp);
        let cn = instance.cn().unwrap_or(0.0);
        instance.set_cm(cn * cp.x / conditions.ref_length());

        total.merge(&instance);
    }

    total
}

impl StabilityCalculator for BarrowmanStabilityCalculator {
    fn new_instance(&self) -> Box<dyn StabilityCalculator> {
        Box::new(Self::with_config(self.config.clone()))
    }

    fn non_axial_forces(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<AerodynamicForces> {
        self.check_geometry(configuration, warnings);

        let calcs = self.registry.ensure(configuration);
        let mut total = AerodynamicForces::zeroed();

        for instances in configuration.active_instances() {
            let id = instances.component;
            let component = configuration.component(id)?;
            if !component.is_aerodynamic() && !component.is_assembly() {
                continue;
            }
            let calc = calcs.require(configuration, id)?;
            total.merge(&component_forces(id, calc, conditions, &instances.transforms, warnings));
        }

        if conditions.aoa() > self.config.stall_angle {
            warnings.add(Warning::large_angle_of_attack(rad_to_deg(conditions.aoa())));
        }

        Ok(total)
    }

    fn force_analysis(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<ForceBreakdown> {
        let rocket = configuration.rocket();
        let calcs = self.registry.ensure(configuration);

        // Pre-order list of included components with their nearest included ancestor
        let mut order: Vec<(ComponentId, Option<ComponentId>)> = Vec::new();
        let mut stack = vec![(rocket.root(), None)];
        while let Some((id, parent)) = stack.pop() {
            let component = rocket.get(id)?;
            if component.is_stage() && !configuration.is_stage_active(id) {
                let stages = rocket.top_level_child_stages(id);
                stack.extend(stages.into_iter().rev().map(|stage| (stage, parent)));
                continue;
            }
            order.push((id, parent));
            stack.extend(component.children().iter().rev().map(|&child| (child, Some(id))));
        }

        let mut aggregates: BTreeMap<ComponentId, AerodynamicForces> = BTreeMap::new();
        let mut breakdown = ForceBreakdown::new();

        for &(id, _) in &order {
            let component = rocket.get(id)?;
            let mut own = AerodynamicForces::for_component(id);
            if component.is_aerodynamic() || component.is_assembly() {
                let calc = calcs.require(configuration, id)?;
                let transforms = rocket.instance_transforms(id);
                own = component_forces(id, calc, conditions, &transforms, warnings);
                if component.is_aerodynamic() {
                    breakdown.components.insert(id, own.clone());
                }
            }
            aggregates.insert(id, own);
        }

        // Reverse pre-order reaches every child before its parent
        for &(id, parent) in order.iter().rev() {
            let aggregate = match aggregates.get(&id) {
                Some(aggregate) => aggregate.clone(),
                None => continue,
            };
            if let Some(record) = parent.and_then(|p| aggregates.get_mut(&p)) {
                record.merge(&aggregate);
            }
            if rocket.component(id).map_or(false, |c| c.is_assembly()) {
                breakdown.assemblies.insert(id, aggregate);
            }
        }

        Ok(breakdown)
    }

    fn damping_moments(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        total: &mut AerodynamicForces,
    ) -> AeroResult<()> {
        let calcs = self.registry.ensure(configuration);
        let geometry = *self
            .damping
            .get_or_insert_with(|| DampingGeometry::measure(configuration));

        let mul = damping_multiplier(
            configuration,
            conditions,
            calcs,
            &geometry,
            conditions.pitch_center().x,
            self.config.max_damping_fins,
        )? * self.config.damping_boost;

        let velocity = conditions.velocity();
        let damping = |rate: f64, restoring: Option<f64>| {
            if velocity < EPSILON {
                return 0.0;
            }
            let magnitude = (mul * pow2(rate / velocity)).min(restoring.unwrap_or(0.0).abs());
            sign(rate) * magnitude
        };

        total.set_pitch_damping_moment(damping(conditions.pitch_rate(), total.cm()));
        total.set_yaw_damping_moment(damping(conditions.yaw_rate(), total.c_yaw()));

        self.stall_margin = self.config.stall_angle - conditions.aoa();
        Ok(())
    }

    fn stall_margin(&self) -> f64 {
        self.stall_margin
    }

    fn check_geometry(&mut self, configuration: &FlightConfiguration, warnings: &mut dyn WarningSink) {
        let resolution = self.config.length_resolution;
        let found = self.geometry_warnings.get_or_insert_with(|| {
            let mut set = WarningSet::new();
            check_geometry(configuration, resolution, &mut set);
            set.iter().cloned().collect()
        });
        warnings.add_all(found.as_slice());
    }

    fn void_cache(&mut self) {
        self.registry.clear();
        self.damping = None;
        self.geometry_warnings = None;
        self.stall_margin = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rocket::{
        AxialPosition, BodyTube, ComponentKind, FinSet, Rocket, RocketComponent, Transition, TransitionShape,
    };
    use crate::components::WarningKind;
    use crate::utils::deg_to_rad;
    use approx::assert_relative_eq;

    struct Fixture {
        config: FlightConfiguration,
        nose: ComponentId,
        fins: ComponentId,
        stage: ComponentId,
    }

    fn finned_rocket() -> Fixture {
        let mut rocket = Rocket::new("finned");
        let stage = rocket
            .add(rocket.root(), RocketComponent::new("stage", ComponentKind::AxialStage))
            .unwrap();
        let nose = rocket
            .add(
                stage,
                RocketComponent::new(
                    "nose",
                    ComponentKind::NoseCone(Transition::nose_cone(TransitionShape::Ogive, 0.1, 0.0125)),
                ),
            )
            .unwrap();
        let body = rocket
            .add(stage, RocketComponent::new("body", ComponentKind::BodyTube(BodyTube::new(0.0125, 0.4))))
            .unwrap();
        let fins = rocket
            .add(
                body,
                RocketComponent::new("fins", ComponentKind::FinSet(FinSet::trapezoidal(4, 0.08, 0.04, 0.03, 0.06)))
                    .at(AxialPosition::Bottom(0.0)),
            )
            .unwrap();
        Fixture {
            config: FlightConfiguration::new(rocket),
            nose,
            fins,
            stage,
        }
    }

    fn conditions(config: &FlightConfiguration, aoa_deg: f64) -> FlightConditions {
        let mut conditions = FlightConditions::new(config.reference_length());
        conditions.set_aoa(deg_to_rad(aoa_deg));
        conditions.set_mach(0.3);
        conditions
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let fixture = finned_rocket();
        let cond = conditions(&fixture.config, 2.0);
        let mut calc = BarrowmanStabilityCalculator::new();

        let total = calc
            .non_axial_forces(&fixture.config, &cond, &mut WarningSet::new())
            .unwrap();
        let breakdown = calc
            .force_analysis(&fixture.config, &cond, &mut WarningSet::new())
            .unwrap();

        let summed: f64 = breakdown.components.values().filter_map(|f| f.cn()).sum();
        assert_relative_eq!(total.cn().unwrap(), summed, epsilon = 1e-12);

        let root = fixture.config.rocket().root();
        let rocket_record = breakdown.assemblies.get(&root).unwrap();
        assert_relative_eq!(rocket_record.cn().unwrap(), total.cn().unwrap(), epsilon = 1e-12);
        assert_relative_eq!(rocket_record.cp().x, total.cp().x, epsilon = 1e-9);
        assert!(breakdown.assemblies.contains_key(&fixture.stage));
        assert!(breakdown.components.contains_key(&fixture.nose));
    }

    #[test]
    fn test_cp_is_aft_of_fin_leading_edge() {
        let fixture = finned_rocket();
        let cond = conditions(&fixture.config, 1.0);
        let mut calc = BarrowmanStabilityCalculator::new();

        let cp = calc.cp(&fixture.config, &cond, &mut WarningSet::new()).unwrap();
        let fin_le = fixture.config.rocket().absolute_x(fixture.fins);
        assert_relative_eq!(fin_le, 0.42, epsilon = 1e-12);
        assert!(cp.x > fin_le && cp.x < 0.5, "cp at {}", cp.x);
        assert!(cp.weight > 0.0);
    }

    #[test]
    fn test_inactive_stage_is_excluded() {
        let mut fixture = finned_rocket();
        let cond = conditions(&fixture.config, 2.0);
        let mut calc = BarrowmanStabilityCalculator::new();

        fixture.config.set_stage_active(fixture.stage, false).unwrap();
        let total = calc
            .non_axial_forces(&fixture.config, &cond, &mut WarningSet::new())
            .unwrap();
        assert_relative_eq!(total.cn().unwrap(), 0.0);

        let breakdown = calc
            .force_analysis(&fixture.config, &cond, &mut WarningSet::new())
            .unwrap();
        assert!(breakdown.components.is_empty());
        assert!(!breakdown.assemblies.contains_key(&fixture.stage));
    }

    #[test]
    fn test_large_aoa_warning() {
        let fixture = finned_rocket();
        let mut calc = BarrowmanStabilityCalculator::new();

        let mut warnings = WarningSet::new();
        calc.non_axial_forces(&fixture.config, &conditions(&fixture.config, 5.0), &mut warnings)
            .unwrap();
        assert!(!warnings.contains_kind(|k| matches!(k, WarningKind::LargeAngleOfAttack)));

        calc.non_axial_forces(&fixture.config, &conditions(&fixture.config, 25.0), &mut warnings)
            .unwrap();
        assert!(warnings.contains_kind(|k| matches!(k, WarningKind::LargeAngleOfAttack)));

        // Further angles above stall update the existing warning
        calc.non_axial_forces(&fixture.config, &conditions(&fixture.config, 32.0), &mut warnings)
            .unwrap();
        assert_eq!(warnings.count_where(|k| *k == WarningKind::LargeAngleOfAttack), 1);
        let aoa = warnings
            .iter()
            .find(|w| w.kind == WarningKind::LargeAngleOfAttack)
            .and_then(|w| w.aoa_deg)
            .unwrap();
        assert_relative_eq!(aoa, 32.0, epsilon = 1e-9);
    }

    #[test]
    fn test_damping_opposes_rate_and_is_clamped() {
        let fixture = finned_rocket();
        let mut calc = BarrowmanStabilityCalculator::new();
        let mut cond = conditions(&fixture.config, 3.0);
        cond.set_pitch_center(crate::components::Coordinate::axial(0.25));

        let mut total = calc
            .non_axial_forces(&fixture.config, &cond, &mut WarningSet::new())
            .unwrap();
        cond.set_pitch_rate(-0.5);
        calc.damping_moments(&fixture.config, &cond, &mut total).unwrap();
        let pitch = total.pitch_damping_moment().unwrap();
        assert!(pitch < 0.0);
        assert!(pitch.abs() <= total.cm().unwrap().abs() + 1e-15);
        assert_relative_eq!(total.yaw_damping_moment().unwrap(), 0.0);

        cond.set_pitch_rate(500.0);
        calc.damping_moments(&fixture.config, &cond, &mut total).unwrap();
        assert_relative_eq!(
            total.pitch_damping_moment().unwrap(),
            total.cm().unwrap().abs(),
            epsilon = 1e-12
        );
        assert_relative_eq!(calc.stall_margin(), deg_to_rad(17.5) - deg_to_rad(3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_velocity_has_no_damping() {
        let fixture = finned_rocket();
        let mut calc = BarrowmanStabilityCalculator::new();
        let mut cond = conditions(&fixture.config, 3.0);
        cond.set_mach(0.0);
        cond.set_pitch_rate(1.0);

        let mut total = AerodynamicForces::zeroed();
        total.set_cm(0.5);
        calc.damping_moments(&fixture.config, &cond, &mut total).unwrap();
        assert_relative_eq!(total.pitch_damping_moment().unwrap(), 0.0);
    }

    #[test]
    fn test_geometry_check_runs_once_per_generation() {
        let fixture = finned_rocket();
        let mut calc = BarrowmanStabilityCalculator::new();
        let mut warnings = WarningSet::new();
        calc.check_geometry(&fixture.config, &mut warnings);
        assert!(calc.geometry_warnings.is_some());

        calc.void_cache();
        assert!(calc.geometry_warnings.is_none());
        assert_relative_eq!(calc.stall_margin(), 0.0);
    }
}
