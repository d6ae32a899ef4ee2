use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::components::rocket::FlightConfiguration;
use crate::components::{
    AerodynamicForces, Coordinate, FlightConditions, Warning, WarningSink,
};
use crate::resources::AeroConfig;
use crate::systems::aerodynamics::drag::axial_cd;
use crate::systems::aerodynamics::traits::{DragCalculator, ForceBreakdown, StabilityCalculator};
use crate::utils::{lerp, map, rad_to_deg, AeroError, AeroResult};

/// Measured aerodynamic coefficients on a Mach × angle-of-attack grid.
///
/// Every grid is indexed `[mach][aoa]`. Drag grids may be left empty, in
/// which case that part of the drag is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroTable {
    pub mach: Vec<f64>,
    /// Angles of attack in radians
    pub aoa: Vec<f64>,
    pub cn_alpha: Vec<Vec<f64>>,
    /// Axial CP position in metres from the vehicle tip
    pub cp_x: Vec<Vec<f64>>,
    #[serde(default)]
    pub friction_cd: Vec<Vec<f64>>,
    #[serde(default)]
    pub pressure_cd: Vec<Vec<f64>>,
    #[serde(default)]
    pub base_cd: Vec<Vec<f64>>,
    #[serde(default)]
    pub c_roll: Option<Vec<Vec<f64>>>,
}

impl AeroTable {
    pub fn from_json_str(json: &str) -> AeroResult<Self> {
        let table: AeroTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_yaml_str(yaml: &str) -> AeroResult<Self> {
        let table: AeroTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table, reading YAML for `.yaml`/`.yml` files and JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> AeroResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let table = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            _ => Self::from_json_str(&contents)?,
        };
        debug!(
            path = %path.display(),
            mach_points = table.mach.len(),
            aoa_points = table.aoa.len(),
            "loaded aerodynamic table"
        );
        Ok(table)
    }

    pub fn validate(&self) -> AeroResult<()> {
        check_axis("mach", &self.mach)?;
        check_axis("aoa", &self.aoa)?;

        self.check_grid("cn_alpha", &self.cn_alpha, false)?;
        self.check_grid("cp_x", &self.cp_x, false)?;
        self.check_grid("friction_cd", &self.friction_cd, true)?;
        self.check_grid("pressure_cd", &self.pressure_cd, true)?;
        self.check_grid("base_cd", &self.base_cd, true)?;
        if let Some(c_roll) = &self.c_roll {
            self.check_grid("c_roll", c_roll, false)?;
        }
        Ok(())
    }

    fn check_grid(&self, name: &str, grid: &[Vec<f64>], optional: bool) -> AeroResult<()> {
        if optional && grid.is_empty() {
            return Ok(());
        }
        if grid.len() != self.mach.len() {
            return Err(AeroError::InvalidTable(format!(
                "{} has {} rows, expected one per Mach point ({})",
                name,
                grid.len(),
                self.mach.len()
            )));
        }
        for (i, row) in grid.iter().enumerate() {
            if row.len() != self.aoa.len() {
                return Err(AeroError::InvalidTable(format!(
                    "{} row {} has {} values, expected {}",
                    name,
                    i,
                    row.len(),
                    self.aoa.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(AeroError::InvalidTable(format!("{} row {} is not finite", name, i)));
            }
        }
        Ok(())
    }

    /// Bilinear interpolation of a grid, clamped to the table edges.
    ///
    /// Nodes missing from a grid that was never validated read as zero.
    pub fn interpolate(&self, grid: &[Vec<f64>], mach: f64, aoa: f64) -> f64 {
        if grid.is_empty() {
            return 0.0;
        }
        let (m0, m1, tm) = bracket(&self.mach, mach);
        let (a0, a1, ta) = bracket(&self.aoa, aoa);
        let node = |m: usize, a: usize| grid.get(m).and_then(|row| row.get(a)).copied().unwrap_or(0.0);

        let low = lerp(node(m0, a0), node(m0, a1), ta);
        let high = lerp(node(m1, a0), node(m1, a1), ta);
        lerp(low, high, tm)
    }

    fn at(&self, grid: &[Vec<f64>], conditions: &FlightConditions) -> f64 {
        self.interpolate(grid, conditions.mach(), conditions.aoa())
    }
}

fn check_axis(name: &str, axis: &[f64]) -> AeroResult<()> {
    if axis.is_empty() {
        return Err(AeroError::InvalidTable(format!("{} axis is empty", name)));
    }
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(AeroError::InvalidTable(format!("{} axis is not finite", name)));
    }
    if axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AeroError::InvalidTable(format!(
            "{} axis must be strictly increasing",
            name
        )));
    }
    Ok(())
}

/// Neighbouring indices around `x` and the fraction between them.
fn bracket(axis: &[f64], x: f64) -> (usize, usize, f64) {
    let last = match axis.len() {
        0 => return (0, 0, 0.0),
        n => n - 1,
    };
    if x <= axis[0] {
        return (0, 0, 0.0);
    }
    if x >= axis[last] {
        return (last, last, 0.0);
    }
    let upper = axis.partition_point(|&v| v <= x);
    let lower = upper - 1;
    (lower, upper, map(x, axis[lower], axis[upper], 0.0, 1.0))
}

/// Stability provider reading normal force and CP from an [`AeroTable`].
#[derive(Debug, Clone)]
pub struct TableStabilityCalculator {
    table: Arc<AeroTable>,
    config: AeroConfig,
    stall_margin: f64,
}

impl TableStabilityCalculator {
    pub fn new(table: Arc<AeroTable>) -> AeroResult<Self> {
        Self::with_config(table, AeroConfig::default())
    }

    /// Fails with [`AeroError::InvalidTable`] when the table is malformed.
    pub fn with_config(table: Arc<AeroTable>, config: AeroConfig) -> AeroResult<Self> {
        table.validate()?;
        Ok(Self {
            table,
            config,
            stall_margin: 0.0,
        })
    }
}

impl StabilityCalculator for TableStabilityCalculator {
    fn new_instance(&self) -> Box<dyn StabilityCalculator> {
        Box::new(Self {
            table: self.table.clone(),
            config: self.config.clone(),
            stall_margin: 0.0,
        })
    }

    fn non_axial_forces(
        &mut self,
        _configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<AerodynamicForces> {
        let table = &self.table;
        let cn_alpha = table.at(&table.cn_alpha, conditions);
        let cp_x = table.at(&table.cp_x, conditions);
        let cn = cn_alpha * conditions.aoa();

        let mut forces = AerodynamicForces::zeroed();
        forces.set_cp(Coordinate::new(cp_x, 0.0, 0.0, cn_alpha));
        forces.set_cn(cn);
        forces.set_cm(cn * cp_x / conditions.ref_length());
        if let Some(c_roll) = &table.c_roll {
            forces.set_c_roll(table.at(c_roll, conditions));
        }

        if conditions.aoa() > self.config.stall_angle {
            warnings.add(Warning::large_angle_of_attack(rad_to_deg(conditions.aoa())));
        }

        Ok(forces)
    }

    fn force_analysis(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<ForceBreakdown> {
        let root = configuration.rocket().root();
        let mut total = self.non_axial_forces(configuration, conditions, warnings)?;
        total.set_component(Some(root));

        let mut breakdown = ForceBreakdown::new();
        breakdown.assemblies.insert(root, total);
        Ok(breakdown)
    }

    fn damping_moments(
        &mut self,
        _configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        total: &mut AerodynamicForces,
    ) -> AeroResult<()> {
        total.set_pitch_damping_moment(0.0);
        total.set_yaw_damping_moment(0.0);
        self.stall_margin = self.config.stall_angle - conditions.aoa();
        Ok(())
    }

    fn stall_margin(&self) -> f64 {
        self.stall_margin
    }

    fn check_geometry(&mut self, _configuration: &FlightConfiguration, _warnings: &mut dyn WarningSink) {}

    fn void_cache(&mut self) {
        self.stall_margin = 0.0;
    }
}

/// Drag provider reading the drag split from an [`AeroTable`].
#[derive(Debug, Clone)]
pub struct TableDragCalculator {
    table: Arc<AeroTable>,
}

impl TableDragCalculator {
    pub fn new(table: Arc<AeroTable>) -> AeroResult<Self> {
        table.validate()?;
        Ok(Self { table })
    }
}

impl DragCalculator for TableDragCalculator {
    fn new_instance(&self) -> Box<dyn DragCalculator> {
        Box::new(Self {
            table: self.table.clone(),
        })
    }

    fn calculate_drag(
        &mut self,
        _configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        _breakdown: Option<&mut ForceBreakdown>,
        total: &mut AerodynamicForces,
        _warnings: &mut dyn WarningSink,
    ) -> AeroResult<()> {
        let table = &self.table;
        let friction = table.at(&table.friction_cd, conditions);
        let pressure = table.at(&table.pressure_cd, conditions);
        let base = table.at(&table.base_cd, conditions);
        let cd = friction + pressure + base;

        total.set_friction_cd(friction);
        total.set_pressure_cd(pressure);
        total.set_base_cd(base);
        total.set_override_cd(0.0);
        total.set_cd(cd);
        total.set_cd_axial(axial_cd(conditions.aoa(), cd));
        Ok(())
    }

    fn void_cache(&mut self) {}
}
