//! Barrowman fin set strategy.
//!
//! Each call describes a single fin; the aggregator invokes it once per fin
//! instance and the instance transform supplies the fin's roll angle.

use std::f64::consts::PI;

use once_cell::sync::Lazy;

use crate::components::rocket::{ComponentId, CrossSection, FinSet, Rocket};
use crate::components::{
    AerodynamicForces, Coordinate, FlightConditions, Transformation, Warning, WarningKind,
    WarningSink,
};
use crate::utils::{
    pow2, pow3, sign, LinearInterpolator, PolyInterpolator, EPSILON, FIN_DIVISIONS,
    FIN_STALL_ANGLE,
};

const CNA_SUBSONIC: f64 = 0.9;
const CNA_SUPERSONIC: f64 = 1.5;
const GAMMA: f64 = 1.4;

/// Roll angle above which strip-wise damping replaces the linear estimate.
const ROLL_STALL: f64 = 15.0 * PI / 180.0;

static CNA_SUPERSONIC_B: Lazy<f64> = Lazy::new(|| (pow2(CNA_SUPERSONIC) - 1.0).powf(1.5));

/// Values at 0.9 and 1.5, slopes at 0.9 and 1.5, curvature at 0.9.
static CNA_BRIDGE: Lazy<PolyInterpolator> = Lazy::new(|| {
    PolyInterpolator::new(&[
        &[CNA_SUBSONIC, CNA_SUPERSONIC],
        &[CNA_SUBSONIC, CNA_SUPERSONIC],
        &[CNA_SUBSONIC],
    ])
});

/// Busemann second-order coefficients from Mach 1.5 up to Mach 5.
struct BusemannTables {
    k1: LinearInterpolator,
    k2: LinearInterpolator,
    k3: LinearInterpolator,
}

static BUSEMANN: Lazy<BusemannTables> = Lazy::new(|| {
    let n = ((5.0 - CNA_SUPERSONIC) * 10.0) as usize;
    let mut tables = BusemannTables {
        k1: LinearInterpolator::new(),
        k2: LinearInterpolator::new(),
        k3: LinearInterpolator::new(),
    };
    for i in 0..n {
        let m = CNA_SUPERSONIC + i as f64 * 0.1;
        let beta = (m * m - 1.0).max(0.0).sqrt();
        tables.k1.add_point(m, 2.0 / beta);
        tables.k2.add_point(
            m,
            ((GAMMA + 1.0) * m.powi(4) - 4.0 * pow2(beta)) / (4.0 * beta.powi(4)),
        );
        tables.k3.add_point(
            m,
            ((GAMMA + 1.0) * m.powi(8)
                + (2.0 * pow2(GAMMA) - 7.0 * GAMMA - 5.0) * m.powi(6)
                + 10.0 * (GAMMA + 1.0) * m.powi(4)
                + 8.0)
                / (6.0 * beta.powi(7)),
        );
    }
    tables
});

/// Chordwise geometry sampled at evenly spaced span stations.
#[derive(Debug, Clone, PartialEq)]
struct ChordStrips {
    lead: Vec<f64>,
    trail: Vec<f64>,
    length: Vec<f64>,
}

impl ChordStrips {
    fn from_outline(points: &[[f64; 2]], span: f64) -> Self {
        let n = FIN_DIVISIONS;
        let mut lead = vec![f64::INFINITY; n];
        let mut trail = vec![f64::NEG_INFINITY; n];
        let mut length = vec![0.0; n];

        // Close the outline along the root
        let closing = points.first().copied();
        let outline = points.iter().copied().chain(closing);
        let mut previous: Option<[f64; 2]> = None;

        for point in outline {
            let [x2, y2] = point;
            let [x1, y1] = match previous.replace(point) {
                Some(p) => p,
                None => continue,
            };
            // Coarse tolerance keeps the intersection below well conditioned
            if (y1 - y2).abs() < 0.001 {
                continue;
            }

            let station = |y: f64| -> usize {
                let i = (y * 1.0001 / span * (n - 1) as f64) as i64;
                i.clamp(0, n as i64 - 1) as usize
            };
            let (i1, i2) = {
                let (a, b) = (station(y1), station(y2));
                (a.min(b), a.max(b))
            };

            for i in i1..=i2 {
                let y = i as f64 * span / (n - 1) as f64;
                // Stations just outside the edge must not extrapolate past its ends
                let x = ((y - y2) / (y1 - y2) * x1 + (y1 - y) / (y1 - y2) * x2)
                    .clamp(x1.min(x2), x1.max(x2));
                lead[i] = lead[i].min(x);
                trail[i] = trail[i].max(x);
                if y1 < y2 {
                    length[i] -= x;
                } else {
                    length[i] += x;
                }
            }
        }

        for i in 0..n {
            if !lead[i].is_finite() || !trail[i].is_finite() {
                lead[i] = 0.0;
                trail[i] = 0.0;
            }
            if length[i] < 0.0 || length[i].is_nan() {
                length[i] = 0.0;
            }
            if length[i] > trail[i] - lead[i] {
                length[i] = trail[i] - lead[i];
            }
        }

        Self { lead, trail, length }
    }
}

#[derive(Debug, Clone)]
pub struct FinSetCalc {
    component: ComponentId,
    fin_count: usize,
    thickness: f64,
    body_radius: f64,
    cant_angle: f64,
    cross_section: CrossSection,

    span: f64,
    fin_area: f64,
    aspect_ratio: f64,
    mac_length: f64,
    mac_lead: f64,
    mac_span: f64,
    cos_gamma: f64,
    cos_gamma_lead: f64,
    roll_sum: f64,
    strips: ChordStrips,

    interference_count: usize,
    cp_poly: [f64; 6],
    geometry_warnings: Vec<Warning>,
}

impl FinSetCalc {
    pub fn new(rocket: &Rocket, id: ComponentId, fins: &FinSet) -> Self {
        let span = fins.span();
        let fin_area = fins.planform_area();
        let body_radius = rocket.body_radius_at(id);

        let mut geometry_warnings = Vec::new();
        let aspect_ratio = if fin_area < EPSILON {
            geometry_warnings.push(Warning::for_components(WarningKind::ZeroAreaFin, &[id]));
            0.0
        } else {
            2.0 * pow2(span) / fin_area
        };

        // Outer edge turning back outwards after heading in
        let mut down = false;
        for pair in fins.points.windows(2) {
            let (y0, y1) = (pair[0][1], pair[1][1]);
            if y1 > y0 + 0.001 && down {
                geometry_warnings.push(Warning::for_components(WarningKind::JaggedEdgedFin, &[id]));
                break;
            }
            if y1 < y0 - 0.001 {
                down = true;
            }
        }

        if body_radius > 0.0 && fins.thickness > body_radius / 2.0 {
            geometry_warnings.push(Warning::for_components(WarningKind::ThickFin, &[id]));
        }

        let strips = ChordStrips::from_outline(&fins.points, span);

        let mut calc = Self {
            component: id,
            fin_count: fins.fin_count,
            thickness: fins.thickness,
            body_radius,
            cant_angle: fins.cant_angle,
            cross_section: fins.cross_section,
            span,
            fin_area,
            aspect_ratio,
            mac_length: 0.0,
            mac_lead: 0.0,
            mac_span: 0.0,
            cos_gamma: 0.0,
            cos_gamma_lead: 0.0,
            roll_sum: 0.0,
            strips,
            interference_count: interference_fin_count(rocket, id, fins),
            cp_poly: cp_polynomial(aspect_ratio),
            geometry_warnings,
        };
        calc.integrate_strips();
        calc
    }

    /// Mean aerodynamic chord, sweep cosines and the roll damping sum.
    fn integrate_strips(&mut self) {
        let n = FIN_DIVISIONS;
        let dy = self.span / (n - 1) as f64;
        let strips = &self.strips;

        let mut mac_length = 0.0;
        let mut mac_lead = 0.0;
        let mut mac_span = 0.0;
        let mut area = 0.0;
        let mut roll_sum = 0.0;
        let mut cos_gamma = 0.0;
        let mut cos_gamma_lead = 0.0;

        for i in 0..n {
            let chord = strips.trail[i] - strips.lead[i];
            let y = i as f64 * dy;

            mac_length += chord * chord;
            mac_span += y * chord;
            mac_lead += strips.lead[i] * chord;
            area += chord;
            roll_sum += strips.length[i] * pow2(self.body_radius + y);

            if i > 0 {
                let dx = (strips.trail[i] + strips.lead[i]) / 2.0
                    - (strips.trail[i - 1] + strips.lead[i - 1]) / 2.0;
                cos_gamma += dy / dx.hypot(dy);
                let dx = strips.lead[i] - strips.lead[i - 1];
                cos_gamma_lead += dy / dx.hypot(dy);
            }
        }

        area *= dy;
        self.roll_sum = roll_sum * dy;
        self.cos_gamma = cos_gamma / (n - 1) as f64;
        self.cos_gamma_lead = cos_gamma_lead / (n - 1) as f64;
        if area < EPSILON {
            return;
        }
        self.mac_length = mac_length * dy / area;
        self.mac_span = mac_span * dy / area;
        self.mac_lead = mac_lead * dy / area;
    }

    pub fn mac_length(&self) -> f64 {
        self.mac_length
    }

    /// Axial position of the MAC midpoint relative to the fin root leading edge.
    pub fn midchord_pos(&self) -> f64 {
        self.mac_lead + 0.5 * self.mac_length
    }

    pub fn fin_area(&self) -> f64 {
        self.fin_area
    }

    pub fn interference_count(&self) -> usize {
        self.interference_count
    }

    pub fn non_axial_forces(
        &self,
        conditions: &FlightConditions,
        transform: &Transformation,
        forces: &mut AerodynamicForces,
        warnings: &mut dyn WarningSink,
    ) {
        warnings.add_all(&self.geometry_warnings);

        if self.fin_area < EPSILON || self.mac_span < EPSILON {
            forces.set_cm(0.0);
            forces.set_cn(0.0);
            forces.set_cp(Coordinate::ZERO);
            forces.set_c_roll(0.0);
            forces.set_c_roll_damp(0.0);
            forces.set_c_roll_force(0.0);
            forces.set_c_side(0.0);
            forces.set_c_yaw(0.0);
            return;
        }

        let cna1 = self.fin_cna1(conditions);

        // Orientation of this fin relative to the wind
        let mut cna = cna1 * pow2((conditions.theta() - transform.x_rotation()).sin());

        match self.interference_count {
            0..=4 => {}
            5 => cna *= 0.948,
            6 => cna *= 0.913,
            7 => cna *= 0.854,
            8 => cna *= 0.81,
            _ => {
                cna *= 0.75;
                warnings.add(Warning::for_components(WarningKind::ParallelFins, &[self.component]));
            }
        }

        let r = self.body_radius;
        let mut tau = r / (self.span + r);
        if !tau.is_finite() {
            tau = 0.0;
        }
        cna *= 1.0 + tau;

        let x = self.mac_lead + self.cp_position(conditions) * self.mac_length;

        let mut roll_force =
            (self.mac_span + r) * cna1 * (1.0 + tau) * self.cant_angle / conditions.ref_length();
        if conditions.aoa() > FIN_STALL_ANGLE {
            roll_force *= (1.0 - (conditions.aoa() - FIN_STALL_ANGLE) / (FIN_STALL_ANGLE / 2.0))
                .clamp(0.0, 1.0);
        }
        let roll_damp = self.roll_damping(conditions);
        forces.set_c_roll_force(roll_force);
        forces.set_c_roll_damp(roll_damp);
        forces.set_c_roll(roll_force - roll_damp);

        let cn = cna * conditions.aoa().min(FIN_STALL_ANGLE);
        forces.set_cn(cn);
        forces.set_cp(Coordinate::new(x, 0.0, 0.0, cna));
        forces.set_cm(cn * x / conditions.ref_length());

        // Side force and yaw moment of asymmetric fin sets are not modelled
        forces.set_c_side(0.0);
        forces.set_c_yaw(0.0);
    }

    /// Normal force slope of a single fin without interference.
    fn fin_cna1(&self, conditions: &FlightConditions) -> f64 {
        let mach = conditions.mach();
        let ref_area = conditions.ref_area();
        let aoa = conditions.aoa();
        let alpha = aoa.min(PI - aoa).min(FIN_STALL_ANGLE);
        let span2 = pow2(self.span);
        let swept_area = self.fin_area * self.cos_gamma;

        if mach <= CNA_SUBSONIC {
            return 2.0 * PI * span2
                / (1.0 + (1.0 + (1.0 - pow2(mach)) * pow2(span2 / swept_area)).max(0.0).sqrt())
                / ref_area;
        }

        if mach >= CNA_SUPERSONIC {
            return self.fin_area * busemann(mach, alpha) / ref_area;
        }

        let sq = (1.0 + (1.0 - pow2(CNA_SUBSONIC)) * pow2(span2 / swept_area)).max(0.0).sqrt();
        let sub_value = 2.0 * PI * span2 / ref_area / (1.0 + sq);
        let sub_slope = 2.0 * mach * PI * self.span.powi(6)
            / (pow2(swept_area) * ref_area * sq * pow2(1.0 + sq));
        let super_value = self.fin_area * busemann(CNA_SUPERSONIC, alpha) / ref_area;
        let super_slope = -self.fin_area / ref_area * 2.0 * CNA_SUPERSONIC / *CNA_SUPERSONIC_B;

        CNA_BRIDGE.interpolate(mach, &[sub_value, super_value, sub_slope, super_slope, 0.0])
    }

    /// Roll damping moment coefficient of one fin.
    fn roll_damping(&self, conditions: &FlightConditions) -> f64 {
        let roll_rate = conditions.roll_rate();
        if roll_rate.abs() < 0.1 {
            return 0.0;
        }

        let n = FIN_DIVISIONS;
        let mach = conditions.mach();
        let velocity = conditions.velocity();
        let abs_rate = roll_rate.abs();
        let reference = conditions.ref_area() * conditions.ref_length();

        // Fin tips well beyond stall: sum the strips separately
        if abs_rate * (self.body_radius + self.span) / velocity > ROLL_STALL {
            let sum: f64 = (0..n)
                .map(|i| {
                    let dist = self.body_radius + self.span * i as f64 / n as f64;
                    let aoa = (abs_rate * dist / velocity).min(ROLL_STALL);
                    self.strips.length[i] * dist * aoa
                })
                .sum();
            let sum = sum * (self.span / n as f64) * 2.0 * PI / conditions.beta() / reference;
            return sign(roll_rate) * sum;
        }

        if mach <= CNA_SUBSONIC {
            return 2.0 * PI * roll_rate * self.roll_sum / (reference * velocity * conditions.beta());
        }

        if mach >= CNA_SUPERSONIC {
            let tables = &*BUSEMANN;
            let (k1, k2, k3) = (tables.k1.value(mach), tables.k2.value(mach), tables.k3.value(mach));
            let sum: f64 = (0..n)
                .map(|i| {
                    let y = i as f64 * self.span / (n - 1) as f64;
                    let angle = roll_rate * (self.body_radius + y) / velocity;
                    (k1 * angle + k2 * angle * angle + k3 * pow3(angle))
                        * self.strips.length[i]
                        * (self.body_radius + y)
                })
                .sum();
            return sum * self.span / (n - 1) as f64 / reference;
        }

        // Transonic: blend the two regimes just outside the bridge
        let mut bounded = conditions.clone();
        bounded.set_mach(CNA_SUBSONIC - 0.01);
        let subsonic = self.roll_damping(&bounded);
        bounded.set_mach(CNA_SUPERSONIC + 0.01);
        let supersonic = self.roll_damping(&bounded);

        subsonic * (CNA_SUPERSONIC - mach) / (CNA_SUPERSONIC - CNA_SUBSONIC)
            + supersonic * (mach - CNA_SUBSONIC) / (CNA_SUPERSONIC - CNA_SUBSONIC)
    }

    fn cp_position(&self, conditions: &FlightConditions) -> f64 {
        cp_fraction(conditions, self.aspect_ratio, &self.cp_poly)
    }

    /// Friction drag of one fin, both faces.
    pub fn friction_cd(&self, conditions: &FlightConditions, cf: f64) -> f64 {
        if self.fin_area < EPSILON || self.mac_length < EPSILON {
            return 0.0;
        }
        cf * (1.0 + 2.0 * self.thickness / self.mac_length) * 2.0 * self.fin_area
            / conditions.ref_area()
    }

    /// Leading edge and trailing edge pressure drag of one fin.
    pub fn pressure_cd(&self, conditions: &FlightConditions, stagnation_cd: f64, base_cd: f64) -> f64 {
        if self.fin_area < EPSILON {
            return 0.0;
        }

        let mach = conditions.mach();
        let mut cd = match self.cross_section {
            CrossSection::Airfoil | CrossSection::Rounded => {
                if mach < 0.9 {
                    (1.0 - pow2(mach)).powf(-0.417) - 1.0
                } else if mach < 1.0 {
                    1.0 - 1.785 * (mach - 0.9)
                } else {
                    1.214 - 0.502 / pow2(mach) + 0.1095 / pow2(pow2(mach))
                }
            }
            CrossSection::Square => stagnation_cd,
        };

        cd *= pow2(self.cos_gamma_lead);

        // Airfoils have no trailing edge base drag
        match self.cross_section {
            CrossSection::Square => cd += base_cd,
            CrossSection::Rounded => cd += base_cd / 2.0,
            CrossSection::Airfoil => {}
        }

        cd * self.span * self.thickness / conditions.ref_area()
    }

    pub fn fin_count(&self) -> usize {
        self.fin_count
    }
}

fn busemann(mach: f64, alpha: f64) -> f64 {
    let tables = &*BUSEMANN;
    tables.k1.value(mach) + tables.k2.value(mach) * alpha + tables.k3.value(mach) * pow2(alpha)
}

/// CP position along the chord as a fraction of its length.
///
/// Quarter chord below Mach 0.5, empirical above Mach 2 and a quintic in
/// between matching value and slope at both ends.
pub(super) fn cp_fraction(conditions: &FlightConditions, aspect_ratio: f64, poly: &[f64; 6]) -> f64 {
    let m = conditions.mach();
    if m <= 0.5 {
        return 0.25;
    }
    if m >= 2.0 {
        let ar_beta = aspect_ratio * conditions.beta();
        return (ar_beta - 0.67) / (2.0 * ar_beta - 1.0);
    }
    PolyInterpolator::eval(m, poly)
}

/// Quintic through p(0.5) = 0.25, p'(0.5) = 0 matching the supersonic CP
/// relation in value and slope at Mach 2 with vanishing higher derivatives.
pub(super) fn cp_polynomial(ar: f64) -> [f64; 6] {
    let denom = pow2(1.0 - 3.4641 * ar);
    [
        (9.16049 * (-0.588838 + ar) * (-0.20624 + ar)) / denom,
        (-31.6049 * (-0.705375 + ar) * (-0.198476 + ar)) / denom,
        (55.3086 * (-0.711482 + ar) * (-0.196772 + ar)) / denom,
        (-39.5062 * (-0.72074 + ar) * (-0.194245 + ar)) / denom,
        (12.8395 * (-0.725688 + ar) * (-0.19292 + ar)) / denom,
        (-1.58025 * (-0.728769 + ar) * (-0.192105 + ar)) / denom,
    ]
}

/// Number of fins on the same body whose roots overlap this set's root.
fn interference_fin_count(rocket: &Rocket, id: ComponentId, fins: &FinSet) -> usize {
    let parent = match rocket.parent(id) {
        Some(parent) => parent,
        None => return fins.fin_count,
    };

    let lead = rocket.relative_x(id);
    let trail = lead + fins.length();
    // Very short roots cannot be compared reliably
    if trail - lead < 0.007 {
        return fins.fin_count;
    }

    let count: usize = rocket
        .children(parent)
        .iter()
        .filter_map(|&sibling| {
            let other = rocket.component(sibling)?.fin_set()?;
            let other_lead = rocket.relative_x(sibling);
            let other_trail = other_lead + other.length();
            (other_lead < trail - 0.005 && other_trail > lead + 0.005).then_some(other.fin_count)
        })
        .sum();

    count.max(fins.fin_count)
}
