use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::components::rocket::ComponentId;

/// Classification of a non-fatal aerodynamic finding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Adjacent bodies do not share a diameter
    DiameterDiscontinuity,
    /// Axial gap between adjacent bodies
    AirframeGap,
    /// Adjacent bodies overlap axially
    AirframeOverlap,
    /// The forward-most body has an open front end
    OpenAirframeForward,
    /// A body has zero length or zero radius
    ZeroVolumeBody,
    /// A pod set lies entirely forward of the body carrying it
    PodsetForward,
    /// A pod set extends forward of the body carrying it
    PodsetOverlap,
    /// Angle of attack above the vehicle stall angle
    LargeAngleOfAttack,
    /// Body relations are inaccurate at supersonic speed
    Supersonic,
    /// More than eight fins interfere with each other
    ParallelFins,
    /// Fin thicker than half the body radius
    ThickFin,
    /// Fin with a jagged outer edge
    JaggedEdgedFin,
    /// Fin with no planform area
    ZeroAreaFin,
    /// Tube fins leave gaps between neighbouring tubes
    TubeSeparation,
    /// Neighbouring tube fins intersect
    TubeOverlap,
}

impl WarningKind {
    fn same_class(&self, other: &WarningKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A warning together with the components it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub components: Vec<ComponentId>,
    /// Angle of attack in degrees for large angle warnings. Not part of the
    /// de-duplication key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aoa_deg: Option<f64>,
}

impl Warning {
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            components: Vec::new(),
            aoa_deg: None,
        }
    }

    pub fn for_components(kind: WarningKind, components: &[ComponentId]) -> Self {
        Self {
            kind,
            components: components.to_vec(),
            aoa_deg: None,
        }
    }

    pub fn large_angle_of_attack(aoa_deg: f64) -> Self {
        Self {
            aoa_deg: Some(aoa_deg),
            ..Self::new(WarningKind::LargeAngleOfAttack)
        }
    }

    /// Warnings of one class about the same components replace each other.
    pub fn same_class(&self, other: &Warning) -> bool {
        self.kind.same_class(&other.kind) && self.components == other.components
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::DiameterDiscontinuity => write!(f, "Discontinuity in rocket body diameter")?,
            WarningKind::AirframeGap => write!(f, "Gap in rocket airframe")?,
            WarningKind::AirframeOverlap => write!(f, "Overlapping airframe components")?,
            WarningKind::OpenAirframeForward => write!(f, "Forward end of airframe is open")?,
            WarningKind::ZeroVolumeBody => write!(f, "Zero-volume body component")?,
            WarningKind::PodsetForward => write!(f, "Pod set is forward of its carrying body")?,
            WarningKind::PodsetOverlap => write!(f, "Pod set extends forward of its carrying body")?,
            WarningKind::LargeAngleOfAttack => match self.aoa_deg {
                Some(aoa_deg) => write!(f, "Large angle of attack encountered ({:.1}°)", aoa_deg)?,
                None => write!(f, "Large angle of attack encountered")?,
            },
            WarningKind::Supersonic => {
                write!(f, "Body calculations may not be entirely accurate at supersonic speeds")?
            }
            WarningKind::ParallelFins => write!(f, "Too many parallel fins")?,
            WarningKind::ThickFin => write!(f, "Thick fins may not be modeled accurately")?,
            WarningKind::JaggedEdgedFin => write!(f, "Jagged-edged fin predictions may be inaccurate")?,
            WarningKind::ZeroAreaFin => write!(f, "Fin set with zero area")?,
            WarningKind::TubeSeparation => write!(f, "Space between tube fins may not be modeled accurately")?,
            WarningKind::TubeOverlap => write!(f, "Overlapping tube fins may not be modeled accurately")?,
        }
        if !self.components.is_empty() {
            let ids: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
            write!(f, " [{}]", ids.join(", "))?;
        }
        Ok(())
    }
}

/// Destination for warnings produced during a calculation.
pub trait WarningSink {
    fn add(&mut self, warning: Warning);

    fn add_all(&mut self, warnings: &[Warning]) {
        for warning in warnings {
            self.add(warning.clone());
        }
    }
}

/// Ordered, de-duplicating warning collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningSet {
    warnings: Vec<Warning>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
    }

    /// Number of warnings matching a predicate on their kind.
    pub fn count_where(&self, predicate: impl Fn(&WarningKind) -> bool) -> usize {
        self.warnings.iter().filter(|w| predicate(&w.kind)).count()
    }

    pub fn contains_kind(&self, predicate: impl Fn(&WarningKind) -> bool) -> bool {
        self.count_where(predicate) > 0
    }
}

impl WarningSink for WarningSet {
    fn add(&mut self, warning: Warning) {
        trace!(%warning, "aerodynamic warning");
        if let Some(existing) = self.warnings.iter_mut().find(|w| w.same_class(&warning)) {
            *existing = warning;
        } else {
            self.warnings.push(warning);
        }
    }
}

impl<'a> IntoIterator for &'a WarningSet {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}

/// Sink that drops everything, used when the caller does not collect warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardWarnings;

impl WarningSink for DiscardWarnings {
    fn add(&mut self, _warning: Warning) {}
}
