use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::shape::{BodyProfile, TransitionShape};

/// Index of a component inside its [`Rocket`](super::Rocket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn from_index(index: usize) -> Self {
        ComponentId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axial placement of a component relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum AxialPosition {
    /// Directly behind the previous sibling (or at the parent's front for the first child)
    #[default]
    After,
    /// Offset from the parent's front to the component's front
    Top(f64),
    /// Offset between the centers of parent and component
    Middle(f64),
    /// Offset between the aft ends of parent and component
    Bottom(f64),
}

/// Surface finish category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Finish {
    Rough,
    Unfinished,
    #[default]
    Normal,
    Smooth,
    Polished,
}

impl Finish {
    pub const ALL: [Finish; 5] = [
        Finish::Rough,
        Finish::Unfinished,
        Finish::Normal,
        Finish::Smooth,
        Finish::Polished,
    ];

    /// Average roughness height in metres.
    pub fn roughness(&self) -> f64 {
        match self {
            Finish::Rough => 500e-6,
            Finish::Unfinished => 150e-6,
            Finish::Normal => 60e-6,
            Finish::Smooth => 20e-6,
            Finish::Polished => 2e-6,
        }
    }

    pub fn ordinal(&self) -> usize {
        match self {
            Finish::Rough => 0,
            Finish::Unfinished => 1,
            Finish::Normal => 2,
            Finish::Smooth => 3,
            Finish::Polished => 4,
        }
    }
}

/// User-specified drag coefficient replacing the computed one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragOverride {
    pub cd: f64,
    /// Whether descendants' own drag is replaced as well
    pub covers_subcomponents: bool,
}

/// Fin cross-section profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CrossSection {
    #[default]
    Square,
    Rounded,
    Airfoil,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub shape: TransitionShape,
    pub shape_parameter: f64,
    pub fore_radius: f64,
    pub aft_radius: f64,
    pub length: f64,
    pub thickness: f64,
}

impl Transition {
    pub fn nose_cone(shape: TransitionShape, length: f64, radius: f64) -> Self {
        Self {
            shape,
            shape_parameter: default_parameter(shape),
            fore_radius: 0.0,
            aft_radius: radius,
            length,
            thickness: 0.002,
        }
    }

    pub fn new(shape: TransitionShape, length: f64, fore_radius: f64, aft_radius: f64) -> Self {
        Self {
            shape,
            shape_parameter: default_parameter(shape),
            fore_radius,
            aft_radius,
            length,
            thickness: 0.002,
        }
    }

    pub fn with_parameter(mut self, parameter: f64) -> Self {
        self.shape_parameter = parameter;
        self
    }
}

fn default_parameter(shape: TransitionShape) -> f64 {
    match shape {
        TransitionShape::Ogive => 1.0,
        TransitionShape::Power | TransitionShape::Parabolic => 0.5,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTube {
    pub radius: f64,
    pub length: f64,
    pub thickness: f64,
}

impl BodyTube {
    pub fn new(radius: f64, length: f64) -> Self {
        Self {
            radius,
            length,
            thickness: 0.0005,
        }
    }
}

/// A set of identical fins spaced evenly around the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinSet {
    pub fin_count: usize,
    /// Fin outline as `[x, y]`, starting at the root leading edge (0, 0)
    /// and ending on the root (y = 0).
    pub points: Vec<[f64; 2]>,
    pub thickness: f64,
    pub cross_section: CrossSection,
    /// Cant angle in radians
    pub cant_angle: f64,
    /// Roll angle of the first fin in radians
    pub base_rotation: f64,
}

impl FinSet {
    pub fn trapezoidal(
        fin_count: usize,
        root_chord: f64,
        tip_chord: f64,
        sweep: f64,
        height: f64,
    ) -> Self {
        Self {
            fin_count,
            points: vec![
                [0.0, 0.0],
                [sweep, height],
                [sweep + tip_chord, height],
                [root_chord, 0.0],
            ],
            thickness: 0.003,
            cross_section: CrossSection::Square,
            cant_angle: 0.0,
            base_rotation: 0.0,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_cross_section(mut self, cross_section: CrossSection) -> Self {
        self.cross_section = cross_section;
        self
    }

    pub fn with_cant(mut self, cant_angle: f64) -> Self {
        self.cant_angle = cant_angle;
        self
    }

    /// Maximum height of the fin above the root.
    pub fn span(&self) -> f64 {
        self.points.iter().map(|p| p[1]).fold(0.0, f64::max)
    }

    /// Axial length of the root chord.
    pub fn length(&self) -> f64 {
        self.points.last().map(|p| p[0]).unwrap_or(0.0).max(0.0)
    }

    /// Planform area of a single fin.
    pub fn planform_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: f64 = (0..n)
            .map(|i| {
                let [x0, y0] = self.points[i];
                let [x1, y1] = self.points[(i + 1) % n];
                x0 * y1 - x1 * y0
            })
            .sum();
        twice_area.abs() / 2.0
    }
}

/// Open tubes spaced evenly around the body, each touching it along its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeFinSet {
    pub fin_count: usize,
    pub length: f64,
    /// Outer tube radius, `None` sizes the tubes automatically
    pub outer_radius: Option<f64>,
    pub thickness: f64,
    /// Roll angle of the first tube in radians
    pub base_rotation: f64,
}

impl TubeFinSet {
    pub fn new(fin_count: usize, length: f64) -> Self {
        Self {
            fin_count,
            length,
            outer_radius: None,
            thickness: 0.002,
            base_rotation: 0.0,
        }
    }

    pub fn with_outer_radius(mut self, radius: f64) -> Self {
        self.outer_radius = Some(radius);
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Tube radius at which neighbouring tubes just touch on a body of the
    /// given radius. Fewer than three tubes cannot touch each other.
    pub fn touching_radius(&self, body_radius: f64) -> Option<f64> {
        if self.fin_count < 3 {
            return None;
        }
        let s = (PI / self.fin_count as f64).sin();
        Some(body_radius * s / (1.0 - s))
    }

    pub fn resolved_outer_radius(&self, body_radius: f64) -> f64 {
        match self.outer_radius {
            Some(radius) => radius.max(0.0),
            None => self.touching_radius(body_radius).unwrap_or(body_radius),
        }
    }

    pub fn resolved_inner_radius(&self, body_radius: f64) -> f64 {
        (self.resolved_outer_radius(body_radius) - self.thickness).max(0.0)
    }

    /// Gap between neighbouring tubes, negative when they intersect.
    pub fn tube_separation(&self, body_radius: f64) -> Option<f64> {
        self.touching_radius(body_radius)
            .map(|touching| 2.0 * (touching - self.resolved_outer_radius(body_radius)))
    }
}

/// Evenly spaced radial copies, used by pod sets and parallel stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceRing {
    pub count: usize,
    pub radial_offset: f64,
    pub angle_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    Rocket,
    AxialStage,
    ParallelStage(InstanceRing),
    PodSet(InstanceRing),
    NoseCone(Transition),
    Transition(Transition),
    BodyTube(BodyTube),
    FinSet(FinSet),
    TubeFinSet(TubeFinSet),
    /// Internal component without aerodynamic effect
    MassComponent { length: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RocketComponent {
    pub name: String,
    pub kind: ComponentKind,
    pub position: AxialPosition,
    pub finish: Finish,
    pub drag_override: Option<DragOverride>,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
}

impl RocketComponent {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            position: AxialPosition::After,
            finish: Finish::Normal,
            drag_override: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, position: AxialPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    pub fn with_override(mut self, cd: f64, covers_subcomponents: bool) -> Self {
        self.drag_override = Some(DragOverride {
            cd,
            covers_subcomponents,
        });
        self
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// Outer profile of axisymmetric body components.
    pub fn profile(&self) -> Option<BodyProfile> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(BodyProfile {
                fore_radius: t.fore_radius,
                aft_radius: t.aft_radius,
                length: t.length,
                thickness: t.thickness,
                shape: t.shape,
                shape_parameter: t.shape_parameter,
            }),
            ComponentKind::BodyTube(b) => Some(BodyProfile::cylinder(b.radius, b.length, b.thickness)),
            _ => None,
        }
    }

    pub fn fin_set(&self) -> Option<&FinSet> {
        match &self.kind {
            ComponentKind::FinSet(f) => Some(f),
            _ => None,
        }
    }

    pub fn tube_fin_set(&self) -> Option<&TubeFinSet> {
        match &self.kind {
            ComponentKind::TubeFinSet(t) => Some(t),
            _ => None,
        }
    }

    pub fn instance_ring(&self) -> Option<&InstanceRing> {
        match &self.kind {
            ComponentKind::ParallelStage(r) | ComponentKind::PodSet(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.profile().is_some()
    }

    /// External components that contribute aerodynamic forces.
    pub fn is_aerodynamic(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::NoseCone(_)
                | ComponentKind::Transition(_)
                | ComponentKind::BodyTube(_)
                | ComponentKind::FinSet(_)
                | ComponentKind::TubeFinSet(_)
        )
    }

    pub fn is_assembly(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Rocket
                | ComponentKind::AxialStage
                | ComponentKind::ParallelStage(_)
                | ComponentKind::PodSet(_)
        )
    }

    pub fn is_stage(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::AxialStage | ComponentKind::ParallelStage(_)
        )
    }

    /// Pod sets and parallel stages, which start an independent airframe branch.
    pub fn is_pod_like(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::ParallelStage(_) | ComponentKind::PodSet(_)
        )
    }

    /// Length of a non-assembly component.
    pub fn own_length(&self) -> Option<f64> {
        match &self.kind {
            ComponentKind::NoseCone(t) | ComponentKind::Transition(t) => Some(t.length),
            ComponentKind::BodyTube(b) => Some(b.length),
            ComponentKind::FinSet(f) => Some(f.length()),
            ComponentKind::TubeFinSet(t) => Some(t.length),
            ComponentKind::MassComponent { length } => Some(*length),
            _ => None,
        }
    }
}
