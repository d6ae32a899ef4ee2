pub mod aerodynamics;

pub use aerodynamics::{
    AeroTable, AerodynamicCalculator, BarrowmanDragCalculator, BarrowmanStabilityCalculator,
    DragCalculator, ForceBreakdown, StabilityCalculator,
};
