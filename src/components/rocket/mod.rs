mod component;
mod configuration;
mod shape;
mod tree;

pub use component::{
    AxialPosition, BodyTube, ComponentId, ComponentKind, CrossSection, DragOverride, FinSet,
    Finish, InstanceRing, RocketComponent, Transition, TubeFinSet,
};
pub use configuration::{ComponentInstances, FlightConfiguration};
pub use shape::{BodyProfile, TransitionShape};
pub use tree::Rocket;
