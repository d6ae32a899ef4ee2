pub mod constants;
pub mod errors;
pub mod interpolate;
pub mod math;

pub use constants::*;
pub use errors::*;
pub use interpolate::*;
pub use math::*;
