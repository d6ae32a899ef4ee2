mod aero;
mod atmosphere;
mod errors;

pub use aero::{AeroConfig, AeroConfigBuilder};
pub use atmosphere::{AtmosphereConfig, AtmosphereType};
pub use errors::ConfigError;
