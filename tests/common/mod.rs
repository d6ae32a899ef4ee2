mod assertions;
mod fixtures;

// Re-export
pub use assertions::{assert_forces_close, assert_forces_valid};
pub use fixtures::*;
