mod rockets;
mod tables;

// Re-export test fixtures
pub use rockets::*;
pub use tables::*;
