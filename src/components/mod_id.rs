use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MOD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic modification token.
///
/// Every mutation that matters to a cache takes a fresh id, so two equal ids
/// mean "nothing changed in between". Because ids only grow, the newest of
/// several tokens can be found with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModId(u64);

impl ModId {
    /// Never handed out by [`ModId::new`]; used for "not yet observed".
    pub const INVALID: ModId = ModId(0);

    pub fn new() -> Self {
        ModId(NEXT_MOD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for ModId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod#{}", self.0)
    }
}
