//! Convenience re-exports for common hook-system usage

pub use crate::event::HookPoint;
pub use crate::manager::{HookCallback, HookSet};
