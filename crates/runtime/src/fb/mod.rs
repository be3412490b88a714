//! Built-in standard function blocks (spec.md §4.5): timers, counters, edge
//! detectors, bistables. Each submodule owns its instance record and a pair
//! of pure functions - one invoked at FB-call time (edge reactions), one
//! invoked at scan-tick time (time advancement) where the FB has any. User
//! function blocks live in [`user_fb`] alongside the built-ins because they
//! share the same call-dispatch seam in `crate::call`.

pub mod bistable;
pub mod counter;
pub mod edge;
pub mod timer;
pub mod user_fb;

pub use bistable::{BistableInstance, BistableKind};
pub use counter::{CounterInstance, CounterKind};
pub use edge::{EdgeInstance, EdgeKind};
pub use timer::{TimerInstance, TimerKind};
pub use user_fb::UserFbInstance;
