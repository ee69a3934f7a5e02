//! # Chronometer
//!
//! A stopwatch primitive with pause/resume, lap accounting, and a keyed
//! registry for naming chronometers by task.
//!
//! ## Core Concepts
//!
//! - **Chronometer**: a single stopwatch moving through `Idle`, `Started`,
//!   `Paused` and the terminal `Stopped` state. Calls that make no sense for the
//!   current state are ignored rather than treated as errors; the returned
//!   `Transition` or reading tells the caller what happened.
//! - **Laps**: while running, `add_lap_time` freezes a snapshot holding the time
//!   since the previous lap. Snapshots are independent, stopped chronometers.
//! - **TaskRegistry**: an owned map from any `Eq + Hash` key to exactly one
//!   chronometer. Keys can be created once and are never removed.
//! - **TimeSource**: readings come from the monotonic host clock by default.
//!   `ManualClock` makes timing deterministic in tests.
//!
//! ## Example Usage
//!
//! ```rust
//! use chronometer::prelude::*;
//!
//! let mut tasks: TaskRegistry<&str> = TaskRegistry::new();
//! tasks.create_task("build")?;
//!
//! tasks.add_lap_time(&"build", "compile")?;
//! let elapsed = tasks.pause_task(&"build")?;
//! assert!(elapsed >= 0.0);
//!
//! for (label, lap) in tasks.get_task(&"build")?.entries(SortOrder::Ascending) {
//!     println!("{label}: {}", lap.read_time_string());
//! }
//! # Ok::<(), chronometer::error::RegistryError>(())
//! ```

pub const CRATE_NAME: &str = "Chronometer";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod chronometer;
pub mod common;
pub mod config;
pub mod error;
pub mod format;
pub mod registry;
pub mod time;

/// A prelude module for easy importing of the most common types.
pub mod prelude {
    pub use crate::chronometer::{Chronometer, Entries, State, Transition};
    pub use crate::common::{SortOrder, TaskId};
    pub use crate::config::{ChronoConfig, TaskDefaults};
    pub use crate::error::RegistryError;
    pub use crate::registry::TaskRegistry;
    pub use crate::time::{ManualClock, SystemClock, TimeSource};
}
