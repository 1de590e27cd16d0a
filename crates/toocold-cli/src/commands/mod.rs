//! Command implementations.

mod accent;
mod compare;
mod config;
mod snapshot;
mod stats;
mod watch;

pub use accent::cmd_accent;
pub use compare::cmd_compare;
pub use config::cmd_config;
pub use snapshot::cmd_snapshot;
pub use stats::cmd_stats;
pub use watch::{WatchArgs, cmd_watch};
