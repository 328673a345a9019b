//! Shared state and messaging between pipeline threads

pub mod messages;
pub mod stats;

pub use messages::PipelineEvent;
pub use stats::{PipelineStats, StatsSnapshot};
