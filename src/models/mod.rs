pub mod container;
pub mod stats;

pub use container::{ContainerRecord, ContainerStatus, Uptime, LOCAL_HOST};
pub use stats::GroupStats;
