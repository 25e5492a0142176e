use crate::error::Result;
use crate::fleet::{Generation, Resolution};
use crate::models::ContainerRecord;

/// Messages from background tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic refresh timer fired
    PollTick,
    Containers {
        generation: Generation,
        result: Result<Vec<ContainerRecord>>,
    },
    FileList {
        generation: Generation,
        result: Result<Vec<String>>,
    },
    FileContent {
        id: String,
        result: Result<String>,
    },
    /// Outcome of the direct-fetch fallback for a pending compose reference
    Resolved(Resolution),
}
