pub mod client;
pub mod stats;

pub use client::FleetClient;
