//! Terminal dashboard for a Docker fleet: containers from one or more
//! engines grouped into stacks, filtered and sorted client-side, with a
//! compose file browser alongside.

pub mod action;
pub mod app;
pub mod components;
pub mod compose;
pub mod config;
pub mod docker;
pub mod error;
pub mod event;
pub mod fleet;
pub mod logging;
pub mod models;
pub mod poller;
pub mod source;
pub mod state;
pub mod store;
pub mod tui;
pub mod ui;

pub use error::{Error, Result};
