pub mod layout;
pub mod styles;

pub use layout::*;
pub use styles::{status_icon, Palette};
