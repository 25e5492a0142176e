//! Fleet view engine: stack keys, filtering, sorting, grouping, control
//! state and pending cross-navigation. Everything here is synchronous and
//! free of I/O except the direct-fetch fallback, which goes through a
//! [`FileSource`](crate::source::FileSource).

pub mod filter;
pub mod group;
pub mod pending;
pub mod refresh;
pub mod sort;
pub mod stack;
pub mod sync;
pub mod view;

pub use filter::{ControlField, FilterOptions, FilterState, GroupMode, SortDirection, SortKey};
pub use group::{Group, ViewModel};
pub use pending::{
    Attempt, MemoryPendingStore, PendingReference, PendingReferenceResolver, PendingStore,
    Resolution,
};
pub use refresh::{Generation, RefreshTracker};
pub use sync::{ControlStateSync, Surface};
