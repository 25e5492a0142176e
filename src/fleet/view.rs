//! Filter, sort and group composed into one view build.
//!
//! Ordering precedence: the explicit sort key orders flat views and the
//! members inside stack and host groups. Tag grouping is the exception: its
//! members are always ordered by primary tag, then name, whatever sort key is
//! selected. Groups themselves are always ordered by key.

use super::filter::{self, FilterState, GroupMode};
use super::group::{self, ViewModel};
use super::sort;
use crate::models::ContainerRecord;

/// Build the view model for a record snapshot under a filter state.
pub fn build(records: &[ContainerRecord], state: &FilterState) -> ViewModel {
    let mut visible = filter::apply(records, state);

    if state.group == GroupMode::Tag {
        sort::sort_by_tag(&mut visible);
    } else {
        sort::sort(&mut visible, state.sort_key, state.sort_direction);
    }

    let view = group::group(visible, state.group);
    tracing::debug!(
        total = records.len(),
        visible = view.len(),
        group = state.group.as_str(),
        sort = state.sort_key.as_str(),
        "view rebuilt"
    );
    view
}
