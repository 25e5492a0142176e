//! Collaborators the dashboard reads from.

use std::future::Future;

use crate::error::Result;
use crate::fleet::FilterState;
use crate::models::ContainerRecord;

/// Where container records come from.
///
/// Implementations may narrow the result with `filters`, but the view is
/// always rebuilt client-side from whatever comes back.
pub trait ContainerSource {
    fn fetch_containers(
        &self,
        filters: &FilterState,
    ) -> impl Future<Output = Result<Vec<ContainerRecord>>> + Send;
}

/// Where compose files come from
pub trait FileSource {
    /// Identifiers of every known compose file
    fn fetch_file_list(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Content of one file. A missing file is `Error::FileNotFound`.
    fn fetch_file_content(&self, id: &str) -> impl Future<Output = Result<String>> + Send;
}
