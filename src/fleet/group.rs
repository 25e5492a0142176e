use std::collections::HashMap;

use super::filter::GroupMode;
use super::stack;
use crate::models::{ContainerRecord, GroupStats};

/// Bucket key for records without any tag in tag mode
pub const UNTAGGED: &str = "Untagged";

/// A run of containers sharing one group key
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub stats: GroupStats,
    pub members: Vec<ContainerRecord>,
}

/// Render-ready view of the filtered fleet.
///
/// `Empty` is distinct from a grouped view with no members so renderers can
/// show an empty-state message instead of a bare group header.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewModel {
    #[default]
    Empty,
    Flat(Vec<ContainerRecord>),
    Grouped(Vec<Group>),
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewModel::Empty)
    }

    /// Number of container records in the view
    pub fn len(&self) -> usize {
        match self {
            ViewModel::Empty => 0,
            ViewModel::Flat(records) => records.len(),
            ViewModel::Grouped(groups) => groups.iter().map(|g| g.members.len()).sum(),
        }
    }

    /// All records in display order, flattening groups
    pub fn records(&self) -> Box<dyn Iterator<Item = &ContainerRecord> + '_> {
        match self {
            ViewModel::Empty => Box::new(std::iter::empty()),
            ViewModel::Flat(records) => Box::new(records.iter()),
            ViewModel::Grouped(groups) => Box::new(groups.iter().flat_map(|g| g.members.iter())),
        }
    }

    /// Record at a flattened display index
    pub fn record_at(&self, index: usize) -> Option<&ContainerRecord> {
        self.records().nth(index)
    }

    pub fn groups(&self) -> &[Group] {
        match self {
            ViewModel::Grouped(groups) => groups,
            _ => &[],
        }
    }
}

/// Group key of a record under a grouping mode
pub fn group_key(record: &ContainerRecord, mode: GroupMode) -> String {
    match mode {
        GroupMode::None => String::new(),
        GroupMode::Stack => stack::resolve(record),
        GroupMode::Tag => record.primary_tag().unwrap_or(UNTAGGED).to_string(),
        GroupMode::Host => record.host().to_string(),
    }
}

/// Partition records into groups.
///
/// Members keep the order they arrive in; groups come out sorted by key.
/// With `GroupMode::None` the records pass through as a flat view.
pub fn group(records: Vec<ContainerRecord>, mode: GroupMode) -> ViewModel {
    if records.is_empty() {
        return ViewModel::Empty;
    }
    if mode == GroupMode::None {
        return ViewModel::Flat(records);
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<ContainerRecord>)> = Vec::new();

    for record in records {
        let key = group_key(&record, mode);
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(record),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![record]));
            }
        }
    }

    buckets.sort_by(|a, b| a.0.cmp(&b.0));

    let groups = buckets
        .into_iter()
        .map(|(key, members)| Group {
            key,
            stats: GroupStats::from_members(&members),
            members,
        })
        .collect();

    ViewModel::Grouped(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, project: &str, host: &str) -> ContainerRecord {
        let mut r = ContainerRecord::new(name, name);
        r.compose_project = Some(project.into());
        r.host = host.into();
        r
    }

    #[test]
    fn test_empty_input_is_empty_view() {
        assert_eq!(group(Vec::new(), GroupMode::Stack), ViewModel::Empty);
        assert_eq!(group(Vec::new(), GroupMode::None), ViewModel::Empty);
    }

    #[test]
    fn test_none_passes_through() {
        let records = vec![record("b", "x", "local"), record("a", "x", "local")];
        assert_eq!(group(records.clone(), GroupMode::None), ViewModel::Flat(records));
    }

    #[test]
    fn test_stack_groups_partition_input() {
        let records = vec![
            record("web", "shop", "local"),
            record("db", "auth", "local"),
            record("cache", "shop", "local"),
            record("api", "auth", "local"),
            record("solo", "zeta", "local"),
        ];
        let view = group(records, GroupMode::Stack);
        let groups = view.groups();

        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["auth", "shop", "zeta"]);
        assert_eq!(groups.iter().map(|g| g.members.len()).sum::<usize>(), 5);
        assert!(groups.iter().all(|g| g.stats.total == g.members.len()));

        // first-seen order inside a bucket
        let shop: Vec<_> = groups[1].members.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(shop, vec!["web", "cache"]);
    }

    #[test]
    fn test_host_grouping_defaults_blank_to_local() {
        let records = vec![record("a", "s", ""), record("b", "s", "nas")];
        let view = group(records, GroupMode::Host);
        let keys: Vec<_> = view.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["local", "nas"]);
    }

    #[test]
    fn test_tag_grouping_uses_primary_tag() {
        let mut a = record("a", "s", "local");
        a.tags = vec!["web".into(), "prod".into()];
        let b = record("b", "s", "local");
        let view = group(vec![a, b], GroupMode::Tag);
        let keys: Vec<_> = view.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Untagged", "web"]);
    }

    #[test]
    fn test_flattened_records_follow_display_order() {
        let records = vec![record("x", "b", "local"), record("y", "a", "local")];
        let view = group(records, GroupMode::Stack);
        let order: Vec<_> = view.records().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["y", "x"]);
        assert_eq!(view.len(), 2);
        assert_eq!(view.record_at(1).map(|r| r.name.as_str()), Some("x"));
    }
}
