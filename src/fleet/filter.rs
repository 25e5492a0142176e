use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stack;
use crate::error::Error;
use crate::models::ContainerRecord;

/// How the view partitions containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    #[default]
    None,
    Stack,
    Tag,
    Host,
}

impl GroupMode {
    pub const ALL: [GroupMode; 4] = [Self::None, Self::Stack, Self::Tag, Self::Host];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Stack => "stack",
            Self::Tag => "tag",
            Self::Host => "host",
        }
    }
}

impl FromStr for GroupMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Self::None),
            "stack" => Ok(Self::Stack),
            "tag" => Ok(Self::Tag),
            "host" => Ok(Self::Host),
            other => Err(Error::InvalidFieldValue {
                field: "group",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Cpu,
    Memory,
    Uptime,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::Name, Self::Cpu, Self::Memory, Self::Uptime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Uptime => "uptime",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "name" => Ok(Self::Name),
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            "uptime" => Ok(Self::Uptime),
            other => Err(Error::InvalidFieldValue {
                field: "sort",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "" | "desc" => Ok(Self::Desc),
            other => Err(Error::InvalidFieldValue {
                field: "direction",
                value: other.to_string(),
            }),
        }
    }
}

/// One filter/sort/group control. Both control surfaces expose the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    Search,
    Status,
    Tag,
    Stack,
    Host,
    Group,
    SortKey,
    SortDirection,
}

impl ControlField {
    pub const ALL: [ControlField; 8] = [
        Self::Search,
        Self::Status,
        Self::Tag,
        Self::Stack,
        Self::Host,
        Self::Group,
        Self::SortKey,
        Self::SortDirection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Status => "Status",
            Self::Tag => "Tag",
            Self::Stack => "Stack",
            Self::Host => "Host",
            Self::Group => "Group",
            Self::SortKey => "Sort",
            Self::SortDirection => "Order",
        }
    }

    /// Free-text fields are debounced, discrete ones apply immediately
    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::Search)
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status values offered by the status control
pub const STATUS_OPTIONS: &[&str] = &["running", "stopped", "exited", "paused", "restarting"];

/// The one logical filter/sort/group state. Empty strings mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub status: String,
    pub tag: String,
    pub stack: String,
    pub host: String,
    pub group: GroupMode,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl FilterState {
    /// Current value of a field in its string form
    pub fn get(&self, field: ControlField) -> String {
        match field {
            ControlField::Search => self.search.clone(),
            ControlField::Status => self.status.clone(),
            ControlField::Tag => self.tag.clone(),
            ControlField::Stack => self.stack.clone(),
            ControlField::Host => self.host.clone(),
            ControlField::Group => self.group.as_str().to_string(),
            ControlField::SortKey => self.sort_key.as_str().to_string(),
            ControlField::SortDirection => self.sort_direction.as_str().to_string(),
        }
    }

    /// Set a field from its string form. Returns whether the value changed.
    pub fn set(&mut self, field: ControlField, value: &str) -> Result<bool, Error> {
        let changed = match field {
            ControlField::Search => replace(&mut self.search, value.to_string()),
            ControlField::Status => replace(&mut self.status, value.to_string()),
            ControlField::Tag => replace(&mut self.tag, value.to_string()),
            ControlField::Stack => replace(&mut self.stack, value.to_string()),
            ControlField::Host => replace(&mut self.host, value.to_string()),
            ControlField::Group => replace(&mut self.group, value.parse()?),
            ControlField::SortKey => replace(&mut self.sort_key, value.parse()?),
            ControlField::SortDirection => replace(&mut self.sort_direction, value.parse()?),
        };
        Ok(changed)
    }

    /// Whether any narrowing predicate is active
    pub fn is_filtering(&self) -> bool {
        !(self.search.is_empty()
            && self.status.is_empty()
            && self.tag.is_empty()
            && self.stack.is_empty()
            && self.host.is_empty())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Apply the filter predicates. Output keeps input order and never includes
/// a record the input did not have.
///
/// Predicates run cheapest first: status, tag, stack, host, then the
/// case-insensitive name search.
pub fn apply(records: &[ContainerRecord], state: &FilterState) -> Vec<ContainerRecord> {
    let needle = state.search.to_lowercase();

    records
        .iter()
        .filter(|r| state.status.is_empty() || r.status.matches_filter(&state.status))
        .filter(|r| state.tag.is_empty() || r.tags.iter().any(|t| *t == state.tag))
        .filter(|r| state.stack.is_empty() || stack::resolve(r) == state.stack)
        .filter(|r| state.host.is_empty() || r.host() == state.host)
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Values the select controls can cycle through, collected from the
/// unfiltered record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub tags: Vec<String>,
    pub stacks: Vec<String>,
    pub hosts: Vec<String>,
}

impl FilterOptions {
    pub fn collect(records: &[ContainerRecord]) -> Self {
        let mut tags = BTreeSet::new();
        let mut stacks = BTreeSet::new();
        let mut hosts = BTreeSet::new();

        for record in records {
            tags.extend(record.tags.iter().cloned());
            stacks.insert(stack::resolve(record));
            hosts.insert(record.host().to_string());
        }

        Self {
            tags: tags.into_iter().collect(),
            stacks: stacks.into_iter().collect(),
            hosts: hosts.into_iter().collect(),
        }
    }

    /// Choices for a select field, with "" (no filter) first
    pub fn choices(&self, field: ControlField) -> Vec<String> {
        let values: Vec<String> = match field {
            ControlField::Status => STATUS_OPTIONS.iter().map(|s| s.to_string()).collect(),
            ControlField::Tag => self.tags.clone(),
            ControlField::Stack => self.stacks.clone(),
            ControlField::Host => self.hosts.clone(),
            ControlField::Group => {
                return GroupMode::ALL.iter().map(|g| g.as_str().to_string()).collect()
            }
            ControlField::SortKey => {
                return SortKey::ALL.iter().map(|k| k.as_str().to_string()).collect()
            }
            ControlField::SortDirection => {
                return vec!["desc".to_string(), "asc".to_string()];
            }
            ControlField::Search => return Vec::new(),
        };

        std::iter::once(String::new()).chain(values).collect()
    }

    /// Value after `current` in the field's choices, wrapping around
    pub fn cycle(&self, field: ControlField, current: &str) -> Option<String> {
        let choices = self.choices(field);
        if choices.is_empty() {
            return None;
        }
        let next = choices
            .iter()
            .position(|c| c == current)
            .map(|i| (i + 1) % choices.len())
            .unwrap_or(0);
        Some(choices[next].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerStatus;

    fn record(name: &str, status: ContainerStatus, tags: &[&str], project: &str) -> ContainerRecord {
        let mut r = ContainerRecord::new(format!("id-{}", name), name);
        r.status = status;
        r.tags = tags.iter().map(|t| t.to_string()).collect();
        r.compose_project = Some(project.to_string());
        r
    }

    fn fleet() -> Vec<ContainerRecord> {
        vec![
            record("Immich-Server", ContainerStatus::Running, &["media", "photos"], "immich"),
            record("immich-db", ContainerStatus::Exited, &["db"], "immich"),
            record("grafana", ContainerStatus::Running, &["monitoring"], "observability"),
            record("loki", ContainerStatus::Running, &["monitoring", "logs"], "observability"),
        ]
    }

    #[test]
    fn test_empty_state_keeps_everything() {
        let records = fleet();
        assert_eq!(apply(&records, &FilterState::default()), records);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let state = FilterState {
            search: "IMMICH".into(),
            ..Default::default()
        };
        let names: Vec<_> = apply(&fleet(), &state).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Immich-Server", "immich-db"]);
    }

    #[test]
    fn test_search_whitespace_is_part_of_the_needle() {
        let mut records = fleet();
        records.push(ContainerRecord::new("x", "web app"));
        records.push(ContainerRecord::new("y", "webapp"));
        let state = FilterState {
            search: "web ".into(),
            ..Default::default()
        };
        let names: Vec<_> = apply(&records, &state).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["web app"]);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let state = FilterState {
            status: "running".into(),
            stack: "observability".into(),
            tag: "logs".into(),
            ..Default::default()
        };
        let out = apply(&fleet(), &state);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "loki");
    }

    #[test]
    fn test_output_is_subset_satisfying_predicates() {
        let records = fleet();
        let state = FilterState {
            tag: "monitoring".into(),
            ..Default::default()
        };
        let out = apply(&records, &state);
        assert!(out.iter().all(|r| records.contains(r)));
        assert!(out.iter().all(|r| r.tags.contains(&"monitoring".to_string())));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_tag_match_is_exact() {
        let state = FilterState {
            tag: "Media".into(),
            ..Default::default()
        };
        assert!(apply(&fleet(), &state).is_empty());
    }

    #[test]
    fn test_set_reports_change_and_rejects_bad_enums() {
        let mut state = FilterState::default();
        assert!(state.set(ControlField::Group, "stack").unwrap());
        assert!(!state.set(ControlField::Group, "stack").unwrap());
        assert_eq!(state.group, GroupMode::Stack);
        assert!(state.set(ControlField::SortKey, "bogus").is_err());
        assert_eq!(state.get(ControlField::SortDirection), "desc");
    }

    #[test]
    fn test_options_are_sorted_and_unique() {
        let options = FilterOptions::collect(&fleet());
        assert_eq!(options.stacks, vec!["immich", "observability"]);
        assert_eq!(options.tags, vec!["db", "logs", "media", "monitoring", "photos"]);
        assert_eq!(options.hosts, vec!["local"]);
    }

    #[test]
    fn test_cycle_wraps_through_no_filter() {
        let options = FilterOptions::collect(&fleet());
        assert_eq!(options.cycle(ControlField::Stack, "").as_deref(), Some("immich"));
        assert_eq!(
            options.cycle(ControlField::Stack, "observability").as_deref(),
            Some("")
        );
        assert_eq!(options.cycle(ControlField::Group, "host").as_deref(), Some("none"));
        assert_eq!(options.cycle(ControlField::Search, ""), None);
    }
}
