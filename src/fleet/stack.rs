//! Stack key derivation.
//!
//! A stack key is the name of the deployment unit a container belongs to.
//! It is derived from whatever metadata the record carries, walking an
//! ordered list of extractors and taking the first one that yields a value.

use crate::models::ContainerRecord;

/// Explicit stack label set by the user on a container
pub const STACK_LABEL: &str = "composr.stack";
/// Project label written by docker compose
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Directory names that never name a stack on their own
const GENERIC_DIRS: &[&str] = &[
    "home", "var", "opt", "usr", "etc", "mnt", "srv", "data", "app", "docker",
];

/// Default compose file name used when a stack has none on record
const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yaml";

type Extractor = fn(&ContainerRecord) -> Option<String>;

/// Extractors in priority order. The record name is the final fallback.
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("stack label", from_stack_label),
    ("compose project", from_compose_project),
    ("compose file path", from_compose_file),
    ("compose project label", from_compose_label),
];

/// Resolve the stack key for a record. Never returns an empty string.
pub fn resolve(record: &ContainerRecord) -> String {
    EXTRACTORS
        .iter()
        .find_map(|(_, extract)| extract(record))
        .unwrap_or_else(|| fallback_name(record))
}

/// Name of the rule that produced the key, for diagnostics
pub fn resolved_by(record: &ContainerRecord) -> &'static str {
    EXTRACTORS
        .iter()
        .find(|(_, extract)| extract(record).is_some())
        .map(|(name, _)| *name)
        .unwrap_or("container name")
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn from_stack_label(record: &ContainerRecord) -> Option<String> {
    record.labels.get(STACK_LABEL).and_then(|v| non_blank(v))
}

fn from_compose_project(record: &ContainerRecord) -> Option<String> {
    record.compose_project.as_deref().and_then(non_blank)
}

fn from_compose_file(record: &ContainerRecord) -> Option<String> {
    record.compose_file.as_deref().and_then(stack_from_path)
}

fn from_compose_label(record: &ContainerRecord) -> Option<String> {
    record.labels.get(COMPOSE_PROJECT_LABEL).and_then(|v| non_blank(v))
}

fn fallback_name(record: &ContainerRecord) -> String {
    non_blank(&record.name).unwrap_or_else(|| {
        // Nameless records still need a distinct, stable key
        if record.id.trim().is_empty() {
            "unnamed".to_string()
        } else {
            record.id.clone()
        }
    })
}

/// Pick the stack name out of a compose file path.
///
/// Takes the first segment from the root that is not a generic directory
/// name. If every segment is generic, the second-to-last segment wins, or
/// the only one when there is just one.
pub fn stack_from_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();

    if let Some(first) = segments.iter().find(|s| !is_generic_dir(s)) {
        return Some((*first).to_string());
    }

    match segments.len() {
        0 => None,
        1 => Some(segments[0].to_string()),
        n => Some(segments[n - 2].to_string()),
    }
}

fn is_generic_dir(segment: &str) -> bool {
    GENERIC_DIRS
        .iter()
        .any(|dir| dir.eq_ignore_ascii_case(segment))
}

/// Find the compose file that owns a stack, given the stack's members.
///
/// The first member carrying a compose file wins. A bare file name is
/// prefixed with the stack key; any path (including `../` ones) is kept. With no
/// compose file on any member, the default file name under the stack
/// directory is returned.
pub fn compose_file_for_stack(members: &[ContainerRecord]) -> Option<String> {
    let first = members.first()?;
    let stack = resolve(first);

    for member in members {
        if let Some(file) = member.compose_file.as_deref().filter(|f| !f.is_empty()) {
            if file.contains('/') {
                return Some(file.to_string());
            }
            return Some(format!("{}/{}", stack, file));
        }
    }

    Some(format!("{}/{}", stack, DEFAULT_COMPOSE_FILE))
}
