//! Cross-navigation to a compose file that the destination view has not
//! loaded yet.
//!
//! The target is remembered in durable storage, then matched against the
//! next file list that arrives. The marker is removed at the start of the
//! first attempt, whether or not the attempt finds anything, so one
//! remembered reference is acted on at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::FileSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReference {
    pub target_path: String,
    pub requested_at: DateTime<Utc>,
}

impl PendingReference {
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            requested_at: Utc::now(),
        }
    }
}

/// Durable slot holding at most one pending reference
pub trait PendingStore {
    fn load_pending(&self) -> Option<PendingReference>;
    fn save_pending(&mut self, reference: &PendingReference) -> Result<()>;
    fn clear_pending(&mut self) -> Result<()>;
}

/// Non-durable store, used when no data directory is available
#[derive(Debug, Default)]
pub struct MemoryPendingStore {
    slot: Option<PendingReference>,
}

impl PendingStore for MemoryPendingStore {
    fn load_pending(&self) -> Option<PendingReference> {
        self.slot.clone()
    }

    fn save_pending(&mut self, reference: &PendingReference) -> Result<()> {
        self.slot = Some(reference.clone());
        Ok(())
    }

    fn clear_pending(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}

/// Outcome of matching a pending reference against a file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Nothing was pending
    Idle,
    Matched(String),
    /// Nothing in the list matched; carries the consumed reference
    Unmatched(String),
}

/// Final outcome once the direct-fetch fallback has run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(String),
    Fetched { id: String, content: String },
    NotFound(String),
}

pub struct PendingReferenceResolver<S> {
    store: S,
}

impl<S: PendingStore> PendingReferenceResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Remember a navigation target, replacing any earlier one
    pub fn remember(&mut self, path: &str) -> Result<()> {
        self.store.clear_pending()?;
        self.store.save_pending(&PendingReference::new(path))?;
        tracing::debug!(path, "pending compose reference stored");
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.store.load_pending().is_some()
    }

    pub fn pending(&self) -> Option<PendingReference> {
        self.store.load_pending()
    }

    /// Consume the pending reference and match it against `available`.
    pub fn attempt(&mut self, available: &[String]) -> Attempt {
        let Some(reference) = self.store.load_pending() else {
            return Attempt::Idle;
        };

        // Cleared before matching so a miss never retries on a later list
        if let Err(e) = self.store.clear_pending() {
            tracing::warn!(error = %e, "failed to clear pending compose reference");
        }

        match find_match(&reference.target_path, available) {
            Some(id) => {
                tracing::info!(reference = %reference.target_path, matched = %id, "pending compose reference resolved");
                Attempt::Matched(id)
            }
            None => {
                tracing::info!(reference = %reference.target_path, candidates = available.len(), "pending compose reference unmatched");
                Attempt::Unmatched(reference.target_path)
            }
        }
    }

    /// Matched identifier, or None when nothing was pending or nothing matched
    pub fn resolve(&mut self, available: &[String]) -> Option<String> {
        match self.attempt(available) {
            Attempt::Matched(id) => Some(id),
            Attempt::Idle | Attempt::Unmatched(_) => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

type Matcher = fn(&str, &str) -> bool;

/// Matchers in priority order: (name, reference, candidate)
const MATCHERS: &[(&str, Matcher)] = &[
    ("exact", same_exact),
    ("case-insensitive", same_ignoring_case),
    ("without extension", same_without_extension),
    ("directory and stem", same_directory_and_stem),
    ("file name", same_file_name),
];

/// Find the identifier a reference most likely means
pub fn find_match(reference: &str, available: &[String]) -> Option<String> {
    MATCHERS.iter().find_map(|(name, matches)| {
        available.iter().find(|c| matches(reference, c)).map(|c| {
            tracing::debug!(reference, candidate = %c, rule = *name, "compose reference matched");
            c.clone()
        })
    })
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// File name without its final extension. Dotfiles keep their name.
fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

fn without_extension(path: &str) -> String {
    let segs = segments(path);
    let Some((last, dirs)) = segs.split_last() else {
        return String::new();
    };
    let mut out: Vec<&str> = dirs.to_vec();
    out.push(stem(last));
    out.join("/").to_lowercase()
}

fn same_exact(reference: &str, candidate: &str) -> bool {
    reference == candidate
}

fn same_ignoring_case(reference: &str, candidate: &str) -> bool {
    reference.to_lowercase() == candidate.to_lowercase()
}

fn same_without_extension(reference: &str, candidate: &str) -> bool {
    let r = without_extension(reference);
    !r.is_empty() && r == without_extension(candidate)
}

fn same_directory_and_stem(reference: &str, candidate: &str) -> bool {
    let (r, c) = (segments(reference), segments(candidate));
    if r.len() < 2 || c.len() < 2 {
        return false;
    }
    let (r_dir, r_file) = (r[r.len() - 2], r[r.len() - 1]);
    let (c_dir, c_file) = (c[c.len() - 2], c[c.len() - 1]);
    r_dir.to_lowercase() == c_dir.to_lowercase()
        && stem(r_file).to_lowercase() == stem(c_file).to_lowercase()
}

fn same_file_name(reference: &str, candidate: &str) -> bool {
    match (segments(reference).last(), segments(candidate).last()) {
        (Some(r), Some(c)) => r.to_lowercase() == c.to_lowercase(),
        _ => false,
    }
}

/// The same path with `.yml` and `.yaml` swapped, if it has either
pub fn toggle_extension(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    let dot = trimmed.rfind('.')?;
    let (base, ext) = trimmed.split_at(dot);
    let swapped = if ext.eq_ignore_ascii_case(".yml") {
        ".yaml"
    } else if ext.eq_ignore_ascii_case(".yaml") {
        ".yml"
    } else {
        return None;
    };
    Some(format!("{}{}", base, swapped))
}

/// A relative reference without its leading `./` and `../` segments
pub fn strip_relative_prefix(path: &str) -> &str {
    let mut rest = path;
    loop {
        if let Some(tail) = rest.strip_prefix("../").or_else(|| rest.strip_prefix("./")) {
            rest = tail;
        } else {
            return rest;
        }
    }
}

/// Direct-fetch fallback for an unmatched reference: the path, then the
/// path with the other YAML extension. Relative prefixes are dropped first
/// since file ids are relative to the compose root.
pub async fn fetch_fallback<F: FileSource>(files: &F, reference: &str) -> Resolution {
    let path = strip_relative_prefix(reference);
    let mut candidates = vec![path.to_string()];
    candidates.extend(toggle_extension(path));

    for id in candidates {
        match files.fetch_file_content(&id).await {
            Ok(content) => {
                tracing::info!(reference, fetched = %id, "compose reference loaded directly");
                return Resolution::Fetched { id, content };
            }
            Err(e) if e.is_not_found() => tracing::debug!(id = %id, "no compose file at path"),
            Err(e) => tracing::warn!(id = %id, error = %e, "direct compose fetch failed"),
        }
    }

    tracing::warn!(reference, "compose reference could not be loaded");
    Resolution::NotFound(reference.to_string())
}
