use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host name used when a record does not carry one
pub const LOCAL_HOST: &str = "local";

/// Status of a Docker container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Exited,
    Paused,
    Created,
    Restarting,
    Removing,
    Dead,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ContainerStatus {
    pub fn from_docker_state(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "running" => Self::Running,
            "exited" => Self::Exited,
            "paused" => Self::Paused,
            "created" => Self::Created,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Exited => "exited",
            Self::Paused => "paused",
            Self::Created => "created",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Check the status against a status filter value.
    /// "stopped" is accepted as shorthand for every non-running state.
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.eq_ignore_ascii_case("stopped") {
            return !self.is_running();
        }
        self.as_str().eq_ignore_ascii_case(filter)
    }
}

/// How long a container has been up
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Uptime {
    pub minutes: u64,
    pub display: String,
}

impl Uptime {
    pub fn from_minutes(minutes: u64) -> Self {
        let days = minutes / (24 * 60);
        let hours = (minutes % (24 * 60)) / 60;
        let mins = minutes % 60;

        let display = if days > 0 {
            format!("{}d {}h", days, hours)
        } else if hours > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}m", mins)
        };

        Self { minutes, display }
    }

    /// Uptime between a container's start time and `now`.
    /// None for Docker's zero timestamp (never started) and for future times.
    pub fn since(started_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Self> {
        let elapsed = now.signed_duration_since(started_at);
        if elapsed.num_seconds() < 0 || started_at.timestamp() <= 0 {
            return None;
        }
        Some(Self::from_minutes(elapsed.num_minutes() as u64))
    }
}

/// Snapshot of one container as delivered by a container source.
///
/// Every field except `id` and `name` may be missing in what the backend
/// sends; serde defaults fill in the gaps instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: ContainerStatus,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub cpu_percent: Option<f64>,
    #[serde(default)]
    pub memory_usage_mb: Option<f64>,
    #[serde(default)]
    pub uptime: Option<Uptime>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub compose_file: Option<String>,
    #[serde(default)]
    pub compose_project: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_host() -> String {
    LOCAL_HOST.to_string()
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ContainerStatus::Unknown,
            host: default_host(),
            cpu_percent: None,
            memory_usage_mb: None,
            uptime: None,
            tags: Vec::new(),
            compose_file: None,
            compose_project: None,
            labels: BTreeMap::new(),
            image: None,
        }
    }

    /// Host name, treating a blank host as local
    pub fn host(&self) -> &str {
        if self.host.trim().is_empty() {
            LOCAL_HOST
        } else {
            &self.host
        }
    }

    /// First tag, used for tag grouping
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// CPU usage with missing or NaN values read as zero
    pub fn cpu(&self) -> f64 {
        finite_or_zero(self.cpu_percent)
    }

    /// Memory usage in MB with missing or NaN values read as zero
    pub fn memory_mb(&self) -> f64 {
        finite_or_zero(self.memory_usage_mb)
    }

    pub fn uptime_minutes(&self) -> u64 {
        self.uptime.as_ref().map(|u| u.minutes).unwrap_or(0)
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
