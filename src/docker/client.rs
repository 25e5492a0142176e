use anyhow::{bail, Context};
use bollard::container::{InspectContainerOptions, ListContainersOptions};
use bollard::models::ContainerSummary;
use bollard::{Docker, API_DEFAULT_VERSION};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::path::{Path, PathBuf};

use super::stats::container_usage;
use crate::config::HostConfig;
use crate::error::{Error, Result};
use crate::fleet::stack::COMPOSE_PROJECT_LABEL;
use crate::fleet::FilterState;
use crate::models::{ContainerRecord, ContainerStatus, Uptime, LOCAL_HOST};
use crate::source::ContainerSource;

pub const CONFIG_FILES_LABEL: &str = "com.docker.compose.project.config_files";
pub const TAGS_LABEL: &str = "composr.tags";

const CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
struct HostConnection {
    name: String,
    docker: Docker,
}

/// Containers from every configured Docker engine
#[derive(Clone)]
pub struct FleetClient {
    hosts: Vec<HostConnection>,
    compose_root: PathBuf,
}

impl FleetClient {
    /// Connect to the local socket and every remote host. A host that cannot
    /// be set up is logged and left out; having none left is an error.
    pub fn connect(remotes: &[HostConfig], compose_root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let mut hosts = Vec::new();

        match Docker::connect_with_socket_defaults() {
            Ok(docker) => hosts.push(HostConnection {
                name: LOCAL_HOST.to_string(),
                docker,
            }),
            Err(e) => tracing::warn!(error = %e, "local Docker socket unavailable"),
        }

        for remote in remotes {
            match connect_remote(&remote.url) {
                Ok(docker) => hosts.push(HostConnection {
                    name: remote.name.clone(),
                    docker,
                }),
                Err(e) => tracing::warn!(host = %remote.name, error = %e, "skipping Docker host"),
            }
        }

        if hosts.is_empty() {
            bail!("Failed to connect to any Docker daemon");
        }

        Ok(Self {
            hosts,
            compose_root: compose_root.into(),
        })
    }

    pub fn host_names(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.name.as_str()).collect()
    }

    async fn list_host(&self, host: &HostConnection) -> Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let summaries = host.docker.list_containers(Some(options)).await?;

        let records = summaries
            .into_iter()
            .map(|summary| record_from_summary(&host.name, summary, &self.compose_root))
            .map(|record| enrich(&host.docker, record));

        Ok(join_all(records).await)
    }
}

fn connect_remote(url: &str) -> anyhow::Result<Docker> {
    if let Some(path) = url.strip_prefix("unix://") {
        return Docker::connect_with_unix(path, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .context(format!("Failed to connect to {}", url));
    }
    if url.starts_with("tcp://") || url.starts_with("http://") {
        return Docker::connect_with_http(url, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .context(format!("Failed to connect to {}", url));
    }
    bail!("Unsupported Docker host URL: {}", url)
}

impl ContainerSource for FleetClient {
    async fn fetch_containers(&self, _filters: &FilterState) -> Result<Vec<ContainerRecord>> {
        let results = join_all(self.hosts.iter().map(|host| self.list_host(host))).await;

        let mut records = Vec::new();
        let mut failed = 0;
        for (host, result) in self.hosts.iter().zip(results) {
            match result {
                Ok(list) => records.extend(list),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(host = %host.name, error = %e, "failed to list containers");
                }
            }
        }

        if failed == self.hosts.len() {
            return Err(Error::AllHostsFailed(failed));
        }
        tracing::debug!(count = records.len(), hosts = self.hosts.len(), "containers fetched");
        Ok(records)
    }
}

/// Map an engine summary into a record, without stats or uptime
pub fn record_from_summary(host: &str, summary: ContainerSummary, compose_root: &Path) -> ContainerRecord {
    let id: String = summary.id.unwrap_or_default().chars().take(12).collect();
    let name = summary
        .names
        .and_then(|names| names.first().cloned())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();

    let mut record = ContainerRecord::new(id, name);
    record.host = host.to_string();
    record.status = ContainerStatus::from_docker_state(&summary.state.unwrap_or_default());
    record.image = summary.image.filter(|i| !i.is_empty());

    let labels = summary.labels.unwrap_or_default();
    record.compose_project = labels.get(COMPOSE_PROJECT_LABEL).cloned();
    record.compose_file = labels
        .get(CONFIG_FILES_LABEL)
        .and_then(|files| files.split(',').next())
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| compose_file_id(f, compose_root));
    record.tags = labels.get(TAGS_LABEL).map(|t| parse_tags(t)).unwrap_or_default();
    record.labels = labels.into_iter().collect();
    record
}

/// Compose file path as the compose view knows it: relative to the root
/// when under it, otherwise just the file name
fn compose_file_id(path: &str, compose_root: &Path) -> String {
    let path = Path::new(path);
    match path.strip_prefix(compose_root) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
    }
}

/// Comma separated tags, order kept, blanks and repeats dropped
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Add stats and uptime to a running container. Failures leave the
/// fields empty.
async fn enrich(docker: &Docker, mut record: ContainerRecord) -> ContainerRecord {
    if !record.status.is_running() {
        return record;
    }

    let inspect = docker.inspect_container(&record.id, None::<InspectContainerOptions>);
    let (usage, inspect) = futures_util::join!(container_usage(docker, &record.id), inspect);

    match usage {
        Ok(Some(usage)) => {
            record.cpu_percent = Some(usage.cpu_percent);
            record.memory_usage_mb = Some(usage.memory_usage_mb);
        }
        Ok(None) => {}
        Err(e) => tracing::debug!(container = %record.name, error = %e, "stats unavailable"),
    }

    match inspect {
        Ok(details) => {
            record.uptime = details
                .state
                .and_then(|s| s.started_at)
                .and_then(|started| parse_started_at(&started))
                .and_then(|started| Uptime::since(started, Utc::now()));
        }
        Err(e) => tracing::debug!(container = %record.name, error = %e, "inspect failed"),
    }

    record
}

fn parse_started_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn summary(labels: &[(&str, &str)]) -> ContainerSummary {
        ContainerSummary {
            id: Some("0123456789abcdef0123".to_string()),
            names: Some(vec!["/immich_server".to_string()]),
            image: Some("ghcr.io/immich-app/immich-server:release".to_string()),
            state: Some("running".to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_mapping() {
        let record = record_from_summary(
            "nas",
            summary(&[
                (COMPOSE_PROJECT_LABEL, "immich"),
                (CONFIG_FILES_LABEL, "/app/projects/immich/docker-compose.yml,/app/projects/immich/override.yml"),
                (TAGS_LABEL, "media, photos,media,,"),
            ]),
            Path::new("/app/projects"),
        );

        assert_eq!(record.id, "0123456789ab");
        assert_eq!(record.name, "immich_server");
        assert_eq!(record.host, "nas");
        assert_eq!(record.status, ContainerStatus::Running);
        assert_eq!(record.compose_project.as_deref(), Some("immich"));
        assert_eq!(record.compose_file.as_deref(), Some("immich/docker-compose.yml"));
        assert_eq!(record.tags, vec!["media", "photos"]);
        assert_eq!(record.labels.len(), 3);
        assert!(record.cpu_percent.is_none());
    }

    #[test]
    fn test_compose_file_outside_root_keeps_file_name() {
        let record = record_from_summary(
            LOCAL_HOST,
            summary(&[(CONFIG_FILES_LABEL, "/home/me/web/compose.yaml")]),
            Path::new("/app/projects"),
        );
        assert_eq!(record.compose_file.as_deref(), Some("compose.yaml"));
    }

    #[test]
    fn test_sparse_summary() {
        let record = record_from_summary(LOCAL_HOST, ContainerSummary::default(), Path::new("/"));
        assert_eq!(record.name, "");
        assert_eq!(record.status, ContainerStatus::Unknown);
        assert!(record.tags.is_empty());
        assert!(record.compose_file.is_none());
    }

    #[test]
    fn test_started_at_parsing() {
        assert!(parse_started_at("2024-05-01T10:00:00.123456789Z").is_some());
        assert!(parse_started_at("garbage").is_none());
        let zero = parse_started_at("0001-01-01T00:00:00Z").unwrap();
        assert!(Uptime::since(zero, Utc::now()).is_none());
    }

    #[test]
    fn test_remote_url_schemes() {
        assert!(connect_remote("ssh://box").is_err());
    }
}
