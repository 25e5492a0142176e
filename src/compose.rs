//! Compose files on disk: discovery under the compose root and any extra
//! directories, and content reads for the compose view.

use glob::{glob_with, MatchOptions, Pattern};
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::source::FileSource;

/// Whether a file name looks like a compose file
pub fn is_compose_file_name(name: &str) -> bool {
    matches!(name, "compose.yml" | "compose.yaml" | "docker-compose.yml")
        || name.starts_with("docker-compose.")
}

fn is_hidden(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

#[derive(Debug, Clone)]
pub struct ComposeFiles {
    root: PathBuf,
    extra_dirs: Vec<PathBuf>,
}

impl ComposeFiles {
    pub fn new(root: impl Into<PathBuf>, extra_dirs: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_dirs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.compose_dir.clone(),
            settings.extra_compose_dirs.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifier for a path: relative to the root when under it, else the
    /// full path
    pub fn identifier(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }

    /// Where an identifier lives on disk.
    ///
    /// Leading `./` and `../` segments of a relative id are dropped, so
    /// `../immich/compose.yml` means `immich/compose.yml` under the root.
    /// Ids that would leave the search directories are refused.
    pub fn resolve_path(&self, id: &str) -> Result<PathBuf> {
        let refused = || Error::FileNotFound(id.to_string());
        let path = Path::new(id);

        if path.is_absolute() {
            let inside = std::iter::once(&self.root)
                .chain(self.extra_dirs.iter())
                .any(|dir| path.starts_with(dir));
            if !inside || path.components().any(|c| c == Component::ParentDir) {
                return Err(refused());
            }
            return Ok(path.to_path_buf());
        }

        let mut components = path
            .components()
            .skip_while(|c| matches!(c, Component::CurDir | Component::ParentDir))
            .peekable();
        if components.peek().is_none() {
            return Err(refused());
        }

        let mut rel = PathBuf::new();
        for component in components {
            match component {
                Component::Normal(part) => rel.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !rel.pop() {
                        return Err(refused());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(refused()),
            }
        }
        Ok(self.root.join(rel))
    }

    /// Walk every search directory for compose files. Hidden directories
    /// are skipped; a missing directory is logged and ignored.
    pub fn scan(&self) -> Result<Vec<String>> {
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut found = Vec::new();
        for dir in std::iter::once(&self.root).chain(self.extra_dirs.iter()) {
            if !dir.exists() {
                tracing::warn!(dir = %dir.display(), "compose search directory does not exist");
                continue;
            }

            let pattern = format!("{}/**/*", Pattern::escape(&dir.to_string_lossy()));
            for path in glob_with(&pattern, options)?.flatten() {
                let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
                    continue;
                };
                if !path.is_file() || !is_compose_file_name(&name) {
                    continue;
                }
                if path.strip_prefix(dir).map(is_hidden).unwrap_or(false) {
                    continue;
                }
                let id = self.identifier(&path);
                tracing::debug!(file = %id, "found compose file");
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }

        found.sort();
        tracing::debug!(count = found.len(), "compose scan finished");
        Ok(found)
    }
}

impl FileSource for ComposeFiles {
    async fn fetch_file_list(&self) -> Result<Vec<String>> {
        let files = self.clone();
        tokio::task::spawn_blocking(move || files.scan())
            .await
            .map_err(|e| Error::Io(io::Error::other(e)))?
    }

    async fn fetch_file_content(&self, id: &str) -> Result<String> {
        let path = self.resolve_path(id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::FileNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
