//! Durable UI preferences: pending compose reference, preferred render
//! surface and theme, kept in one small JSON document.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::fleet::{PendingReference, PendingStore};

pub const PREFS_FILE: &str = "prefs.json";

/// Which render surface draws the container view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderSurface {
    #[default]
    Grid,
    Table,
}

impl RenderSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Table => "table",
        }
    }

    /// Unknown or missing preference strings fall back to the grid
    pub fn from_pref(value: Option<&str>) -> Self {
        match value {
            Some("table") => Self::Table,
            _ => Self::Grid,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Grid => Self::Table,
            Self::Table => Self::Grid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub pending_compose_file: Option<PendingReference>,
    #[serde(default)]
    pub preferred_view: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Shared handle to the preference document. Clones see the same state;
/// every change is written through to disk when the store has a path.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    inner: Arc<Mutex<Preferences>>,
}

impl PreferenceStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let prefs = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt preferences");
                Preferences::default()
            }),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read preferences");
                }
                Preferences::default()
            }
        };

        Self {
            path: Some(path),
            inner: Arc::new(Mutex::new(prefs)),
        }
    }

    /// Store without a backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Arc::new(Mutex::new(Preferences::default())),
        }
    }

    pub fn snapshot(&self) -> Preferences {
        self.lock().clone()
    }

    /// Apply a change and persist the result
    pub fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut prefs = self.lock();
        change(&mut prefs);
        self.persist(&prefs)
    }

    pub fn render_surface(&self) -> RenderSurface {
        RenderSurface::from_pref(self.lock().preferred_view.as_deref())
    }

    pub fn set_render_surface(&self, surface: RenderSurface) -> Result<()> {
        self.update(|p| p.preferred_view = Some(surface.as_str().to_string()))
    }

    pub fn theme(&self) -> Option<String> {
        self.lock().theme.clone()
    }

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.update(|p| p.theme = Some(theme.to_string()))
    }

    fn lock(&self) -> MutexGuard<'_, Preferences> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, prefs: &Preferences) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(prefs)?)?;
        Ok(())
    }
}

impl PendingStore for PreferenceStore {
    fn load_pending(&self) -> Option<PendingReference> {
        self.lock().pending_compose_file.clone()
    }

    fn save_pending(&mut self, reference: &PendingReference) -> Result<()> {
        let reference = reference.clone();
        self.update(move |p| p.pending_compose_file = Some(reference))
    }

    fn clear_pending(&mut self) -> Result<()> {
        self.update(|p| p.pending_compose_file = None)
    }
}
