use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::GlassResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Video,
    Still,
}

/// A finished output on local disk plus its metadata.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OutputArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub byte_size: u64,
    pub duration_seconds: Option<f64>,
    pub width: u32,
    pub height: u32,
}

/// Receives finished artifacts. Public URLs are the store's concern, not the pipeline's.
pub trait MediaStore: Send + Sync {
    /// Take ownership of the file at `artifact.path` and return where it now lives.
    fn publish(&self, artifact: OutputArtifact) -> GlassResult<OutputArtifact>;
}

/// Keeps artifacts on local disk under `root`.
#[derive(Clone, Debug)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for LocalMediaStore {
    fn publish(&self, mut artifact: OutputArtifact) -> GlassResult<OutputArtifact> {
        if artifact.path.parent() == Some(self.root.as_path()) {
            return Ok(artifact);
        }
        let Some(name) = artifact.path.file_name() else {
            return Ok(artifact);
        };
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create media store '{}'", self.root.display()))?;
        let dest = self.root.join(name);
        if std::fs::rename(&artifact.path, &dest).is_err() {
            // Cross-device moves need a copy.
            std::fs::copy(&artifact.path, &dest)
                .with_context(|| format!("copy '{}' into media store", artifact.path.display()))?;
            std::fs::remove_file(&artifact.path).ok();
        }
        tracing::debug!(from = %artifact.path.display(), to = %dest.display(), "artifact published");
        artifact.path = dest;
        Ok(artifact)
    }
}

/// Total size of regular files directly or transitively under `dir`. Missing dirs count as 0.
pub fn directory_bytes(dir: &Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .map(|e| match e.metadata() {
            Ok(m) if m.is_dir() => directory_bytes(&e.path()),
            Ok(m) => m.len(),
            Err(_) => 0,
        })
        .sum()
}
