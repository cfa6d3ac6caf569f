use std::path::{Path, PathBuf};

/// A temporary file deleted when the guard drops, on success and failure alike.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Guard an unused path `dir/{prefix}-{request_id}-{uuid}.{ext}`. Nothing is created.
    pub fn reserve(dir: &Path, prefix: &str, request_id: &str, ext: &str) -> Self {
        let name = format!(
            "{prefix}-{}-{}.{ext}",
            sanitize_id(request_id),
            uuid::Uuid::new_v4().simple()
        );
        Self {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed temporary artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temporary artifact");
            }
        }
    }
}

/// Output path `dir/{request_id}-{uuid}.{ext}`.
///
/// Unique per call: ids that sanitise alike, or share a truncated prefix, never share a file.
pub fn output_path(dir: &Path, request_id: &str, ext: &str) -> PathBuf {
    dir.join(format!(
        "{}-{}.{ext}",
        sanitize_id(request_id),
        uuid::Uuid::new_v4().simple()
    ))
}

/// Request id reduced to characters safe in file names.
pub fn sanitize_id(request_id: &str) -> String {
    let cleaned: String = request_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(64)
        .collect();
    if cleaned.is_empty() {
        "request".to_string()
    } else {
        cleaned
    }
}
