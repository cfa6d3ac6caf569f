use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::Context as _;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use rayon::prelude::*;

use crate::classify::classifier::Category;
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{GlassError, GlassResult};

/// Extensions treated as background clips.
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "webm", "m4v"];

/// A discovered (or explicitly supplied) background clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BackgroundAsset {
    /// `None` for explicit overrides.
    pub category: Option<Category>,
    pub path: PathBuf,
    pub byte_size: u64,
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl BackgroundAsset {
    fn from_path(category: Option<Category>, path: PathBuf, byte_size: u64) -> Self {
        Self {
            category,
            path,
            byte_size,
            duration_seconds: None,
            width: None,
            height: None,
        }
    }
}

type CategoryCache = HashMap<Category, Arc<Vec<BackgroundAsset>>>;

/// Lazily scanned per-category clip lists under `root/<category>/`.
///
/// Lists are cached for the process lifetime and rescanned only when empty, except
/// [`Category::Custom`], which is rescanned on every lookup.
pub struct BackgroundCatalog {
    root: PathBuf,
    cache: RwLock<CategoryCache>,
    scan_lock: Mutex<()>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for BackgroundCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundCatalog")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl BackgroundCatalog {
    /// `seed` makes selection deterministic; `None` seeds from the OS.
    pub fn new(root: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
            scan_lock: Mutex::new(()),
            rng: Mutex::new(rng),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.backgrounds_dir, config.rng_seed)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pick a background for `category`.
    ///
    /// An existing `explicit` path is returned unchanged without consulting the cache. A
    /// missing one is logged and ignored. Otherwise a random clip of the category is chosen;
    /// vanished files fall back to other clips of the category, then to the first existing
    /// clip of any category. Categories whose directory cannot be read are skipped.
    pub fn select_background(
        &self,
        category: Category,
        explicit: Option<&Path>,
    ) -> GlassResult<BackgroundAsset> {
        if let Some(path) = explicit {
            match std::fs::metadata(path) {
                Ok(meta) if meta.is_file() => {
                    return Ok(BackgroundAsset::from_path(
                        None,
                        path.to_path_buf(),
                        meta.len(),
                    ));
                }
                _ => tracing::warn!(
                    path = %path.display(),
                    %category,
                    "explicit background is unreachable, selecting by category"
                ),
            }
        }

        let assets = self.usable_assets(category);
        if !assets.is_empty() {
            let start = self.random_index(assets.len());
            let chosen = (0..assets.len())
                .map(|offset| &assets[(start + offset) % assets.len()])
                .find(|a| a.path.is_file());
            if let Some(asset) = chosen {
                tracing::debug!(%category, path = %asset.path.display(), "selected background");
                return Ok(asset.clone());
            }
            tracing::warn!(%category, "every cached background is missing on disk");
        }

        for other in Category::ALL.into_iter().filter(|c| *c != category) {
            if let Some(asset) = self.usable_assets(other).iter().find(|a| a.path.is_file()) {
                tracing::warn!(
                    requested = %category,
                    fallback = %other,
                    path = %asset.path.display(),
                    "using background from another category"
                );
                return Ok(asset.clone());
            }
        }

        Err(GlassError::no_background(format!(
            "no clips under '{}'",
            self.root.display()
        )))
    }

    /// Like [`Self::assets`], but a category that cannot be scanned counts as empty.
    fn usable_assets(&self, category: Category) -> Arc<Vec<BackgroundAsset>> {
        self.assets(category).unwrap_or_else(|err| {
            tracing::warn!(%category, error = %err, "skipping unreadable background category");
            Arc::default()
        })
    }

    /// Cached clip list for `category`, scanning on first use.
    pub fn assets(&self, category: Category) -> GlassResult<Arc<Vec<BackgroundAsset>>> {
        if category != Category::Custom
            && let Some(list) = self.cached(category)
            && !list.is_empty()
        {
            return Ok(list);
        }

        let _scan = self.scan_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have populated the list while we waited.
        if category != Category::Custom
            && let Some(list) = self.cached(category)
            && !list.is_empty()
        {
            return Ok(list);
        }

        let list = Arc::new(scan_category_dir(&self.root.join(category.as_str()), category)?);
        tracing::debug!(%category, count = list.len(), "scanned background directory");
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, Arc::clone(&list));
        Ok(list)
    }

    /// Scan every classifiable category in parallel. Returns the total clip count.
    pub fn warm(&self) -> GlassResult<usize> {
        let counts = Category::ALL
            .par_iter()
            .filter(|c| **c != Category::Custom)
            .map(|c| self.assets(*c).map(|list| list.len()))
            .collect::<GlassResult<Vec<_>>>()?;
        Ok(counts.into_iter().sum())
    }

    /// Drop the cached list for `category` so the next lookup rescans.
    pub fn invalidate(&self, category: Category) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&category);
    }

    /// Number of cached clips for `category`, or `None` if it was never scanned.
    pub fn cached_len(&self, category: Category) -> Option<usize> {
        self.cached(category).map(|l| l.len())
    }

    fn cached(&self, category: Category) -> Option<Arc<Vec<BackgroundAsset>>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .cloned()
    }

    fn random_index(&self, len: usize) -> usize {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..len)
    }
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)))
}

/// Clips directly inside `dir`, sorted by path. A missing directory is an empty category.
fn scan_category_dir(dir: &Path, category: Category) -> GlassResult<Vec<BackgroundAsset>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !is_video_file(&path) {
            continue;
        }
        // Follows symlinks, unlike `DirEntry::metadata`.
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };
        if meta.is_file() {
            out.push(BackgroundAsset::from_path(Some(category), path, meta.len()));
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/background.rs"]
mod tests;
