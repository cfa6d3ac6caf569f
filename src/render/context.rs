use std::path::{Path, PathBuf};

use vello_cpu::peniko::FontData;

use crate::foundation::config::PipelineConfig;
use crate::foundation::core::BezPath;
use crate::foundation::error::{GlassError, GlassResult};
use crate::geometry::measure::{FixedAdvanceMeasure, TextMeasure};
use crate::geometry::shapes::svg_path;
use crate::render::text::{FontFaces, TextShaper};

// 24x24 icon outlines, absolute commands only.
const REPLY_ICON: &str = "M4 4 L20 4 L20 16 L9 16 L5 20 L5 16 L4 16 Z";
const REPOST_ICON: &str = "M6 3 L10 7 L7 7 L7 15 L12 15 L12 18 L4 18 L4 7 L2 7 Z \
                           M18 21 L14 17 L17 17 L17 9 L12 9 L12 6 L20 6 L20 17 L22 17 Z";
const LIKE_ICON: &str = "M12 21 L4 13 C1 10 2 5 6 4 C9 3 11 5 12 7 \
                         C13 5 15 3 18 4 C22 5 23 10 20 13 Z";
const VIEWS_ICON: &str = "M4 20 L4 12 L7 12 L7 20 Z M10 20 L10 6 L13 6 L13 20 Z \
                          M16 20 L16 9 L19 9 L19 20 Z";
const CHECK_ICON: &str = "M7 12 L10.5 15.5 L17 9";

/// Parsed stat and badge icons in a 24x24 box.
#[derive(Clone, Debug)]
pub struct IconSet {
    /// Reply, repost, like, views, in stat order.
    pub stats: [BezPath; 4],
    /// Open check mark, stroked on the verified badge.
    pub check: BezPath,
}

impl IconSet {
    pub const VIEWBOX: f64 = 24.0;

    fn builtin() -> Self {
        Self {
            stats: [REPLY_ICON, REPOST_ICON, LIKE_ICON, VIEWS_ICON].map(svg_path),
            check: svg_path(CHECK_ICON),
        }
    }
}

/// Process-wide rendering resources, built once and shared by reference.
#[derive(Clone, Debug)]
pub struct RenderingContext {
    fonts: Option<FontFaces>,
    icons: IconSet,
}

impl RenderingContext {
    /// Load fonts and parse the icon set.
    ///
    /// Faces come from `config.font_dirs`, then from installed system fonts when
    /// `config.system_fonts` is set. Finding no face at all is an error unless
    /// `config.require_fonts` is off, in which case text is measured with a fixed advance and
    /// not drawn.
    pub fn new(config: &PipelineConfig) -> GlassResult<Self> {
        let fonts = load_font_faces(&config.font_dirs).or_else(|| {
            if config.system_fonts {
                load_system_font_faces()
            } else {
                None
            }
        });
        if fonts.is_none() {
            if config.require_fonts {
                return Err(GlassError::validation(format!(
                    "no usable font faces in {:?}{}",
                    config.font_dirs,
                    if config.system_fonts { " or among system fonts" } else { "" }
                )));
            }
            tracing::warn!(
                dirs = ?config.font_dirs,
                "no usable fonts found; overlay text will not be drawn"
            );
        }
        Ok(Self::with_fonts(fonts))
    }

    pub fn with_fonts(fonts: Option<FontFaces>) -> Self {
        Self {
            fonts,
            icons: IconSet::builtin(),
        }
    }

    pub fn fonts(&self) -> Option<&FontFaces> {
        self.fonts.as_ref()
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    /// A fresh shaper for one render, or `None` without fonts.
    pub fn shaper(&self) -> Option<TextShaper> {
        let faces = self.fonts.as_ref()?;
        match TextShaper::new(faces) {
            Ok(shaper) => Some(shaper),
            Err(err) => {
                tracing::warn!(error = %err, "font registration failed");
                None
            }
        }
    }

    /// Measurer used for layout: the font shaper when available.
    pub fn measurer(&self) -> Box<dyn TextMeasure> {
        match self.shaper() {
            Some(shaper) => Box::new(shaper),
            None => Box::new(FixedAdvanceMeasure::default()),
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

/// Pick a regular and a bold face from the font directories.
///
/// Files with "bold" in the name are bold candidates; among the rest, names containing
/// "regular" are preferred. Directories are searched in order and files sorted by name.
pub(crate) fn load_font_faces(dirs: &[PathBuf]) -> Option<FontFaces> {
    let mut files: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        let mut found: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| is_font_file(p))
            .collect();
        found.sort();
        files.extend(found);
    }

    fn lower_name(p: &Path) -> String {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
    fn read(p: &Path) -> Option<FontData> {
        match std::fs::read(p) {
            Ok(bytes) => Some(FontData::new(bytes.into(), 0)),
            Err(err) => {
                tracing::warn!(path = %p.display(), error = %err, "failed to read font");
                None
            }
        }
    }

    let (bold, regular): (Vec<&PathBuf>, Vec<&PathBuf>) =
        files.iter().partition(|p| lower_name(p).contains("bold"));
    let regular_path = regular
        .iter()
        .find(|p| lower_name(p).contains("regular"))
        .or_else(|| regular.first())
        .or_else(|| bold.first())?;

    let regular = read(regular_path)?;
    let bold = bold
        .iter()
        .find(|p| *p != regular_path)
        .and_then(|p| read(p));
    tracing::debug!(regular = %regular_path.display(), has_bold = bold.is_some(), "loaded fonts");
    Some(FontFaces { regular, bold })
}

/// Regular and bold sans-serif faces from the installed system fonts.
pub(crate) fn load_system_font_faces() -> Option<FontFaces> {
    use usvg::fontdb::{Database, Family, Query, Weight};

    let mut db = Database::new();
    db.load_system_fonts();
    let lookup = |weight: Weight| {
        [Family::SansSerif, Family::Serif, Family::Monospace]
            .into_iter()
            .find_map(|family| {
                db.query(&Query {
                    families: &[family],
                    weight,
                    ..Query::default()
                })
            })
    };

    let regular_id = lookup(Weight::NORMAL).or_else(|| db.faces().next().map(|f| f.id))?;
    let read = |id| {
        db.with_face_data(id, |data, index| FontData::new(data.to_vec().into(), index))
    };
    let regular = read(regular_id)?;
    let bold = lookup(Weight::BOLD)
        .filter(|id| *id != regular_id)
        .and_then(read);
    tracing::debug!(faces = db.len(), has_bold = bold.is_some(), "loaded system fonts");
    Some(FontFaces { regular, bold })
}
