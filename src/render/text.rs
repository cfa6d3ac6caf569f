use vello_cpu::peniko::FontData;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{GlassError, GlassResult};
use crate::geometry::measure::{FontWeight, TextMeasure};

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Font faces loaded once per process.
///
/// Cloning shares the underlying blobs; shaping and drawing never copy the font bytes.
#[derive(Clone, Debug)]
pub struct FontFaces {
    pub regular: FontData,
    /// Falls back to `regular` when absent.
    pub bold: Option<FontData>,
}

impl FontFaces {
    /// Single-face font files.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Self {
        Self {
            regular: FontData::new(regular.into(), 0),
            bold: bold.map(|b| FontData::new(b.into(), 0)),
        }
    }
}

struct Face {
    family: String,
    data: FontData,
}

/// Parley shaper holding one regular and one bold face.
///
/// Built once per render; the shared blobs are registered into a fresh font collection.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    regular: Face,
    bold: Face,
}

impl TextShaper {
    pub fn new(faces: &FontFaces) -> GlassResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let regular = register(&mut font_ctx, &faces.regular)?;
        let bold = match &faces.bold {
            Some(font) => register(&mut font_ctx, font)?,
            None => Face {
                family: regular.family.clone(),
                data: regular.data.clone(),
            },
        };
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular,
            bold,
        })
    }

    fn face(&self, weight: FontWeight) -> &Face {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        weight: FontWeight,
        brush: TextBrush,
    ) -> parley::Layout<TextBrush> {
        let family = match weight {
            FontWeight::Regular => self.regular.family.clone(),
            FontWeight::Bold => self.bold.family.clone(),
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if weight == FontWeight::Bold {
            // Regular and bold files often share one family name.
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Draw `text` on a single line with its baseline starting at `origin`.
    pub(crate) fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        weight: FontWeight,
        color: Rgba8,
        origin: Point,
    ) {
        if text.is_empty() {
            return;
        }
        let layout = self.layout_line(text, size_px, weight, color.into());
        let font = self.face(weight).data.clone();

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        // Single-line layouts; anything parley wraps anyway is dropped.
        let Some(line) = layout.lines().next() else {
            return;
        };
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                origin.x,
                origin.y - f64::from(run.baseline()),
            )));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

impl TextMeasure for TextShaper {
    fn measure_width(&mut self, text: &str, size_px: f32, weight: FontWeight) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let layout = self.layout_line(text, size_px, weight, TextBrush::default());
        layout
            .lines()
            .map(|l| l.metrics().advance)
            .fold(0.0, f32::max)
    }
}

fn register(font_ctx: &mut parley::FontContext, font: &FontData) -> GlassResult<Face> {
    let families = font_ctx.collection.register_fonts(font.data.clone(), None);
    let family_id = families
        .iter()
        .find(|(_, infos)| infos.iter().any(|info| info.index() == font.index))
        .or_else(|| families.first())
        .map(|(id, _)| *id)
        .ok_or_else(|| GlassError::render("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| GlassError::render("registered font family has no name"))?
        .to_string();
    Ok(Face {
        family,
        data: font.clone(),
    })
}
