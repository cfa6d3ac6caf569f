#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Measures the advance width of a single run of text.
///
/// Implementations may cache and therefore take `&mut self`.
pub trait TextMeasure {
    /// Width in pixels of `text` set at `size_px` with no line breaking.
    fn measure_width(&mut self, text: &str, size_px: f32, weight: FontWeight) -> f32;
}

/// Fixed per-character advance. Used when no font could be loaded, and in tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvanceMeasure {
    /// Advance of one character as a fraction of the font size.
    pub regular_em: f32,
    pub bold_em: f32,
}

impl Default for FixedAdvanceMeasure {
    fn default() -> Self {
        Self {
            regular_em: 0.55,
            bold_em: 0.6,
        }
    }
}

impl TextMeasure for FixedAdvanceMeasure {
    fn measure_width(&mut self, text: &str, size_px: f32, weight: FontWeight) -> f32 {
        let em = match weight {
            FontWeight::Regular => self.regular_em,
            FontWeight::Bold => self.bold_em,
        };
        text.chars().count() as f32 * em * size_px
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure_width(&mut self, text: &str, size_px: f32, weight: FontWeight) -> f32 {
        (**self).measure_width(text, size_px, weight)
    }
}
