use crate::geometry::measure::{FontWeight, TextMeasure};

/// Greedy word wrap of `text` against `max_width` pixels.
///
/// Explicit newlines start a new line (blank lines are kept). Words wider than `max_width`
/// on their own are split between characters. Whitespace-only input yields no lines.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    size_px: f32,
    weight: FontWeight,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.trim_end().split('\n') {
        let mut current = String::new();
        let mut any_word = false;
        for word in paragraph.split_whitespace() {
            any_word = true;
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure.measure_width(&candidate, size_px, weight) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measure.measure_width(word, size_px, weight) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, max_width, size_px, weight, measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if any_word {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }
    lines
}

fn split_word(
    word: &str,
    max_width: f32,
    size_px: f32,
    weight: FontWeight,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if piece.chars().count() > 1 && measure.measure_width(&piece, size_px, weight) > max_width
        {
            piece.pop();
            out.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        out.push(piece);
    }
    out
}

/// Truncate `text` with a trailing ellipsis so it fits `max_width`.
pub fn ellipsize(
    text: &str,
    max_width: f32,
    size_px: f32,
    weight: FontWeight,
    measure: &mut dyn TextMeasure,
) -> String {
    if measure.measure_width(text, size_px, weight) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}…", chars.iter().collect::<String>().trim_end());
        if measure.measure_width(&candidate, size_px, weight) <= max_width {
            return candidate;
        }
    }
    "…".to_string()
}

/// Width of the widest line.
pub fn widest_line(
    lines: &[String],
    size_px: f32,
    weight: FontWeight,
    measure: &mut dyn TextMeasure,
) -> f32 {
    lines
        .iter()
        .map(|l| measure.measure_width(l, size_px, weight))
        .fold(0.0, f32::max)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/wrap.rs"]
mod tests;
