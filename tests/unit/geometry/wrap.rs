use super::*;
use crate::geometry::measure::FixedAdvanceMeasure;

// 10 px per character at size 10 with a 1.0 em advance.
fn unit_measure() -> FixedAdvanceMeasure {
    FixedAdvanceMeasure {
        regular_em: 1.0,
        bold_em: 1.0,
    }
}

#[test]
fn greedy_fill_breaks_between_words() {
    let mut m = unit_measure();
    let lines = wrap_text("aaa bbb ccc", 70.0, 10.0, FontWeight::Regular, &mut m);
    assert_eq!(lines, vec!["aaa bbb", "ccc"]);
}

#[test]
fn every_line_fits_when_words_fit() {
    let mut m = unit_measure();
    let text = "the quick brown fox jumps over the lazy dog again and again";
    let lines = wrap_text(text, 120.0, 10.0, FontWeight::Regular, &mut m);
    assert!(lines.len() > 1);
    for l in &lines {
        assert!(m.measure_width(l, 10.0, FontWeight::Regular) <= 120.0, "{l}");
    }
    assert_eq!(lines.join(" "), text);
}

#[test]
fn overlong_words_are_split() {
    let mut m = unit_measure();
    let lines = wrap_text("abcdefghij xy", 40.0, 10.0, FontWeight::Regular, &mut m);
    assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
}

#[test]
fn newlines_are_preserved() {
    let mut m = unit_measure();
    let lines = wrap_text("one\n\ntwo", 200.0, 10.0, FontWeight::Regular, &mut m);
    assert_eq!(lines, vec!["one", "", "two"]);
}

#[test]
fn blank_text_has_no_lines() {
    let mut m = unit_measure();
    assert!(wrap_text("  \n ", 100.0, 10.0, FontWeight::Regular, &mut m).is_empty());
}

#[test]
fn widest_line_reports_max() {
    let mut m = unit_measure();
    let lines = vec!["ab".to_string(), "abcde".to_string()];
    assert_eq!(widest_line(&lines, 10.0, FontWeight::Regular, &mut m), 50.0);
}

#[test]
fn ellipsize_truncates_to_fit() {
    let mut m = unit_measure();
    assert_eq!(ellipsize("short", 100.0, 10.0, FontWeight::Bold, &mut m), "short");
    assert_eq!(ellipsize("abcdefgh", 50.0, 10.0, FontWeight::Bold, &mut m), "abcd…");
    assert_eq!(ellipsize("abc", 5.0, 10.0, FontWeight::Bold, &mut m), "…");
}
