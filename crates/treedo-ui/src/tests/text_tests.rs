use super::*;
use treedo_render_common::FixedAdvanceMetrics;

// Every character is 10 units wide at size 20 with the default metrics.
fn font() -> Font {
    Font::sized(20.0)
}

fn wrap(text: &str, max_width: f32) -> Vec<String> {
    wrap_text(&FixedAdvanceMetrics::default(), text, &font(), max_width, 3)
}

#[test]
fn short_text_stays_on_one_line() {
    assert_eq!(wrap("buy milk", 100.0), vec!["buy milk"]);
}

#[test]
fn words_are_placed_greedily() {
    assert_eq!(
        wrap("aaa bbb ccc dd", 70.0),
        vec!["aaa bbb", "ccc dd"]
    );
}

#[test]
fn extra_spaces_are_ignored() {
    assert_eq!(wrap("  a   b ", 100.0), vec!["a b"]);
}

#[test]
fn long_words_are_hyphenated() {
    assert_eq!(wrap("abcdefghij", 50.0), vec!["abcd-", "efgh-", "ij"]);
}

#[test]
fn overflow_is_ellipsized_on_the_last_line() {
    let lines = wrap("one two three four five six seven", 80.0);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "one two");
    assert_eq!(lines[1], "three");
    assert_eq!(lines[2], "four...");
}

#[test]
fn ellipsis_shortens_a_full_last_line() {
    let lines = wrap("aaaaaaa bbbbbbb ccccccc ddd", 70.0);
    assert_eq!(lines, vec!["aaaaaaa", "bbbbbbb", "cccc..."]);
}

#[test]
fn empty_text_yields_one_empty_line() {
    assert_eq!(wrap("", 100.0), vec![String::new()]);
}

#[test]
fn every_line_fits() {
    let measurer = FixedAdvanceMetrics::default();
    let lines = wrap_text(
        &measurer,
        "the quick brown fox jumps over the extraordinarily lazy dog",
        &font(),
        120.0,
        5,
    );
    assert!(lines.len() <= 5);
    for line in &lines {
        assert!(measurer.measure_text_width(line, &font()) <= 120.0, "{line}");
    }
}
