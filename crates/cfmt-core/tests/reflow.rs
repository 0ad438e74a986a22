use cfmt_core::{Formatter, Style};
use pretty_assertions::assert_eq;
use unicode_width::UnicodeWidthStr;

fn reflow_style(width: usize) -> Style {
    let mut style = Style::default();
    style.comments.reflow = true;
    style.comments.target_line_length = width;
    style
}

fn format(style: Style, text: &str) -> String {
    Formatter::new(style).format(text).unwrap()
}

#[test]
fn test_reflow_wraps_to_target_width() {
    let input =
        "/* The quick brown fox jumps over\n * the lazy dog and keeps running far away. */\nint x;\n";
    let expected = "/* The quick brown fox\n * jumps over the lazy\n * dog and keeps running\n * far away. */\nint x;\n";
    let output = format(reflow_style(25), input);
    assert_eq!(output, expected);

    for line in output.lines() {
        assert!(line.width() <= 25, "line too long: {line:?}");
    }
}

#[test]
fn test_reflow_is_idempotent() {
    let input =
        "/* The quick brown fox jumps over\n * the lazy dog and keeps running far away. */\nint x;\n";
    let once = format(reflow_style(25), input);
    assert_eq!(format(reflow_style(25), &once), once);
}

#[test]
fn test_overlong_word_gets_its_own_line() {
    let input = "/* short\n * averyveryveryverylongwordthatoverflows end */\nint x;\n";
    let expected = "/* short\n * averyveryveryverylongwordthatoverflows\n * end */\nint x;\n";
    assert_eq!(format(reflow_style(25), input), expected);
}

#[test]
fn test_numbered_list_items_hang() {
    let input = "/*\n * Steps:\n * 1. first thing to do here\n * 2. second\n */\nint x;\n";
    let expected =
        "/*\n * Steps:\n *   1. first thing to do\n *      here\n *   2. second\n */\nint x;\n";
    let output = format(reflow_style(25), input);
    assert_eq!(output, expected);
    assert_eq!(format(reflow_style(25), &output), output);
}

#[test]
fn test_unstarred_comment_keeps_blank_prefix() {
    let input = "/* alpha beta\n   gamma delta epsilon zeta eta theta */\nint x;\n";
    let expected = "/* alpha beta gamma\n   delta epsilon\n   zeta eta theta */\nint x;\n";
    assert_eq!(format(reflow_style(20), input), expected);
}

#[test]
fn test_single_line_comment_is_not_reflowed() {
    let input = "/* a b c d e f g h i j k l m n o p q r s t */\nint x;\n";
    assert_eq!(format(reflow_style(20), input), input);
}

#[test]
fn test_reflow_disabled_by_default() {
    let input = "/* The quick brown fox jumps over\n * the lazy dog. */\nint x;\n";
    assert_eq!(format(Style::default(), input), input);
}

#[test]
fn test_mismatched_prefixes_still_strip_stars() {
    // The second interior line has no ` * `, so the comment falls back to a blank prefix; the
    // star of the first line must not turn into a word.
    let input = "/* intro\n * 10. alpha beta gamma\nodd words\n */\nint x;\n";
    let expected = "/* intro\n     10. alpha beta gamma odd words\n */\nint x;\n";
    assert_eq!(format(reflow_style(40), input), expected);
}
