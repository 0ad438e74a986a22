use cfmt_core::{Formatter, Style};
use cfmt_core_style::{AlignmentToggle, Justify, TrailingCommentAlignment};
use pretty_assertions::assert_eq;

fn format(style: Style, text: &str) -> String {
    Formatter::new(style).format(text).unwrap()
}

#[test]
fn test_declaration_names_line_up() {
    let mut style = Style::default();
    style.alignment.declarations = AlignmentToggle::consecutive();
    let input = "int a;\ndouble b;\nchar *c;\n\nlong d;\n";

    // The blank line ends the run, so `d` stays where it is.
    let expected = "int    a;\ndouble b;\nchar  *c;\n\nlong d;\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_declaration_runs_across_empty_lines() {
    let mut style = Style::default();
    style.alignment.declarations = AlignmentToggle {
        enabled: true,
        across_comments: false,
        across_empty_lines: true,
    };
    let input = "int a;\ndouble b;\nchar *c;\n\nlong d;\n";
    let expected = "int    a;\ndouble b;\nchar  *c;\n\nlong   d;\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_comment_line_breaks_run() {
    let mut style = Style::default();
    style.alignment.declarations = AlignmentToggle::consecutive();
    let input = "int a;\ndouble b;\n// split\nchar c;\nlong dd;\n";
    let expected = "int    a;\ndouble b;\n// split\nchar c;\nlong dd;\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_assignment_operators_line_up() {
    let mut style = Style::default();
    style.alignment.assignments = AlignmentToggle::consecutive();
    let input = "void f() {\n    a = 1;\n    bb += 2;\n    int ccc = 3;\n}\n";
    let expected = "void f() {\n    a       = 1;\n    bb      += 2;\n    int ccc = 3;\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_bitfield_colons_line_up() {
    let mut style = Style::default();
    style.alignment.bitfields = AlignmentToggle::consecutive();
    let input = "struct S {\n    int a : 1;\n    unsigned int bb : 2;\n};\n";
    let expected = "struct S {\n    int a            : 1;\n    unsigned int bb : 2;\n};\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_initializer_table_left_justified() {
    let mut style = Style::default();
    style.alignment.initializer_lists = AlignmentToggle::consecutive();
    let input = "int t[][3] = {\n    {1, 22, 3},\n    {444, 5, 6},\n};\n";
    let expected = "int t[][3] = {\n    {1,   22, 3},\n    {444, 5,  6},\n};\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_initializer_table_right_justified() {
    let mut style = Style::default();
    style.alignment.initializer_lists = AlignmentToggle::consecutive();
    style.alignment.initializer_list_justify = Justify::Right;
    let input = "int t[][3] = {\n    {1, 22, 3},\n    {444, 5, 6},\n};\n";
    let expected = "int t[][3] = {\n    {  1, 22, 3},\n    {444,  5, 6},\n};\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_alignment_disabled_by_default() {
    let input = "int a;\ndouble b;\n";
    assert_eq!(format(Style::default(), input), input);
}

#[test]
fn test_trailing_comments_align_consecutive() {
    let mut style = Style::default();
    style.alignment.trailing_comments = TrailingCommentAlignment::AlignConsecutive;
    let input = "int a; // one\nint bbb;   // two\nint cc; // three\n\nint d;    // four\n";
    let expected = "int a;   // one\nint bbb; // two\nint cc;  // three\n\nint d;    // four\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_trailing_comments_left_justify() {
    let mut style = Style::default();
    style.alignment.trailing_comments = TrailingCommentAlignment::LeftJustify;
    let input = "int a; // one\nint bbb;   // two\nint cc;\t// three\n\nint d;    // four\n";
    let expected = "int a; // one\nint bbb; // two\nint cc; // three\n\nint d; // four\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_own_line_comments_do_not_move() {
    let mut style = Style::default();
    style.alignment.trailing_comments = TrailingCommentAlignment::LeftJustify;
    let input = "// header\nint a;\n";
    assert_eq!(format(style, input), input);
}
