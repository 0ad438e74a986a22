use cfmt_core::{Formatter, Style};
use cfmt_core_style::{
    AlignmentToggle, BlockStyle, BraceExistence, BracePlacement, Construct, IndentationMode,
    TrailingCommentAlignment,
};
use pretty_assertions::assert_eq;

fn busy_style() -> Style {
    let mut style = Style::default().with_block(
        Construct::If,
        BlockStyle {
            indentation: IndentationMode::BodyIndented,
            existence: BraceExistence::Require,
            placement: BracePlacement::attached(),
        },
    );
    style.alignment.declarations = AlignmentToggle::consecutive();
    style.alignment.trailing_comments = TrailingCommentAlignment::AlignConsecutive;
    style.comments.reflow = true;
    style.comments.target_line_length = 20;
    style
}

const REGION: &str = "// cfmt off\nint a;\ndouble b; // x\nint cc;   // y\n/* one two three four five six\n   seven */\nvoid f() {\n  if (x) g();\n}\n// cfmt on\n";

#[test]
fn test_region_survives_every_pass() {
    let mut formatter = Formatter::new(busy_style());
    assert_eq!(formatter.format(REGION).unwrap(), REGION);
}

#[test]
fn test_code_after_region_is_still_formatted() {
    let input = format!("{REGION}int d;\ndouble e;\n");
    let expected = format!("{REGION}int    d;\ndouble e;\n");
    let mut formatter = Formatter::new(busy_style());
    assert_eq!(formatter.format(&input).unwrap(), expected);
}

#[test]
fn test_brace_edits_inside_region_are_dropped() {
    let input = "void f() {\n// cfmt off\n    if (x) g();\n// cfmt on\n    if (y) h();\n}\n";
    let expected = "void f() {\n// cfmt off\n    if (x) g();\n// cfmt on\n    if (y) {\n        h();\n    }\n}\n";
    let mut formatter = Formatter::new(busy_style());
    assert_eq!(formatter.format(input).unwrap(), expected);
}
