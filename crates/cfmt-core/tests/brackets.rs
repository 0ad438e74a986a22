use cfmt_core::{Formatter, Style};
use cfmt_core_style::{
    BlockStyle, BraceExistence, BracePlacement, Construct, IndentationMode, NewlinePlacement,
};
use pretty_assertions::assert_eq;

fn format(style: Style, text: &str) -> String {
    Formatter::new(style).format(text).unwrap()
}

fn body_style(existence: BraceExistence, placement: BracePlacement) -> BlockStyle {
    BlockStyle {
        indentation: IndentationMode::BodyIndented,
        existence,
        placement,
    }
}

#[test]
fn test_require_wraps_single_line_body() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Require, BracePlacement::default()),
    );
    let input = "void f() {\n    if (x) g();\n}\n";
    assert_eq!(format(style, input), "void f() {\n    if (x) { g(); }\n}\n");
}

#[test]
fn test_require_with_attached_placement() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Require, BracePlacement::attached()),
    );
    let input = "void f() {\n    if (x)\n        g();\n    h();\n}\n";
    let expected = "void f() {\n    if (x) {\n        g();\n    }\n    h();\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_require_is_idempotent() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Require, BracePlacement::attached()),
    );
    let input = "void f() {\n    if (x)\n        g();\n    h();\n}\n";
    let once = format(style.clone(), input);
    assert_eq!(format(style, &once), once);
}

#[test]
fn test_remove_unwraps_single_statement() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Remove, BracePlacement::default()),
    );
    let input = "void f() {\n    if (x) {\n        g();\n    }\n    h();\n}\n";
    let expected = "void f() {\n    if (x)\n        g();\n    h();\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_remove_on_if_and_else() {
    let style = Style::default()
        .with_block(
            Construct::If,
            body_style(BraceExistence::Remove, BracePlacement::default()),
        )
        .with_block(
            Construct::Else,
            body_style(BraceExistence::Remove, BracePlacement::default()),
        );
    let input = "void f() {\n    if (x) { g(); } else { h(); }\n}\n";
    assert_eq!(format(style, input), "void f() {\n    if (x) g(); else h();\n}\n");
}

#[test]
fn test_remove_keeps_braces_that_bind_else() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Remove, BracePlacement::default()),
    );
    // Dropping the outer braces would hand the else to the inner if.
    let input = "void f() {\n    if (a) {\n        if (b) g();\n    } else {\n        h();\n    }\n}\n";
    assert_eq!(format(style, input), input);
}

#[test]
fn test_remove_keeps_multi_statement_bodies() {
    let style = Style::default().with_block(
        Construct::While,
        body_style(BraceExistence::Remove, BracePlacement::default()),
    );
    let input = "void f() {\n    while (x) {\n        g();\n        h();\n    }\n}\n";
    assert_eq!(format(style, input), input);
}

#[test]
fn test_ignore_changes_nothing() {
    let input = "void f() {\n    if (x) { g(); }\n    while (y)\n        h();\n}\n";
    assert_eq!(format(Style::default(), input), input);
}

#[test]
fn test_require_wraps_case_statements() {
    let placement = BracePlacement {
        opening: NewlinePlacement::Ignore,
        closing: NewlinePlacement::Before,
    };
    let style = Style::default()
        .with_block(Construct::Case, body_style(BraceExistence::Require, placement));
    let input = "void f(int x) {\n    switch (x) {\n    case 1:\n        g();\n        break;\n    }\n}\n";
    let expected =
        "void f(int x) {\n    switch (x) {\n    case 1: {\n        g();\n        break;\n    }\n    }\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_broken_placement_moves_existing_braces_to_own_lines() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Require, BracePlacement::broken()),
    );
    let input = "void f() {\n    if (x) {\n        g();\n    }\n}\n";
    let expected = "void f() {\n    if (x)\n    {\n        g();\n    }\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_nested_removal_keeps_braces_that_bind_else() {
    let style = Style::default()
        .with_block(
            Construct::If,
            body_style(BraceExistence::Remove, BracePlacement::default()),
        )
        .with_block(
            Construct::While,
            body_style(BraceExistence::Remove, BracePlacement::default()),
        );
    // The loop loses its braces in the same pass, which would leave `if (c)` open in front of
    // the else.
    let input = "void f() {\n    if (a) {\n        while (x) {\n            if (c) g();\n        }\n    } else {\n        h();\n    }\n}\n";
    let expected = "void f() {\n    if (a) {\n        while (x)\n            if (c) g();\n    } else {\n        h();\n    }\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_remove_keeps_single_declaration_body() {
    let style = Style::default().with_block(
        Construct::If,
        body_style(BraceExistence::Remove, BracePlacement::default()),
    );
    let input = "void f() {\n    if (x) {\n        int y = 1;\n    }\n}\n";
    assert_eq!(format(style, input), input);
}

#[test]
fn test_remove_on_braced_case_body() {
    let style = Style::default().with_block(
        Construct::Case,
        body_style(BraceExistence::Remove, BracePlacement::default()),
    );
    let input = "void f(int x) {\n    switch (x) {\n    case 1: { g(); }\n    }\n}\n";
    let expected = "void f(int x) {\n    switch (x) {\n    case 1: g();\n    }\n}\n";
    assert_eq!(format(style, input), expected);
}

#[test]
fn test_switch_body_placement() {
    let style = Style::default().with_block(
        Construct::Switch,
        BlockStyle {
            indentation: IndentationMode::None,
            existence: BraceExistence::Require,
            placement: BracePlacement::broken(),
        },
    );
    let input = "void f(int x) {\n    switch (x) {\n    case 1:\n        g();\n    }\n}\n";
    let expected = "void f(int x) {\n    switch (x)\n    {\n    case 1:\n        g();\n    }\n}\n";
    let once = format(style.clone(), input);
    assert_eq!(once, expected);
    assert_eq!(format(style, &once), once);
}
