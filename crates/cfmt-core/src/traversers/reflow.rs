//! Block comment word-wrapping.
//!
//! A multi-line `/* ... */` comment is taken apart into paragraphs, its words are re-packed to
//! the configured line length by [`TextReflower`], and the comment is rebuilt with a uniform
//! line prefix. Comments that already have the wanted shape produce no edits.

use crate::position::{Position, Range};
use crate::predicates::{is_horizontal_space, leading_range, text_width};
use crate::slice::DocumentSlice;
use crate::symbols::Kind;
use crate::traverser::{TraverseContext, Traverser};
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

static LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\*?[ \t]?").expect("valid prefix regex"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\.\s").expect("valid list item regex"));

/// Greedy word packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextReflower {
    target: usize,
    tab_width: usize,
}

impl TextReflower {
    /// A reflower that fills lines up to `target` display columns.
    pub fn new(target: usize, tab_width: usize) -> Self {
        Self { target, tab_width }
    }

    /// The target line length.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Pack `words` into lines.
    ///
    /// The first line starts at display column `first_column`, every later line at
    /// `rest_column`. A word moves to the next line when it would end past the target. A line
    /// always holds at least one word, so a word longer than the target overflows alone.
    pub fn fill<'w>(&self, words: &[&'w str], first_column: usize, rest_column: usize) -> Vec<Vec<&'w str>> {
        let mut lines: Vec<Vec<&'w str>> = Vec::new();
        let mut current: Vec<&'w str> = Vec::new();
        let mut column = first_column;

        for &word in words {
            let width = text_width(word, self.tab_width);
            if !current.is_empty() && column + 1 + width > self.target {
                lines.push(std::mem::take(&mut current));
                column = rest_column;
            }
            if !current.is_empty() {
                column += 1;
            }
            column += width;
            current.push(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// A run of words rebuilt as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Paragraph(Vec<String>),
    /// A numbered list item; the first word is the `N.` marker.
    ListItem(Vec<String>),
}

impl Block {
    fn words(&self) -> &[String] {
        match self {
            Self::Paragraph(words) | Self::ListItem(words) => words,
        }
    }

    fn words_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Paragraph(words) | Self::ListItem(words) => words,
        }
    }
}

/// The decomposed body of a block comment.
#[derive(Debug)]
struct CommentBody {
    opener: &'static str,
    starred: bool,
    /// Paragraph groups; a blank separator line goes between consecutive groups.
    groups: Vec<Vec<Block>>,
    first_has_text: bool,
    last_has_text: bool,
}

/// Re-wraps multi-line block comments to the configured width.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentReflowTraverser;

impl CommentReflowTraverser {
    /// A new pass.
    pub fn new() -> Self {
        Self
    }
}

impl Traverser for CommentReflowTraverser {
    fn name(&self) -> &'static str {
        "comment-reflow"
    }

    fn visit_leaf<'t>(&mut self, node: Node<'t>, ctx: &mut TraverseContext<'t>) {
        let comments = &ctx.style().comments;
        if !comments.reflow || !ctx.is(node, Kind::Comment) {
            return;
        }
        let range = Range::of(node);
        let text = ctx.text(range);
        if !range.is_multiline()
            || !text.starts_with("/*")
            || !text.ends_with("*/")
            || text.len() < 4
            || text.contains('\r')
            || ctx.is_unformattable(range)
        {
            return;
        }

        let slice = ctx.document().slice(range);
        let Some(body) = decompose(&slice, text) else {
            return;
        };

        let indent = indentation_of(ctx, range.start);
        let reflower = TextReflower::new(comments.target_line_length, ctx.style().indentation.tab_width);
        let lines = rebuild(&body, &indent, &reflower);
        let rebuilt = lines.join("\n");
        if rebuilt == text {
            return;
        }

        log::trace!("reflow comment at {}", range.start);
        if !ctx.delete(range) {
            return;
        }
        let count = lines.len();
        for (index, line) in lines.into_iter().enumerate().rev() {
            let piece = if index + 1 < count {
                format!("{line}\n")
            } else {
                line
            };
            ctx.insert(range.start, piece);
        }
    }
}

/// The whitespace that continuation lines of a comment starting at `start` are indented with.
fn indentation_of(ctx: &TraverseContext<'_>, start: Position) -> String {
    let leading = ctx.text(leading_range(ctx, start));
    if is_horizontal_space(leading) {
        leading.to_string()
    } else {
        " ".repeat(text_width(leading, ctx.style().indentation.tab_width))
    }
}

fn decompose(slice: &DocumentSlice<'_>, text: &str) -> Option<CommentBody> {
    let opener = if text.starts_with("/**") && !text.starts_with("/**/") {
        "/**"
    } else if text.starts_with("/*!") {
        "/*!"
    } else {
        "/*"
    };

    let lines = slice.lines();
    let (first, rest) = lines.split_first()?;
    let (last, interior) = rest.split_last()?;
    let first = first.slice_bytes(opener.len(), first.len());
    let last = last.slice_bytes(0, last.len() - 2);

    let interior_text: Vec<String> = interior.iter().map(|l| l.to_string()).collect();
    let last_text = last.to_string();
    let candidate = interior_text
        .iter()
        .find(|line| !line.trim().is_empty())
        .unwrap_or(&last_text);
    let candidate = LINE_PREFIX
        .find(candidate)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let bare = candidate.trim_end().to_string();
    let unstarred: String = candidate.chars().take_while(|c| *c == ' ' || *c == '\t').collect();

    let interior_matches = interior_text
        .iter()
        .all(|line| line.trim().is_empty() || line.starts_with(&candidate) || *line == bare);
    let last_matches = last_text.trim().is_empty()
        || last_text.starts_with(&candidate)
        || last_text == bare
        || last_text.starts_with(&unstarred);

    let uniform = interior_matches && last_matches;
    let (prefix, starred) = if uniform {
        (candidate.as_str(), candidate.contains('*'))
    } else {
        log::debug!(
            "comment line prefixes disagree with {candidate:?}; falling back to a blank prefix"
        );
        ("", false)
    };

    let strip = |line: &DocumentSlice<'_>, text: &str| -> Vec<String> {
        let skip = if !uniform {
            LINE_PREFIX.find(text).map_or(0, |m| m.end())
        } else if !prefix.is_empty() && text.starts_with(prefix) {
            prefix.len()
        } else if !bare.is_empty() && text == bare {
            text.len()
        } else {
            0
        };
        line.slice_bytes(skip, line.len())
            .words()
            .iter()
            .map(|w| w.to_string())
            .collect()
    };

    let mut contents: Vec<Vec<String>> = Vec::with_capacity(lines.len());
    contents.push(first.words().iter().map(|w| w.to_string()).collect());
    for (line, text) in interior.iter().zip(&interior_text) {
        contents.push(strip(line, text));
    }
    if last_text.trim().is_empty() {
        contents.push(Vec::new());
    } else {
        contents.push(strip(&last, &last_text));
    }
    let first_has_text = contents.first().is_some_and(|words| !words.is_empty());
    let last_has_text = contents.last().is_some_and(|words| !words.is_empty());

    let mut groups: Vec<Vec<Block>> = Vec::new();
    let mut current: Vec<Block> = Vec::new();
    for words in contents {
        let is_item = starts_list_item(&words);
        if words.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            continue;
        }
        match current.last_mut() {
            Some(block) if !is_item => block.words_mut().extend(words),
            _ if is_item => current.push(Block::ListItem(words)),
            _ => current.push(Block::Paragraph(words)),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    Some(CommentBody {
        opener,
        starred,
        groups,
        first_has_text,
        last_has_text,
    })
}

fn starts_list_item(words: &[String]) -> bool {
    words
        .first()
        .is_some_and(|word| LIST_ITEM.is_match(&format!("{word} ")))
}

fn rebuild(body: &CommentBody, indent: &str, reflower: &TextReflower) -> Vec<String> {
    let tab_width = reflower.tab_width;
    let indent_width = text_width(indent, tab_width);
    let prefix = if body.starred {
        format!("{indent} * ")
    } else {
        format!("{indent}   ")
    };
    let separator = if body.starred {
        format!("{indent} *")
    } else {
        String::new()
    };
    let prefix_width = indent_width + 3;

    let mut lines: Vec<String> = Vec::new();
    let mut on_opener = body.first_has_text;
    if !on_opener {
        lines.push(body.opener.to_string());
    }

    for (group_index, group) in body.groups.iter().enumerate() {
        if group_index > 0 {
            lines.push(separator.clone());
        }
        for block in group {
            let words: Vec<&str> = block.words().iter().map(String::as_str).collect();
            let (lead, hang) = match block {
                Block::Paragraph(_) => (0, 0),
                Block::ListItem(words) => {
                    let marker = words.first().map_or(0, |m| text_width(m, tab_width));
                    (2, 2 + marker + 1)
                }
            };
            let (first_column, head) = if on_opener {
                let head = format!("{} {}", body.opener, " ".repeat(lead));
                (indent_width + text_width(&head, tab_width), head)
            } else {
                (prefix_width + lead, format!("{prefix}{}", " ".repeat(lead)))
            };
            let filled = reflower.fill(&words, first_column, prefix_width + hang);
            for (index, line_words) in filled.iter().enumerate() {
                let start = if index == 0 {
                    head.clone()
                } else {
                    format!("{prefix}{}", " ".repeat(hang))
                };
                lines.push(format!("{start}{}", line_words.join(" ")));
            }
            on_opener = false;
        }
    }

    let fits = lines.last().is_some_and(|last| {
        let width = if lines.len() == 1 {
            indent_width + text_width(last, tab_width)
        } else {
            text_width(last, tab_width)
        };
        width + 3 <= reflower.target
    });
    match lines.last_mut() {
        Some(last) if body.last_has_text && fits && !body.groups.is_empty() => last.push_str(" */"),
        _ => lines.push(format!("{indent} */")),
    }
    lines
}
