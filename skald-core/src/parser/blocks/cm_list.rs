// Lists and list items. Items are virtual: only `List::parse` creates
// them, matching bullets against the open list's own.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{cm_blank_line, BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::shared::{expand_tabs, partition_by_spaces};
use crate::parser::Parser;
use crate::source::{Source, State, StateKind};

pub(crate) static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A {0,3}(\d{1,9}[.)]|[*+-])\s").unwrap());

pub fn list_def() -> BlockDef {
    BlockDef {
        name: "List",
        priority: 6,
        is_virtual: false,
        replaces: None,
        matches: list_matches,
        parse: list_parse,
    }
}

pub fn list_item_def() -> BlockDef {
    BlockDef {
        name: "ListItem",
        priority: 6,
        is_virtual: true,
        replaces: None,
        matches: |_, _| None,
        parse: |_, _, _| unreachable!("list items are created by their list"),
    }
}

fn list_matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let m = source.expect_re(&BULLET)?;
    let bullet = source.text(m.group(1).expect("bullet group")).to_string();
    let (ordered, start) = if bullet.as_bytes()[0].is_ascii_digit() {
        (true, bullet[..bullet.len() - 1].parse::<u32>().unwrap_or(1))
    } else {
        (false, 1)
    };
    Some(ParseInfo::List {
        bullet,
        ordered,
        start,
    })
}

fn list_parse(parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::List {
        bullet,
        ordered,
        start,
    } = info
    else {
        unreachable!("list parse fed foreign info");
    };
    let mut children: Vec<Block> = Vec::new();
    source.under_state(State::list(bullet.clone(), ordered), |src| loop {
        if let Some(item_info) = item_matches(src) {
            children.push(item_parse(parser, src, item_info));
        } else if cm_blank_line::matches(parser, src).is_some() {
            children.push(cm_blank_line::parse(parser, src, ParseInfo::None));
        } else {
            break;
        }
    });
    pop_trailing_blank(&mut children, source);

    let mut tight = !children
        .iter()
        .any(|c| matches!(c, Block::BlankLine { .. }));
    tight = tight
        && !children.iter().any(|item| {
            item.children()
                .iter()
                .any(|c| matches!(c, Block::BlankLine { .. }))
        });
    if tight {
        for item in children.iter_mut() {
            if let Block::ListItem { children: kids, .. } = item {
                for kid in kids.iter_mut() {
                    if let Block::Paragraph { tight: t, .. } = kid {
                        *t = true;
                    }
                }
            }
        }
    }
    log::debug!(
        "list: {} items, ordered={ordered}, tight={tight}",
        children.len()
    );
    Block::List {
        bullet,
        ordered,
        start,
        tight,
        children,
    }
}

/// `(indent, bullet, mid, tail)` of a bullet line, on the tab-expanded
/// text. `mid` collapses to one space when the content is missing or
/// pushed out to code-block distance.
pub(crate) fn parse_leading(line: &str) -> (usize, String, usize, String) {
    let line = expand_tabs(line.trim_end_matches('\n'));
    let stripped = line.trim_start_matches(' ');
    let indent = line.len() - stripped.len();
    let (bullet, spaces, tail) = partition_by_spaces(stripped);
    let mid = if tail.is_empty() { 1 } else { spaces.len() };
    (indent, bullet.to_string(), mid, tail.to_string())
}

fn item_matches(source: &mut Source) -> Option<ParseInfo> {
    source.expect_re(&BULLET)?;
    let line = source.next_line()?;
    let (indent, bullet, mut mid, tail) = parse_leading(&line);
    let StateKind::List {
        bullet: parent_bullet,
        ordered,
    } = &source.state().kind
    else {
        return None;
    };
    if *ordered {
        if !bullet[..bullet.len() - 1].chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if bullet.chars().last() != parent_bullet.chars().last() {
            return None;
        }
    } else if bullet != *parent_bullet {
        return None;
    }
    if mid > 4 {
        // content that far out is an indented code block; the item keeps
        // one marker space
        mid = 1;
    }
    Some(ParseInfo::ListItem {
        indent,
        bullet,
        mid,
        empty_first: tail.is_empty(),
    })
}

fn item_parse(parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::ListItem {
        indent,
        bullet,
        mid,
        empty_first,
    } = info
    else {
        unreachable!("list item parse fed foreign info");
    };
    let mut children = if empty_first {
        // consume the bare bullet line; the item may start with at most
        // one blank line, and only continues when content follows
        let _ = source.next_line_consume();
        source.under_state(State::list_item_continued(indent, &bullet, mid), |src| {
            match src.next_line() {
                Some(line) if !line.trim().is_empty() => parser.parse_source(src),
                _ => Vec::new(),
            }
        })
    } else {
        source.under_state(State::list_item(indent, &bullet, mid), |src| {
            parser.parse_source(src)
        })
    };
    pop_trailing_blank(&mut children, source);
    Block::ListItem {
        indent,
        bullet,
        mid,
        children,
    }
}

/// Trailing blank lines belong to the enclosing context: drop the node and
/// rewind to where it began.
fn pop_trailing_blank(children: &mut Vec<Block>, source: &mut Source) {
    if matches!(children.last(), Some(Block::BlankLine { .. })) {
        if let Some(Block::BlankLine { anchor }) = children.pop() {
            source.seek(anchor);
        }
    }
}
