// Indented code blocks: four columns of indentation beyond the container

use super::{BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::shared::expand_tabs;
use crate::parser::Parser;
use crate::source::Source;

pub fn def() -> BlockDef {
    BlockDef {
        name: "CodeBlock",
        priority: 4,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let line = source.next_line()?;
    if line.trim().is_empty() {
        return None;
    }
    let expanded = expand_tabs(&line);
    let indent = expanded.len() - expanded.trim_start().len();
    (indent >= 4).then_some(ParseInfo::None)
}

pub(crate) fn parse(parser: &Parser, source: &mut Source, _info: ParseInfo) -> Block {
    let first = source.next_line_consume().expect("match precedes parse");
    let mut lines = vec![strip_indent(&first)];
    source.anchor();
    while !source.exhausted() {
        if matches(parser, source).is_some() {
            let line = source.next_line_consume().expect("line just matched");
            lines.push(strip_indent(&line));
            source.anchor();
        } else if source.next_line().is_some_and(|l| l.trim().is_empty()) {
            let blank = source.next_line_consume().expect("blank line present");
            lines.push(blank);
        } else {
            // interior blanks stay, trailing ones go back to the container
            source.reset();
            break;
        }
    }
    let mut text = lines.concat();
    text.truncate(text.trim_end_matches('\n').len());
    text.push('\n');
    Block::CodeBlock { text }
}

/// Remove four columns of leading whitespace; a tab crossing the boundary
/// pays out its leftover columns as spaces.
fn strip_indent(line: &str) -> String {
    let mut col = 0;
    for (i, c) in line.char_indices() {
        match c {
            ' ' => col += 1,
            '\t' => col += 4 - col % 4,
            _ => return line[i..].to_string(),
        }
        if col >= 4 {
            let mut out = String::with_capacity(line.len());
            out.extend(std::iter::repeat(' ').take(col - 4));
            out.push_str(&line[i + 1..]);
            return out;
        }
    }
    line.to_string()
}
