// Code spans: backtick runs whose closer has exactly the opener's length

use super::{InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;

const PRIORITY: u8 = 7;

pub fn def() -> InlineDef {
    InlineDef {
        name: "CodeSpan",
        priority: PRIORITY,
        parse_children: false,
        replaces: None,
        find,
    }
}

fn find(text: &str, _ctx: &InlineContext) -> Vec<InlineMatch> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            match code_span_at(text, i) {
                Some((end, (inner_start, inner_end))) => {
                    out.push(InlineMatch {
                        priority: PRIORITY,
                        parse_children: false,
                        start: i,
                        end,
                        inner_start,
                        inner_end,
                        proto: Inline::CodeSpan {
                            text: cook(&text[inner_start..inner_end]),
                        },
                    });
                    i = end;
                }
                None => {
                    // skip the whole unmatched run
                    while i < bytes.len() && bytes[i] == b'`' {
                        i += 1;
                    }
                }
            }
        } else {
            i += 1;
        }
    }
    out
}

/// Match a code span whose opening run starts at `start`. Returns the end
/// offset and the content span, or `None` when no closing run of exactly
/// the same length follows.
pub(crate) fn code_span_at(text: &str, start: usize) -> Option<(usize, (usize, usize))> {
    let bytes = text.as_bytes();
    let mut open_end = start;
    while open_end < bytes.len() && bytes[open_end] == b'`' {
        open_end += 1;
    }
    let run = open_end - start;
    let mut i = open_end;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b'`' {
                j += 1;
            }
            if j - i == run {
                return Some((j, (open_end, i)));
            }
            i = j;
        } else {
            i += 1;
        }
    }
    None
}

/// Line endings become spaces; one leading and trailing space is stripped
/// when the content is not all whitespace.
fn cook(content: &str) -> String {
    let content = content.replace('\n', " ");
    if content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && content.chars().any(|c| c != ' ')
    {
        content[1..content.len() - 1].to_string()
    } else {
        content
    }
}
