// Link reference definitions: [label]: destination "title"

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::{Block, LinkRefDef};
use crate::parser::inlines::shared::{
    angle_link_dest, bare_link_dest, cook_dest, cook_title, leading_whitespace, link_title,
};
use crate::parser::shared::{is_paired, normalize_label};
use crate::parser::Parser;
use crate::source::Source;

static LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A {0,3}\[((?:\\\\|\\[\[\]]|[^\[\]])+)\]:").unwrap());

static BLANK_IN_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "LinkRefDef",
        priority: 5,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let m = source.expect_re(&LABEL)?;
    let label = source.text(m.group(1).expect("label group")).to_string();
    if label.trim().is_empty() || label.len() > 999 {
        return None;
    }
    let (dest, title, consumed) = parse_def_tail(source.text_from(m.end))?;
    Some(ParseInfo::LinkRef {
        label,
        dest,
        title,
        end: m.end + consumed,
    })
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::LinkRef {
        label,
        dest,
        title,
        end,
    } = info
    else {
        unreachable!("link reference parse fed foreign info");
    };
    // first definition wins
    source
        .link_ref_defs
        .entry(normalize_label(&label))
        .or_insert(LinkRefDef { dest, title });
    source.seek(end);
    Block::LinkRefDef
}

/// Parse `: <whitespace> dest [<whitespace> title]` up to the end of a
/// line. When a title candidate on the next line turns out invalid, the
/// definition ends at the destination's line instead.
fn parse_def_tail(text: &str) -> Option<(String, Option<String>, usize)> {
    let ws = leading_whitespace(text);
    if ws.newlines > 1 {
        return None;
    }
    let mut i = ws.len;
    let raw_dest = if let Ok((_, d)) = angle_link_dest(&text[i..]) {
        d
    } else {
        let (_, d) = bare_link_dest(&text[i..]).ok()?;
        if d.is_empty() || !is_paired(d, '(', ')') {
            return None;
        }
        d
    };
    let dest = cook_dest(raw_dest);
    i += raw_dest.len();

    let ws2 = leading_whitespace(&text[i..]);
    if ws2.len > 0 && ws2.newlines <= 1 {
        let title_start = i + ws2.len;
        if let Ok((_, raw_title)) = link_title(&text[title_start..]) {
            let inner = &raw_title[1..raw_title.len() - 1];
            if !BLANK_IN_TITLE.is_match(inner) {
                if let Some(end) = at_line_end(text, title_start + raw_title.len()) {
                    return Some((dest, Some(cook_title(raw_title)), end));
                }
            }
        }
        // no valid title: when it sat on the next line, keep the
        // definition and end it at the destination's line
        if ws2.newlines >= 1 {
            if let Some(end) = at_line_end(text, i) {
                return Some((dest, None, end));
            }
        }
        return None;
    }
    at_line_end(text, i).map(|end| (dest, None, end))
}

/// Only spaces and tabs may follow at `from` before the newline or the end
/// of input; returns the offset just before the newline.
fn at_line_end(text: &str, from: usize) -> Option<usize> {
    let mut k = from;
    let bytes = text.as_bytes();
    while k < bytes.len() && (bytes[k] == b' ' || bytes[k] == b'\t') {
        k += 1;
    }
    if k == bytes.len() || bytes[k] == b'\n' {
        Some(k)
    } else {
        None
    }
}
