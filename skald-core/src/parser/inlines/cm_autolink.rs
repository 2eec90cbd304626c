// Autolinks: absolute URIs and email addresses between angle brackets

use once_cell::sync::Lazy;
use regex::Regex;

use super::{InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;

const PRIORITY: u8 = 7;

static URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A<[A-Za-z][A-Za-z0-9+.-]{1,31}:[^<>\x00-\x20]*>").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A<[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*>",
    )
    .unwrap()
});

pub fn def() -> InlineDef {
    InlineDef {
        name: "AutoLink",
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
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let rest = &text[i..];
        let (end, mailto) = match URI.find(rest) {
            Some(m) => (i + m.end(), false),
            None => match EMAIL.find(rest) {
                Some(m) => (i + m.end(), true),
                None => {
                    i += 1;
                    continue;
                }
            },
        };
        let inner = &text[i + 1..end - 1];
        let dest = if mailto {
            format!("mailto:{inner}")
        } else {
            inner.to_string()
        };
        out.push(InlineMatch {
            priority: PRIORITY,
            parse_children: false,
            start: i,
            end,
            inner_start: i + 1,
            inner_end: end - 1,
            proto: Inline::AutoLink {
                dest,
                children: vec![Inline::RawText {
                    text: inner.to_string(),
                }],
            },
        });
        i = end;
    }
    out
}
