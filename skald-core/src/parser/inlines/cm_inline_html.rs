// Raw inline HTML: tags, comments, processing instructions, declarations,
// and CDATA sections, passed through unchanged

use once_cell::sync::Lazy;
use regex::Regex;

use super::{InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;
use crate::parser::shared::{ATTRIBUTE, TAG_NAME};

const PRIORITY: u8 = 7;

static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\A<{TAG_NAME}(?:{ATTRIBUTE})* */?>")).unwrap());

static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"\A</{TAG_NAME} *>")).unwrap());

static PROCESSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A<\?[\s\S]*?\?>").unwrap());

static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A<![A-Z]+ +[\s\S]*?>").unwrap());

static CDATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A<!\[CDATA\[[\s\S]*?\]\]>").unwrap());

pub fn def() -> InlineDef {
    InlineDef {
        name: "InlineHTML",
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
        let Some(end) = html_at(text, i) else {
            i += 1;
            continue;
        };
        out.push(InlineMatch {
            priority: PRIORITY,
            parse_children: false,
            start: i,
            end,
            inner_start: end,
            inner_end: end,
            proto: Inline::InlineHtml {
                html: text[i..end].to_string(),
            },
        });
        i = end;
    }
    out
}

fn html_at(text: &str, i: usize) -> Option<usize> {
    let rest = &text[i..];
    if let Some(end) = comment_at(rest) {
        return Some(i + end);
    }
    for re in [&*OPEN_TAG, &*CLOSE_TAG, &*PROCESSING, &*CDATA, &*DECLARATION] {
        if let Some(m) = re.find(rest) {
            return Some(i + m.end());
        }
    }
    None
}

/// `<!-- ... -->` whose text does not start with `>` or `->`, contain `--`,
/// or end with `-`.
fn comment_at(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix("<!--")?;
    let close = body.find("-->")?;
    let content = &body[..close];
    if content.starts_with('>')
        || content.starts_with("->")
        || content.contains("--")
        || content.ends_with('-')
    {
        return None;
    }
    Some(4 + close + 3)
}
