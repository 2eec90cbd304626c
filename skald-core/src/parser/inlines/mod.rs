// Inline-level parser modules
//
// Phase A collects candidate tokens from every registered inline kind,
// phase B resolves overlaps between them, phase C builds elements and
// recurses into the spans that parse children.

pub mod cm_autolink;
pub mod cm_backslash_escape;
pub mod cm_code_span;
pub mod cm_inline_html;
pub mod cm_line_breaks;
pub mod cm_link_emphasis;
pub mod shared;

use crate::ast::{Inline, LinkRefDefs};

/// Context threaded through inline finders; carries the document's link
/// reference definitions instead of a global root node.
pub struct InlineContext<'a> {
    pub link_ref_defs: &'a LinkRefDefs,
}

pub type InlineFindFn = fn(&str, &InlineContext) -> Vec<InlineMatch>;

#[derive(Clone)]
pub struct InlineDef {
    pub name: &'static str,
    pub priority: u8,
    pub parse_children: bool,
    /// When set, this definition replaces the named base kind in the
    /// registry instead of being added alongside it.
    pub replaces: Option<&'static str>,
    pub find: InlineFindFn,
}

/// A candidate token: the matched span, the span handed to child parsing,
/// and the element it builds (children still empty).
#[derive(Debug, Clone)]
pub struct InlineMatch {
    pub priority: u8,
    pub parse_children: bool,
    pub start: usize,
    pub end: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub proto: Inline,
}

pub fn defaults() -> Vec<InlineDef> {
    vec![
        cm_backslash_escape::def(),
        cm_code_span::def(),
        cm_inline_html::def(),
        cm_autolink::def(),
        cm_link_emphasis::def(),
        cm_line_breaks::def(),
    ]
}

/// Parse `text` into inline elements. Unmatched holes become `RawText`.
pub fn parse(text: &str, defs: &[InlineDef], ctx: &InlineContext) -> Vec<Inline> {
    let mut tokens: Vec<Token> = Vec::new();
    for def in defs {
        for m in (def.find)(text, ctx) {
            tokens.push(Token {
                m,
                children: Vec::new(),
            });
        }
    }
    tokens.sort_by_key(|t| t.m.start);
    let tokens = resolve_overlap(tokens);
    make_elements(tokens, text, 0, text.len())
}

struct Token {
    m: InlineMatch,
    children: Vec<Token>,
}

enum Relation {
    Precede,
    Contain,
    Shade,
    Intersect,
}

impl Token {
    fn relation(&self, other: &Token) -> Relation {
        if self.m.end <= other.m.start {
            return Relation::Precede;
        }
        if self.m.end >= other.m.end {
            if self.m.parse_children
                && other.m.start >= self.m.inner_start
                && other.m.end <= self.m.inner_end
            {
                return Relation::Contain;
            }
            if self.m.parse_children && self.m.inner_end <= other.m.start {
                return Relation::Shade;
            }
        }
        Relation::Intersect
    }
}

/// Walk start-sorted tokens pairwise: emit disjoint ones, nest contained
/// ones, and let priority decide genuine overlaps.
fn resolve_overlap(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::new();
    let mut iter = tokens.into_iter();
    let Some(mut prev) = iter.next() else {
        return result;
    };
    for cur in iter {
        match prev.relation(&cur) {
            Relation::Precede => {
                result.push(prev);
                prev = cur;
            }
            Relation::Contain => prev.children.push(cur),
            Relation::Intersect if cur.m.priority > prev.m.priority => prev = cur,
            // shaded tokens and lower-priority overlaps are dropped
            Relation::Shade | Relation::Intersect => {}
        }
    }
    result.push(prev);
    result
}

fn make_elements(tokens: Vec<Token>, text: &str, start: usize, end: usize) -> Vec<Inline> {
    let mut result = Vec::new();
    let mut prev_end = start;
    for token in tokens {
        if prev_end < token.m.start {
            result.push(Inline::RawText {
                text: text[prev_end..token.m.start].to_string(),
            });
        }
        prev_end = token.m.end;
        result.push(as_element(token, text));
    }
    if prev_end < end {
        result.push(Inline::RawText {
            text: text[prev_end..end].to_string(),
        });
    }
    result
}

fn as_element(token: Token, text: &str) -> Inline {
    let Token { m, children } = token;
    let mut element = m.proto;
    if m.parse_children {
        let children = resolve_overlap(children);
        let children = make_elements(children, text, m.inner_start, m.inner_end);
        element.set_children(children);
    }
    element
}
