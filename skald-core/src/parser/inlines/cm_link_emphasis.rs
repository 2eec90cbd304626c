// Links, images, and emphasis resolved over a delimiter stack
//
// A single left-to-right scan collects bracket and emphasis-run delimiters,
// skipping escapes and code spans. `]` triggers link/image resolution
// against the nearest active opener; the remaining runs are paired by the
// CommonMark emphasis algorithm, including the flanking rules and the
// multiple-of-three exclusion.

use once_cell::sync::Lazy;
use regex::Regex;

use super::cm_code_span::code_span_at;
use super::{shared, InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;
use crate::parser::shared::{is_paired, is_punctuation, normalize_label};

const PRIORITY: u8 = 3;

static OPTIONAL_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\[(?:\\\\|\\[\[\]]|[^\[\]])*\]").unwrap());

pub fn def() -> InlineDef {
    InlineDef {
        name: "LinkOrEmph",
        priority: PRIORITY,
        parse_children: true,
        replaces: None,
        find,
    }
}

fn find(text: &str, ctx: &InlineContext) -> Vec<InlineMatch> {
    let bytes = text.as_bytes();
    let mut delimiters: Vec<Delimiter> = Vec::new();
    let mut matches: Vec<InlineMatch> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 1;
            if let Some(c) = text[i..].chars().next() {
                i += c.len_utf8();
            }
        } else if b == b'`' {
            match code_span_at(text, i) {
                Some((end, _)) => i = end,
                None => i += 1,
            }
        } else if b == b']' {
            match look_for_image_or_link(text, &mut delimiters, i, ctx, &mut matches) {
                Some(m) => {
                    i = m.end;
                    matches.push(m);
                }
                None => i += 1,
            }
        } else if b == b'[' {
            delimiters.push(Delimiter::bracket(i, i + 1, "["));
            i += 1;
        } else if b == b'!' && bytes.get(i + 1) == Some(&b'[') {
            delimiters.push(Delimiter::bracket(i, i + 2, "!["));
            i += 2;
        } else if b == b'*' || b == b'_' {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b {
                j += 1;
            }
            delimiters.push(Delimiter::emphasis(text, i, j));
            i = j;
        } else {
            i += 1;
        }
    }
    process_emphasis(text, &mut delimiters, None, &mut matches);
    matches
}

/// Scan back from a `]` for the nearest bracket opener and try to resolve
/// an inline or reference link. A failed candidate removes the opener and
/// leaves the `]` as literal text.
fn look_for_image_or_link(
    text: &str,
    delimiters: &mut Vec<Delimiter>,
    close: usize,
    ctx: &InlineContext,
    matches: &mut Vec<InlineMatch>,
) -> Option<InlineMatch> {
    for i in (0..delimiters.len()).rev() {
        if delimiters[i].content != "[" && delimiters[i].content != "![" {
            continue;
        }
        let ok = delimiters[i].active && is_paired(&text[delimiters[i].end..close], '[', ']');
        let resolved = if ok {
            expect_inline_link(text, close + 1).or_else(|| {
                expect_reference_link(text, close + 1, &text[delimiters[i].end..close], ctx)
            })
        } else {
            None
        };
        let Some((dest, title, end)) = resolved else {
            delimiters.remove(i);
            return None;
        };
        let is_image = delimiters[i].content == "![";
        let m = InlineMatch {
            priority: PRIORITY,
            parse_children: true,
            start: delimiters[i].start,
            end,
            inner_start: delimiters[i].end,
            inner_end: close,
            proto: if is_image {
                Inline::Image {
                    dest,
                    title,
                    children: Vec::new(),
                }
            } else {
                Inline::Link {
                    dest,
                    title,
                    children: Vec::new(),
                }
            },
        };
        process_emphasis(text, delimiters, Some(i), matches);
        if !is_image {
            // a resolved link deactivates earlier openers: no link in link
            for d in delimiters[..i].iter_mut() {
                if d.content == "[" {
                    d.active = false;
                }
            }
        }
        delimiters.remove(i);
        return Some(m);
    }
    None
}

/// `(dest "title")` after the closing bracket.
fn expect_inline_link(text: &str, start: usize) -> Option<(String, Option<String>, usize)> {
    if start + 1 >= text.len() || text.as_bytes()[start] != b'(' {
        return None;
    }
    let mut i = skip_whitespace(text, start + 1);
    if i >= text.len() {
        return None;
    }
    let (dest, dest_end) = if let Ok((_, raw)) = shared::angle_link_dest(&text[i..]) {
        (shared::cook_dest(raw), i + raw.len())
    } else {
        if text.as_bytes()[i] == b'<' {
            return None;
        }
        let (_, raw) = shared::bare_link_dest(&text[i..]).ok()?;
        (shared::cook_dest(raw), i + raw.len())
    };
    i = dest_end;
    let ws_end = skip_whitespace(text, i);
    if ws_end > i {
        if let Ok((_, raw_title)) = shared::link_title(&text[ws_end..]) {
            let after = skip_whitespace(text, ws_end + raw_title.len());
            if text.as_bytes().get(after) == Some(&b')') {
                return Some((dest, Some(shared::cook_title(raw_title)), after + 1));
            }
        }
    }
    let after = skip_whitespace(text, i);
    if text.as_bytes().get(after) == Some(&b')') {
        return Some((dest, None, after + 1));
    }
    None
}

/// `[label]`, collapsed `[]`, or shortcut reference after the bracket.
fn expect_reference_link(
    text: &str,
    start: usize,
    link_text: &str,
    ctx: &InlineContext,
) -> Option<(String, Option<String>, usize)> {
    let m = OPTIONAL_LABEL.find(&text[start..]);
    let (label, end) = match &m {
        Some(found) if found.end() > 2 => (&text[start + 1..start + found.end() - 1], start + found.end()),
        Some(found) => (link_text, start + found.end()),
        None => (link_text, start),
    };
    let def = ctx.link_ref_defs.get(&normalize_label(label))?;
    Some((def.dest.clone(), def.title.clone(), end))
}

fn skip_whitespace(text: &str, mut i: usize) -> usize {
    for c in text[i..].chars() {
        if !c.is_whitespace() {
            break;
        }
        i += c.len_utf8();
    }
    i
}

#[derive(Debug)]
struct Delimiter {
    start: usize,
    end: usize,
    content: String,
    active: bool,
    can_open: bool,
    can_close: bool,
}

impl Delimiter {
    fn bracket(start: usize, end: usize, content: &str) -> Self {
        Delimiter {
            start,
            end,
            content: content.to_string(),
            active: true,
            can_open: false,
            can_close: false,
        }
    }

    fn emphasis(text: &str, start: usize, end: usize) -> Self {
        let marker = text.as_bytes()[start];
        let prev = text[..start].chars().next_back();
        let next = text[end..].chars().next();
        let prev_ws = prev.map_or(true, |c| c.is_whitespace());
        let next_ws = next.map_or(true, |c| c.is_whitespace());
        let prev_punct = prev.map_or(false, is_punctuation);
        let next_punct = next.map_or(false, is_punctuation);
        let left = !next_ws && (!next_punct || prev_ws || prev_punct);
        let right = !prev_ws && (!prev_punct || next_ws || next_punct);
        let (can_open, can_close) = if marker == b'*' {
            (left, right)
        } else {
            (left && (!right || prev_punct), right && (!left || next_punct))
        };
        Delimiter {
            start,
            end,
            content: text[start..end].to_string(),
            active: true,
            can_open,
            can_close,
        }
    }

    /// Consume `n` characters from this run; true when exhausted.
    fn remove(&mut self, n: usize, left: bool) -> bool {
        if self.content.len() <= n {
            return true;
        }
        if left {
            self.start += n;
        } else {
            self.end -= n;
        }
        let keep = self.content.len() - n;
        self.content.truncate(keep);
        false
    }
}

fn closed_by(opener: &Delimiter, closer: &Delimiter) -> bool {
    if opener.content.as_bytes()[0] != closer.content.as_bytes()[0] {
        return false;
    }
    let either_both = (opener.can_open && opener.can_close) || (closer.can_open && closer.can_close);
    let sum = opener.content.len() + closer.content.len();
    let both_multiples = opener.content.len() % 3 == 0 && closer.content.len() % 3 == 0;
    // rule of three: a run that can both open and close may not pair when
    // the joint length divides by three unless both lengths do
    !(either_both && sum % 3 == 0 && !both_multiples)
}

fn next_closer(delimiters: &[Delimiter], bound: Option<usize>) -> Option<usize> {
    let start = bound.map_or(0, |b| b + 1);
    (start..delimiters.len()).find(|&i| delimiters[i].can_close)
}

fn nearest_opener(delimiters: &[Delimiter], higher: usize, lower: Option<usize>) -> Option<usize> {
    let low = lower.map_or(0, |l| l + 1);
    (low..higher)
        .rev()
        .find(|&i| delimiters[i].can_open && closed_by(&delimiters[i], &delimiters[higher]))
}

fn process_emphasis(
    _text: &str,
    delimiters: &mut Vec<Delimiter>,
    stack_bottom: Option<usize>,
    matches: &mut Vec<InlineMatch>,
) {
    let mut star_bottom = stack_bottom;
    let mut underscore_bottom = stack_bottom;
    let mut cur = next_closer(delimiters, stack_bottom);
    while let Some(c) = cur {
        let marker = delimiters[c].content.as_bytes()[0];
        let family_bottom = if marker == b'*' {
            star_bottom
        } else {
            underscore_bottom
        };
        let bound;
        if let Some(o) = nearest_opener(delimiters, c, family_bottom) {
            let n = if delimiters[o].content.len() >= 2 && delimiters[c].content.len() >= 2 {
                2
            } else {
                1
            };
            let (o_end, c_start) = (delimiters[o].end, delimiters[c].start);
            matches.push(InlineMatch {
                priority: PRIORITY,
                parse_children: true,
                start: o_end - n,
                end: c_start + n,
                inner_start: o_end,
                inner_end: c_start,
                proto: if n == 2 {
                    Inline::StrongEmphasis {
                        children: Vec::new(),
                    }
                } else {
                    Inline::Emphasis {
                        children: Vec::new(),
                    }
                },
            });
            delimiters.drain(o + 1..c);
            let mut cc = o + 1;
            if delimiters[o].remove(n, false) {
                delimiters.remove(o);
                cc -= 1;
            }
            if delimiters[cc].remove(n, true) {
                delimiters.remove(cc);
            }
            bound = if cc > 0 { Some(cc - 1) } else { None };
        } else {
            let family = if c > 1 { Some(c - 1) } else { None };
            if marker == b'*' {
                star_bottom = family;
            } else {
                underscore_bottom = family;
            }
            if !delimiters[c].can_open {
                delimiters.remove(c);
            }
            bound = Some(c);
        }
        cur = next_closer(delimiters, bound);
    }
    let lower = stack_bottom.map_or(0, |b| b + 1);
    delimiters.truncate(lower);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LinkRefDef, LinkRefDefs};

    fn find_in(text: &str) -> Vec<InlineMatch> {
        let refs = LinkRefDefs::new();
        find(text, &InlineContext { link_ref_defs: &refs })
    }

    fn find_with_ref(text: &str, label: &str, dest: &str) -> Vec<InlineMatch> {
        let mut refs = LinkRefDefs::new();
        refs.insert(
            normalize_label(label),
            LinkRefDef {
                dest: dest.to_string(),
                title: None,
            },
        );
        find(text, &InlineContext { link_ref_defs: &refs })
    }

    #[test]
    fn smoke_test_simple_emphasis() {
        // CommonMark example 350
        let found = find_in("*foo bar*");
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0].proto, Inline::Emphasis { .. }));
        assert_eq!((found[0].start, found[0].end), (0, 9));
    }

    #[test]
    fn smoke_test_space_after_opener_blocks_emphasis() {
        // CommonMark example 351: a * foo bar*
        assert!(find_in("a * foo bar*").is_empty());
    }

    #[test]
    fn smoke_test_intraword_underscore_is_literal() {
        // CommonMark example 360
        assert!(find_in("foo_bar_").is_empty());
    }

    #[test]
    fn smoke_test_strong() {
        // CommonMark example 387
        let found = find_in("**foo bar**");
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0].proto, Inline::StrongEmphasis { .. }));
    }

    #[test]
    fn smoke_test_rule_of_three() {
        // CommonMark example 410: *foo**bar*
        let found = find_in("*foo**bar*");
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0].proto, Inline::Emphasis { .. }));
        assert_eq!((found[0].inner_start, found[0].inner_end), (1, 9));
    }

    #[test]
    fn smoke_test_nested_strong_inside_emphasis() {
        let found = find_in("*foo **bar** baz*");
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .any(|m| matches!(m.proto, Inline::StrongEmphasis { .. })));
        assert!(found.iter().any(|m| matches!(m.proto, Inline::Emphasis { .. })));
    }

    #[test]
    fn smoke_test_inline_link() {
        // CommonMark example 481
        let found = find_in("[link](/uri \"title\")");
        assert_eq!(found.len(), 1);
        match &found[0].proto {
            Inline::Link { dest, title, .. } => {
                assert_eq!(dest, "/uri");
                assert_eq!(title.as_deref(), Some("title"));
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn smoke_test_empty_destination() {
        // CommonMark example 484: [link]()
        let found = find_in("[link]()");
        assert!(matches!(&found[0].proto, Inline::Link { dest, .. } if dest.is_empty()));
    }

    #[test]
    fn smoke_test_unbalanced_paren_fails() {
        // CommonMark example 490
        assert!(find_in("[link](foo(and(bar))").is_empty());
    }

    #[test]
    fn smoke_test_image() {
        let found = find_in("![alt](/img.png)");
        assert!(matches!(&found[0].proto, Inline::Image { dest, .. } if dest == "/img.png"));
        assert_eq!((found[0].inner_start, found[0].inner_end), (2, 5));
    }

    #[test]
    fn smoke_test_shortcut_reference() {
        let found = find_with_ref("[foo]", "foo", "/url");
        assert!(matches!(&found[0].proto, Inline::Link { dest, .. } if dest == "/url"));
    }

    #[test]
    fn smoke_test_full_reference_label_wins() {
        let found = find_with_ref("[text][foo]", "foo", "/url");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].inner_start, found[0].inner_end), (1, 5));
        assert_eq!(found[0].end, 11);
    }

    #[test]
    fn smoke_test_no_link_in_link() {
        // the outer candidate is deactivated once the inner link resolves
        let found = find_in("[a [b](/inner) c](/outer)");
        assert_eq!(found.len(), 1);
        assert!(matches!(&found[0].proto, Inline::Link { dest, .. } if dest == "/inner"));
    }

    #[test]
    fn smoke_test_unresolved_reference_is_literal() {
        assert!(find_in("[nothing]").is_empty());
    }

    #[test]
    fn smoke_test_emphasis_spans_a_link() {
        let found = find_in("*foo [bar](/u) baz*");
        assert!(found.iter().any(|m| matches!(m.proto, Inline::Emphasis { .. })));
        assert!(found.iter().any(|m| matches!(m.proto, Inline::Link { .. })));
    }
}
