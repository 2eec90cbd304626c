// Line breaks: two trailing spaces or a trailing backslash make a hard
// break, a bare line feed a soft one

use once_cell::sync::Lazy;
use regex::Regex;

use super::{InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;

const PRIORITY: u8 = 2;

static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"( +|\\)?\n").unwrap());

pub fn def() -> InlineDef {
    InlineDef {
        name: "LineBreak",
        priority: PRIORITY,
        parse_children: false,
        replaces: None,
        find,
    }
}

fn find(text: &str, _ctx: &InlineContext) -> Vec<InlineMatch> {
    PATTERN
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("group 0 always present");
            let soft = match caps.get(1) {
                Some(g) => g.as_str() != "\\" && g.as_str().len() < 2,
                None => true,
            };
            InlineMatch {
                priority: PRIORITY,
                parse_children: false,
                start: whole.start(),
                end: whole.end(),
                inner_start: whole.end(),
                inner_end: whole.end(),
                proto: Inline::LineBreak { soft },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LinkRefDefs;

    fn find_in(text: &str) -> Vec<InlineMatch> {
        let refs = LinkRefDefs::new();
        find(text, &InlineContext { link_ref_defs: &refs })
    }

    #[test]
    fn smoke_test_soft_break() {
        let found = find_in("foo\nbar");
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0].proto, Inline::LineBreak { soft: true }));
        assert_eq!((found[0].start, found[0].end), (3, 4));
    }

    #[test]
    fn smoke_test_hard_break_spaces() {
        // CommonMark example 633: foo␠␠\nbaz
        let found = find_in("foo  \nbaz");
        assert!(matches!(found[0].proto, Inline::LineBreak { soft: false }));
        // the trailing spaces belong to the break
        assert_eq!(found[0].start, 3);
    }

    #[test]
    fn smoke_test_hard_break_backslash() {
        // CommonMark example 634: foo\␊baz
        let found = find_in("foo\\\nbaz");
        assert!(matches!(found[0].proto, Inline::LineBreak { soft: false }));
    }

    #[test]
    fn smoke_test_single_trailing_space_is_soft() {
        let found = find_in("foo \nbaz");
        assert!(matches!(found[0].proto, Inline::LineBreak { soft: true }));
        assert_eq!(found[0].start, 3);
    }
}
