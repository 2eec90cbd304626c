// Backslash escapes: `\` followed by ASCII punctuation becomes a literal

use once_cell::sync::Lazy;
use regex::Regex;

use super::{InlineContext, InlineDef, InlineMatch};
use crate::ast::Inline;

const PRIORITY: u8 = 7;

static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\\[!-/:-@\[-`{-~]"#).unwrap());

pub fn def() -> InlineDef {
    InlineDef {
        name: "Literal",
        priority: PRIORITY,
        parse_children: false,
        replaces: None,
        find,
    }
}

fn find(text: &str, _ctx: &InlineContext) -> Vec<InlineMatch> {
    PATTERN
        .find_iter(text)
        .map(|m| InlineMatch {
            priority: PRIORITY,
            parse_children: false,
            start: m.start(),
            end: m.end(),
            inner_start: m.end(),
            inner_end: m.end(),
            proto: Inline::Literal {
                text: text[m.start() + 1..m.end()].to_string(),
            },
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
    fn smoke_test_escaped_punctuation() {
        let found = find_in(r"\*not\*");
        assert_eq!(found.len(), 2);
        assert!(matches!(&found[0].proto, Inline::Literal { text } if text == "*"));
    }

    #[test]
    fn smoke_test_letters_are_not_escapable() {
        // CommonMark example 13: \→ and letters keep their backslash
        assert!(find_in(r"\a \ ").is_empty());
    }

    #[test]
    fn smoke_test_escaped_backslash() {
        let found = find_in(r"\\*emphasis*");
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (0, 2));
    }
}
