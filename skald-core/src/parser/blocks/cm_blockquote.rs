// Block quotes: `>` marker with recursive content

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::Parser;
use crate::source::{Source, State};

static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A {0,3}>").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "Quote",
        priority: 6,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    source.expect_re(&PATTERN).map(|_| ParseInfo::None)
}

pub(crate) fn parse(parser: &Parser, source: &mut Source, _info: ParseInfo) -> Block {
    let children = source.under_state(State::quote(), |src| parser.parse_source(src));
    Block::Quote { children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::InlineBody;

    fn parse_doc(text: &str) -> Vec<Block> {
        Parser::new().parse(text).children
    }

    #[test]
    fn smoke_test_simple_quote() {
        // CommonMark example 228
        let blocks = parse_doc("> # Foo\n> bar\n> baz\n");
        assert_eq!(blocks.len(), 1);
        let Block::Quote { children } = &blocks[0] else {
            panic!("expected quote");
        };
        assert!(matches!(children[0], Block::Heading { level: 1, .. }));
        assert!(matches!(&children[1], Block::Paragraph { body: InlineBody::Parsed(_), .. }));
    }

    #[test]
    fn smoke_test_lazy_continuation() {
        // CommonMark example 233
        let blocks = parse_doc("> bar\nbaz\n");
        let Block::Quote { children } = &blocks[0] else {
            panic!("expected quote");
        };
        assert_eq!(children.len(), 1, "lazy line joins the paragraph");
    }

    #[test]
    fn smoke_test_blank_line_ends_quote() {
        // CommonMark example 235
        let blocks = parse_doc("> foo\n\n> bar\n");
        assert_eq!(
            blocks
                .iter()
                .filter(|b| matches!(b, Block::Quote { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn smoke_test_nested_quotes() {
        let blocks = parse_doc("> > nested\n");
        let Block::Quote { children } = &blocks[0] else {
            panic!("expected quote");
        };
        assert!(matches!(children[0], Block::Quote { .. }));
    }
}
