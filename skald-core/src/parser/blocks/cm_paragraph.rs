// Paragraphs: the lowest-priority block, with lazy continuation and the
// setext-underline transformation

use once_cell::sync::Lazy;
use regex::Regex;

use super::{cm_list, cm_setext_heading, BlockDef, ParseInfo};
use crate::ast::{Block, InlineBody};
use crate::parser::Parser;
use crate::source::Source;

static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)\A[^\n]+$\n?").unwrap());

static SETEXT_UNDERLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\A {0,3}(=+|-+)[ \t]*$").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "Paragraph",
        priority: 1,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    source.expect_re(&PATTERN).map(|_| ParseInfo::None)
}

pub(crate) fn is_setext_underline(line: &str) -> bool {
    SETEXT_UNDERLINE.is_match(line)
}

/// Would the upcoming line open a block that interrupts a paragraph?
/// `parse_setext` is off for lazily continued lines, where an underline
/// cannot transform the paragraph.
pub(crate) fn break_paragraph(parser: &Parser, source: &mut Source, parse_setext: bool) -> bool {
    for name in ["Quote", "Heading", "BlankLine", "FencedCode"] {
        if parser.block_matches(name, source) {
            return true;
        }
    }
    if parser.block_matches("List", source) {
        if let Some(line) = source.next_line() {
            let (_, bullet, _, tail) = cm_list::parse_leading(&line);
            // only a list starting at 1, or any unordered bullet, with
            // actual content interrupts a paragraph
            let interrupts = bullet == "*"
                || bullet == "-"
                || bullet == "+"
                || (bullet.len() >= 2 && &bullet[..bullet.len() - 1] == "1");
            if interrupts && !tail.trim().is_empty() {
                return true;
            }
        }
    }
    if let Some(ParseInfo::Html { variant, .. }) = parser.block_match_info("HTMLBlock", source) {
        if variant != 7 {
            return true;
        }
    }
    if parser.block_matches("ThematicBreak", source) {
        if parse_setext
            && source
                .next_line()
                .is_some_and(|line| is_setext_underline(&line))
        {
            // the paragraph absorbs the underline instead
            return false;
        }
        return true;
    }
    false
}

pub(crate) fn parse(parser: &Parser, source: &mut Source, _info: ParseInfo) -> Block {
    let mut lines = vec![source.next_line_consume().expect("match precedes parse")];
    let mut end_parse = false;
    while !source.exhausted() && !end_parse {
        if break_paragraph(parser, source, true) {
            break;
        }
        match source.next_line() {
            Some(line) => {
                lines.push(source.next_line_consume().expect("line just peeked"));
                if is_setext_underline(&line) {
                    return cm_setext_heading::build(lines);
                }
            }
            None => {
                // the prefix failed: try lazy continuation at shallower
                // container levels, then restore the stack
                let saved = source.snapshot_states();
                while source.states_depth() > 1 {
                    source.pop_state();
                    if source.next_line().is_some() {
                        if break_paragraph(parser, source, false) {
                            end_parse = true;
                        } else {
                            lines.push(
                                source.next_line_consume().expect("line just peeked"),
                            );
                        }
                        break;
                    }
                }
                source.restore_states(saved);
            }
        }
    }
    let body: String = lines.iter().map(|l| l.trim_start()).collect();
    Block::Paragraph {
        body: InlineBody::Raw(body.trim_end().to_string()),
        tight: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_doc(text: &str) -> Vec<Block> {
        Parser::new().parse(text).children
    }

    fn body_of(block: &Block) -> &[crate::ast::Inline] {
        match block {
            Block::Paragraph { body, .. }
            | Block::Heading { body, .. }
            | Block::SetextHeading { body, .. } => body.children(),
            other => panic!("no inline body on {other:?}"),
        }
    }

    #[test]
    fn smoke_test_two_paragraphs() {
        // CommonMark example 219
        let blocks = parse_doc("aaa\n\nbbb\n");
        let paras = blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph { .. }))
            .count();
        assert_eq!(paras, 2);
    }

    #[test]
    fn smoke_test_multi_line_paragraph_strips_leading_space() {
        // CommonMark example 222
        let blocks = parse_doc("aaa\n         bbb\n");
        let text = body_of(&blocks[0]);
        assert!(!text.is_empty());
        assert!(matches!(&text[0], crate::ast::Inline::RawText { text } if text == "aaa"));
    }

    #[test]
    fn smoke_test_setext_transformation() {
        // CommonMark example 50
        let blocks = parse_doc("Foo *bar*\n=========\n");
        assert!(matches!(blocks[0], Block::SetextHeading { level: 1, .. }));
    }

    #[test]
    fn smoke_test_dash_underline_beats_thematic_break() {
        let blocks = parse_doc("Foo\n---\n");
        assert!(matches!(blocks[0], Block::SetextHeading { level: 2, .. }));
        assert!(!blocks.iter().any(|b| matches!(b, Block::ThematicBreak)));
    }

    #[test]
    fn smoke_test_lazy_underline_is_a_break() {
        // CommonMark example 93: the underline seen lazily from a quote
        // ends the paragraph as a thematic break
        let blocks = parse_doc("> Foo\n---\n");
        assert!(matches!(blocks[0], Block::Quote { .. }));
        assert!(blocks.iter().any(|b| matches!(b, Block::ThematicBreak)));
    }

    #[test]
    fn smoke_test_ordered_list_needs_start_one_to_interrupt() {
        // CommonMark examples 304-306
        let blocks = parse_doc("The number of windows in my house is\n14.  The number of doors is 6.\n");
        assert_eq!(blocks.len(), 1, "14. does not interrupt");
        let blocks = parse_doc("The number of windows in my house is\n1.  The number of doors is 6.\n");
        assert!(blocks.iter().any(|b| matches!(b, Block::List { .. })));
    }

    #[test]
    fn smoke_test_indented_code_does_not_interrupt() {
        // CommonMark example 113
        let blocks = parse_doc("foo\n    bar\n");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }
}
