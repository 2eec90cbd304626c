// ATX headings: 1-6 `#` markers, optional closing hash sequence

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::{Block, InlineBody};
use crate::parser::Parser;
use crate::source::Source;

static PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\A {0,3}(#{1,6})([ \t][^\n]*)?$\n?").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "Heading",
        priority: 6,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let m = source.expect_re(&PATTERN)?;
    let level = {
        let (s, e) = m.group(1).expect("marker group");
        (e - s) as u8
    };
    let raw = m.group(2).map(|span| source.text(span)).unwrap_or("");
    let body = strip_closing_sequence(raw.trim()).to_string();
    Some(ParseInfo::Heading { level, body })
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::Heading { level, body } = info else {
        unreachable!("heading parse fed foreign info");
    };
    if source.expect_re(&PATTERN).is_some() {
        source.consume();
    }
    Block::Heading {
        level,
        body: InlineBody::Raw(body),
    }
}

/// Drop a trailing run of `#` when a space or tab precedes it, per the
/// closing-sequence rule; an escaped or glued run stays.
fn strip_closing_sequence(body: &str) -> &str {
    let trimmed = body.trim_end_matches([' ', '\t']);
    let without = trimmed.trim_end_matches('#');
    if without.len() == trimmed.len() {
        return trimmed;
    }
    if without.is_empty() {
        return "";
    }
    if without.ends_with([' ', '\t']) {
        return without.trim_end_matches([' ', '\t']);
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::State;

    fn match_heading(text: &str) -> Option<(u8, String)> {
        let parser = Parser::new();
        let mut source = Source::new(text);
        source.push_state(State::document());
        match matches(&parser, &mut source)? {
            ParseInfo::Heading { level, body } => Some((level, body)),
            _ => None,
        }
    }

    #[test]
    fn smoke_test_levels() {
        // CommonMark example 62
        assert_eq!(match_heading("# foo\n"), Some((1, String::from("foo"))));
        assert_eq!(match_heading("###### foo\n"), Some((6, String::from("foo"))));
        assert_eq!(match_heading("####### foo\n"), None);
    }

    #[test]
    fn smoke_test_requires_space_after_marker() {
        // CommonMark example 64: #5 bolt / #hashtag
        assert_eq!(match_heading("#5 bolt\n"), None);
        assert_eq!(match_heading("#hashtag\n"), None);
    }

    #[test]
    fn smoke_test_empty_heading() {
        // CommonMark example 79
        assert_eq!(match_heading("#\n"), Some((1, String::new())));
        assert_eq!(match_heading("### ###\n"), Some((3, String::new())));
    }

    #[test]
    fn smoke_test_closing_sequence() {
        // CommonMark example 75
        assert_eq!(match_heading("## foo ##\n"), Some((2, String::from("foo"))));
        // not preceded by a space: part of the text (example 77)
        assert_eq!(match_heading("# foo#\n"), Some((1, String::from("foo#"))));
        // escaped hashes stay (example 78)
        assert_eq!(
            match_heading("### foo \\###\n"),
            Some((3, String::from("foo \\###")))
        );
    }

    #[test]
    fn smoke_test_four_space_indent_is_code() {
        // CommonMark example 69
        assert_eq!(match_heading("    # foo\n"), None);
    }
}
