// Blank lines, consumed greedily

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::Parser;
use crate::source::Source;

static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\n+").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "BlankLine",
        priority: 5,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    source.expect_re(&PATTERN).map(|_| ParseInfo::None)
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, _info: ParseInfo) -> Block {
    // the anchor lets list parsing rewind trailing blanks to here
    let anchor = source.pos;
    if source.expect_re(&PATTERN).is_some() {
        source.consume();
    }
    Block::BlankLine { anchor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::State;

    #[test]
    fn smoke_test_consumes_consecutive_blanks() {
        let parser = Parser::new();
        let mut source = Source::new("\n\n\ntext\n");
        source.push_state(State::document());
        assert!(matches(&parser, &mut source).is_some());
        let block = parse(&parser, &mut source, ParseInfo::None);
        assert!(matches!(block, Block::BlankLine { anchor: 0 }));
        assert_eq!(source.pos, 3);
    }

    #[test]
    fn smoke_test_no_match_on_text() {
        let parser = Parser::new();
        let mut source = Source::new("text\n");
        source.push_state(State::document());
        assert!(matches(&parser, &mut source).is_none());
    }
}
