// Thematic breaks: three or more of one of `-`, `_`, `*`

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::Parser;
use crate::source::Source;

static PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\A {0,3}([-_*][ \t]*){3,}$\n?").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "ThematicBreak",
        priority: 8,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let m = source.expect_re(&PATTERN)?;
    // the repeats must all use the same marker character
    let text = source.text((m.start, m.end));
    let mut markers = text.chars().filter(|c| !c.is_whitespace());
    let first = markers.next()?;
    markers.all(|c| c == first).then_some(ParseInfo::None)
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, _info: ParseInfo) -> Block {
    if source.expect_re(&PATTERN).is_some() {
        source.consume();
    }
    Block::ThematicBreak
}
