// Setext headings. Virtual: only the paragraph parser creates one, when
// it absorbs an `=` or `-` underline.

use super::BlockDef;
use crate::ast::{Block, InlineBody};

pub fn def() -> BlockDef {
    BlockDef {
        name: "SetextHeading",
        priority: 6,
        is_virtual: true,
        replaces: None,
        matches: |_, _| None,
        parse: |_, _, _| unreachable!("setext headings are created by paragraphs"),
    }
}

/// Build the heading from collected paragraph lines; the last one is the
/// underline and decides the level.
pub(crate) fn build(mut lines: Vec<String>) -> Block {
    let underline = lines.pop().unwrap_or_default();
    let level = if underline.trim_start().starts_with('=') {
        1
    } else {
        2
    };
    let body: String = lines.iter().map(|l| l.trim_start()).collect();
    let body = body.trim_end().to_string();
    Block::SetextHeading {
        level,
        body: InlineBody::Raw(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_underline_decides_level() {
        // CommonMark example 80
        let h1 = build(vec![String::from("Foo\n"), String::from("=========\n")]);
        assert!(matches!(h1, Block::SetextHeading { level: 1, .. }));
        let h2 = build(vec![String::from("Foo\n"), String::from("---------\n")]);
        assert!(matches!(h2, Block::SetextHeading { level: 2, .. }));
    }

    #[test]
    fn smoke_test_multiline_content_keeps_newline() {
        // CommonMark example 81: the heading content spans two lines
        let h = build(vec![
            String::from("Foo\n"),
            String::from("bar\n"),
            String::from("---\n"),
        ]);
        let Block::SetextHeading {
            body: InlineBody::Raw(body),
            ..
        } = h
        else {
            panic!("expected raw setext body");
        };
        assert_eq!(body, "Foo\nbar");
    }
}
