// Fenced code blocks: ``` or ~~~ fences with an info string

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, ParseInfo};
use crate::ast::Block;
use crate::parser::shared::{partition_by_spaces, unescape};
use crate::parser::Parser;
use crate::source::Source;

static OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\A( {0,3})(`{3,}|~{3,})[ \t]*([^\n]*?)[ \t]*$").unwrap());

static CLOSER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)\A {0,3}(`+|~+)[ \t]*$").unwrap());

pub fn def() -> BlockDef {
    BlockDef {
        name: "FencedCode",
        priority: 7,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    let m = source.expect_re(&OPENER)?;
    let indent = m.group(1).map(|(s, e)| e - s).unwrap_or(0);
    let marker = source.text(m.group(2).expect("fence group")).to_string();
    let info = source.text(m.group(3).expect("info group"));
    if marker.starts_with('`') && info.contains('`') {
        // backtick fences may not carry backticks in the info string
        return None;
    }
    let (lang, _, extra) = partition_by_spaces(info);
    Some(ParseInfo::Fence {
        indent,
        marker,
        lang: unescape(lang),
        extra: extra.to_string(),
    })
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::Fence {
        indent,
        marker,
        lang,
        extra,
    } = info
    else {
        unreachable!("fenced code parse fed foreign info");
    };
    let _ = source.next_line_consume();
    let mut lines: Vec<String> = Vec::new();
    while !source.exhausted() {
        let Some(line) = source.next_line_consume() else {
            break;
        };
        if let Some(caps) = CLOSER.captures(&line) {
            let run = caps.get(1).expect("closer run").as_str();
            if run.contains(marker.as_str()) {
                break;
            }
        }
        lines.push(strip_fence_indent(&line, indent));
    }
    log::trace!("fenced code block: lang={lang:?}, {} lines", lines.len());
    Block::FencedCode {
        lang,
        extra,
        text: lines.concat(),
    }
}

/// Remove up to the opening fence's indentation from a content line.
fn strip_fence_indent(line: &str, indent: usize) -> String {
    let mut n = 0;
    for c in line.chars() {
        if c != ' ' || n >= indent {
            break;
        }
        n += 1;
    }
    line[n..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::State;

    fn parse_fence(text: &str) -> Block {
        let parser = Parser::new();
        let mut source = Source::new(text);
        source.push_state(State::document());
        let info = matches(&parser, &mut source).expect("fence should match");
        parse(&parser, &mut source, info)
    }

    #[test]
    fn smoke_test_basic_fence() {
        // CommonMark example 119
        let block = parse_fence("```\n<\n >\n```\n");
        assert!(matches!(block, Block::FencedCode { text, .. } if text == "<\n >\n"));
    }

    #[test]
    fn smoke_test_info_string() {
        // CommonMark example 142
        let block = parse_fence("```ruby startline=3\ndef foo(x)\n```\n");
        let Block::FencedCode { lang, extra, .. } = block else {
            panic!("not fenced code");
        };
        assert_eq!(lang, "ruby");
        assert_eq!(extra, "startline=3");
    }

    #[test]
    fn smoke_test_unterminated_fence_closes_at_eof() {
        // CommonMark example 126
        let block = parse_fence("```\ncontent\n");
        assert!(matches!(block, Block::FencedCode { text, .. } if text == "content\n"));
    }

    #[test]
    fn smoke_test_closer_must_be_at_least_opener_length() {
        // CommonMark example 127-ish: a shorter run stays content
        let block = parse_fence("````\n```\ncontent\n````\n");
        assert!(matches!(block, Block::FencedCode { text, .. } if text == "```\ncontent\n"));
    }

    #[test]
    fn smoke_test_opening_indent_is_stripped() {
        // CommonMark example 131
        let block = parse_fence("   ```\n   aaa\n    aaa\n   ```\n");
        assert!(matches!(block, Block::FencedCode { text, .. } if text == "aaa\n aaa\n"));
    }

    #[test]
    fn smoke_test_backtick_info_rejected_for_backtick_fence() {
        // CommonMark example 145
        let parser = Parser::new();
        let mut source = Source::new("``` aa ```\nfoo\n");
        source.push_state(State::document());
        assert!(matches(&parser, &mut source).is_none());
    }
}
