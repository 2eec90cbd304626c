// HTML blocks, the seven CommonMark variants, kept as raw text

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BlockDef, HtmlEnd, ParseInfo};
use crate::ast::Block;
use crate::parser::shared::{ATTRIBUTE_NO_LF, BLOCK_TAGS, TAG_NAME};
use crate::parser::Parser;
use crate::source::Source;

static RAW_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A {0,3}<(?:script|pre|style|textarea)[\s>]").unwrap());
static RAW_TAG_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:script|pre|style|textarea)>").unwrap());

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A {0,3}<!--").unwrap());
static COMMENT_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"-->").unwrap());

static PROCESSING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A {0,3}<\?").unwrap());
static PROCESSING_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?>").unwrap());

static CDATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A {0,3}<!\[CDATA\[").unwrap());
static CDATA_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\]>").unwrap());

static DECLARATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A {0,3}<![A-Za-z]").unwrap());
static DECLARATION_END: Lazy<Regex> = Lazy::new(|| Regex::new(r">").unwrap());

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    let tags = BLOCK_TAGS.join("|");
    Regex::new(&format!(r"(?im)\A {{0,3}}</?(?:{tags})(?: +|/?>|$)")).unwrap()
});

static ANY_TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)\A {{0,3}}(?:<{TAG_NAME}(?:{ATTRIBUTE_NO_LF})*[ \t]*/?>|</{TAG_NAME}[ \t]*>)[ \t]*$"
    ))
    .unwrap()
});

pub fn def() -> BlockDef {
    BlockDef {
        name: "HTMLBlock",
        priority: 5,
        is_virtual: false,
        replaces: None,
        matches,
        parse,
    }
}

pub(crate) fn matches(_parser: &Parser, source: &mut Source) -> Option<ParseInfo> {
    // CDATA is probed before declarations, which would otherwise shadow it
    let variants: [(u8, &Regex, Option<&Regex>); 7] = [
        (1, &RAW_TAG, Some(&RAW_TAG_END)),
        (2, &COMMENT, Some(&COMMENT_END)),
        (3, &PROCESSING, Some(&PROCESSING_END)),
        (5, &CDATA, Some(&CDATA_END)),
        (4, &DECLARATION, Some(&DECLARATION_END)),
        (6, &BLOCK_TAG, None),
        (7, &ANY_TAG_LINE, None),
    ];
    for (variant, opener, end) in variants {
        if source.expect_re(opener).is_some() {
            let end = match end {
                Some(re) => HtmlEnd::Terminator(re.clone()),
                None => HtmlEnd::Blank,
            };
            return Some(ParseInfo::Html { variant, end });
        }
    }
    None
}

pub(crate) fn parse(_parser: &Parser, source: &mut Source, info: ParseInfo) -> Block {
    let ParseInfo::Html { end, variant } = info else {
        unreachable!("html block parse fed foreign info");
    };
    log::trace!("html block variant {variant}");
    let mut lines: Vec<String> = Vec::new();
    let mut first = true;
    while !source.exhausted() {
        let Some(line) = source.next_line() else {
            break;
        };
        match &end {
            HtmlEnd::Blank => {
                // the blank line is not part of the block
                if !first && line.trim().is_empty() {
                    break;
                }
                source.advance_line();
                lines.push(line);
            }
            HtmlEnd::Terminator(re) => {
                source.advance_line();
                let done = re.is_match(&line);
                lines.push(line);
                if done {
                    break;
                }
            }
        }
        first = false;
    }
    Block::HtmlBlock {
        body: lines.concat(),
    }
}
