// Block-level parser modules
//
// Each module defines one block kind: its registry entry, a `matches`
// predicate that returns the information `parse` needs, and the `parse`
// constructor itself. The parser loop picks the highest-priority match.

pub mod cm_blank_line;
pub mod cm_blockquote;
pub mod cm_fenced_code_block;
pub mod cm_heading;
pub mod cm_html_blocks;
pub mod cm_indented_code_block;
pub mod cm_link_reference;
pub mod cm_list;
pub mod cm_paragraph;
pub mod cm_setext_heading;
pub mod cm_thematic_break;

use regex::Regex;

use crate::ast::Block;
use crate::parser::Parser;
use crate::source::Source;

pub type BlockMatchFn = fn(&Parser, &mut Source) -> Option<ParseInfo>;
pub type BlockParseFn = fn(&Parser, &mut Source, ParseInfo) -> Block;

#[derive(Clone)]
pub struct BlockDef {
    pub name: &'static str,
    pub priority: u8,
    /// Virtual kinds are skipped by the dispatch loop; only their
    /// producers create them.
    pub is_virtual: bool,
    /// When set, this definition replaces the named base kind in the
    /// registry instead of being added alongside it.
    pub replaces: Option<&'static str>,
    pub matches: BlockMatchFn,
    pub parse: BlockParseFn,
}

/// Data computed by `matches` and threaded through to `parse`, so that no
/// state hides between the two calls.
#[derive(Debug, Clone)]
pub enum ParseInfo {
    None,
    Heading {
        level: u8,
        body: String,
    },
    Fence {
        indent: usize,
        marker: String,
        lang: String,
        extra: String,
    },
    Html {
        variant: u8,
        end: HtmlEnd,
    },
    List {
        bullet: String,
        ordered: bool,
        start: u32,
    },
    ListItem {
        indent: usize,
        bullet: String,
        mid: usize,
        empty_first: bool,
    },
    LinkRef {
        label: String,
        dest: String,
        title: Option<String>,
        end: usize,
    },
    Custom(String),
}

/// How an HTML block ends: at a line matching a terminator, or before the
/// next blank line.
#[derive(Debug, Clone)]
pub enum HtmlEnd {
    Terminator(Regex),
    Blank,
}

/// The CommonMark block elements in registration order; the parser sorts
/// them by priority, keeping this order among equals.
pub fn defaults() -> Vec<BlockDef> {
    vec![
        cm_indented_code_block::def(),
        cm_heading::def(),
        cm_list::list_def(),
        cm_list::list_item_def(),
        cm_blank_line::def(),
        cm_blockquote::def(),
        cm_fenced_code_block::def(),
        cm_thematic_break::def(),
        cm_html_blocks::def(),
        cm_link_reference::def(),
        cm_setext_heading::def(),
        cm_paragraph::def(),
    ]
}
