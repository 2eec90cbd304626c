// Element tree produced by the two parsing phases

use std::collections::HashMap;

use serde::Serialize;
use unicase::UniCase;

/// Link reference definitions registered on the document, keyed by the
/// normalized label. Lookups are caseless; the first definition wins.
pub type LinkRefDefs = HashMap<UniCase<String>, LinkRefDef>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRefDef {
    pub dest: String,
    pub title: Option<String>,
}

/// The unique root of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub children: Vec<Block>,
    #[serde(skip)]
    pub link_ref_defs: LinkRefDefs,
}

/// Inline content of a leaf block: the raw string collected during the
/// block phase, replaced by parsed inline children once all link reference
/// definitions have been seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InlineBody {
    Raw(String),
    Parsed(Vec<Inline>),
}

impl InlineBody {
    pub fn children(&self) -> &[Inline] {
        match self {
            InlineBody::Parsed(children) => children,
            InlineBody::Raw(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Block {
    /// One or more consecutive blank lines. `anchor` is the byte offset of
    /// the first, used to rewind trailing blanks out of lists.
    BlankLine {
        #[serde(skip)]
        anchor: usize,
    },
    Heading {
        level: u8,
        body: InlineBody,
    },
    SetextHeading {
        level: u8,
        body: InlineBody,
    },
    CodeBlock {
        text: String,
    },
    FencedCode {
        lang: String,
        extra: String,
        text: String,
    },
    ThematicBreak,
    HtmlBlock {
        body: String,
    },
    LinkRefDef,
    Paragraph {
        body: InlineBody,
        tight: bool,
    },
    Quote {
        children: Vec<Block>,
    },
    List {
        bullet: String,
        ordered: bool,
        start: u32,
        tight: bool,
        children: Vec<Block>,
    },
    ListItem {
        indent: usize,
        bullet: String,
        mid: usize,
        children: Vec<Block>,
    },
    /// An extension-defined block. `name` is its snake_case kind name used
    /// for renderer dispatch.
    Custom {
        name: String,
        body: String,
        children: Vec<Block>,
    },
}

impl Block {
    /// Snake-case kind name, the renderer dispatch key.
    pub fn kind_name(&self) -> &str {
        match self {
            Block::BlankLine { .. } => "blank_line",
            Block::Heading { .. } => "heading",
            Block::SetextHeading { .. } => "setext_heading",
            Block::CodeBlock { .. } => "code_block",
            Block::FencedCode { .. } => "fenced_code",
            Block::ThematicBreak => "thematic_break",
            Block::HtmlBlock { .. } => "html_block",
            Block::LinkRefDef => "link_ref_def",
            Block::Paragraph { .. } => "paragraph",
            Block::Quote { .. } => "quote",
            Block::List { .. } => "list",
            Block::ListItem { .. } => "list_item",
            Block::Custom { name, .. } => name,
        }
    }

    /// Child blocks of a container; empty for leaf blocks.
    pub fn children(&self) -> &[Block] {
        match self {
            Block::Quote { children }
            | Block::List { children, .. }
            | Block::ListItem { children, .. }
            | Block::Custom { children, .. } => children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Inline {
    RawText {
        text: String,
    },
    /// A backslash-escaped punctuation character.
    Literal {
        text: String,
    },
    LineBreak {
        soft: bool,
    },
    InlineHtml {
        html: String,
    },
    CodeSpan {
        text: String,
    },
    Emphasis {
        children: Vec<Inline>,
    },
    StrongEmphasis {
        children: Vec<Inline>,
    },
    Link {
        dest: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        dest: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    AutoLink {
        dest: String,
        children: Vec<Inline>,
    },
    Custom {
        name: String,
        text: String,
    },
}

impl Inline {
    pub fn kind_name(&self) -> &str {
        match self {
            Inline::RawText { .. } => "raw_text",
            Inline::Literal { .. } => "literal",
            Inline::LineBreak { .. } => "line_break",
            Inline::InlineHtml { .. } => "inline_html",
            Inline::CodeSpan { .. } => "code_span",
            Inline::Emphasis { .. } => "emphasis",
            Inline::StrongEmphasis { .. } => "strong_emphasis",
            Inline::Link { .. } => "link",
            Inline::Image { .. } => "image",
            Inline::AutoLink { .. } => "auto_link",
            Inline::Custom { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[Inline] {
        match self {
            Inline::Emphasis { children }
            | Inline::StrongEmphasis { children }
            | Inline::Link { children, .. }
            | Inline::Image { children, .. }
            | Inline::AutoLink { children, .. } => children,
            _ => &[],
        }
    }

    pub(crate) fn set_children(&mut self, new: Vec<Inline>) {
        match self {
            Inline::Emphasis { children }
            | Inline::StrongEmphasis { children }
            | Inline::Link { children, .. }
            | Inline::Image { children, .. }
            | Inline::AutoLink { children, .. } => *children = new,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_kind_names() {
        assert_eq!(Block::ThematicBreak.kind_name(), "thematic_break");
        let heading = Block::Heading {
            level: 1,
            body: InlineBody::Raw(String::from("x")),
        };
        assert_eq!(heading.kind_name(), "heading");
        assert_eq!(Inline::LineBreak { soft: true }.kind_name(), "line_break");
    }

    #[test]
    fn smoke_test_serialize_tags_elements() {
        let block = Block::FencedCode {
            lang: String::from("rust"),
            extra: String::new(),
            text: String::from("fn main() {}\n"),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["element"], "fenced_code");
        assert_eq!(json["lang"], "rust");
    }
}
