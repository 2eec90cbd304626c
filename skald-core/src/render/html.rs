// HTML output generator

use std::collections::HashMap;

use super::{ElementRef, RenderFn, Renderer};
use crate::ast::{Block, Document, Inline, InlineBody};

pub struct HtmlRenderer {
    handlers: HashMap<String, RenderFn>,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, document: &Document) -> String {
        log::info!("starting html render: {} blocks", document.children.len());
        if let Some(handler) = self.handlers.get("document") {
            return handler(self, ElementRef::Document(document));
        }
        self.render_blocks(&document.children)
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer {
            handlers: HashMap::new(),
        }
    }

    /// A renderer with extension handlers that take precedence over the
    /// built-in rules, keyed by snake_case kind name.
    pub fn with_handlers(handlers: HashMap<String, RenderFn>) -> Self {
        HtmlRenderer { handlers }
    }

    pub fn render_blocks(&self, blocks: &[Block]) -> String {
        blocks.iter().map(|b| self.render_block(b)).collect()
    }

    pub fn render_inlines(&self, inlines: &[Inline]) -> String {
        inlines.iter().map(|i| self.render_inline(i)).collect()
    }

    pub fn render_body(&self, body: &InlineBody) -> String {
        match body {
            InlineBody::Parsed(children) => self.render_inlines(children),
            // a body that never went through the inline phase degrades to
            // escaped text
            InlineBody::Raw(text) => escape_html(text),
        }
    }

    pub fn render_block(&self, block: &Block) -> String {
        if let Some(handler) = self.handlers.get(block.kind_name()) {
            return handler(self, ElementRef::Block(block));
        }
        match block {
            Block::BlankLine { .. } | Block::LinkRefDef => String::new(),
            Block::Heading { level, body } | Block::SetextHeading { level, body } => {
                format!("<h{level}>{}</h{level}>\n", self.render_body(body))
            }
            Block::CodeBlock { text } => {
                format!("<pre><code>{}</code></pre>\n", escape_html(text))
            }
            Block::FencedCode { lang, text, .. } => {
                let class = if lang.is_empty() {
                    String::new()
                } else {
                    format!(" class=\"language-{}\"", escape_html(lang))
                };
                format!("<pre><code{class}>{}</code></pre>\n", escape_html(text))
            }
            Block::ThematicBreak => String::from("<hr />\n"),
            Block::HtmlBlock { body } => body.clone(),
            Block::Paragraph { body, tight } => {
                if *tight {
                    self.render_body(body)
                } else {
                    format!("<p>{}</p>\n", self.render_body(body))
                }
            }
            Block::Quote { children } => {
                format!("<blockquote>\n{}</blockquote>\n", self.render_blocks(children))
            }
            Block::List {
                ordered,
                start,
                children,
                ..
            } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let extra = if *ordered && *start != 1 {
                    format!(" start=\"{start}\"")
                } else {
                    String::new()
                };
                format!("<{tag}{extra}>\n{}</{tag}>\n", self.render_blocks(children))
            }
            Block::ListItem { children, .. } => {
                let sole_tight_paragraph = children.len() == 1
                    && matches!(children[0], Block::Paragraph { tight: true, .. });
                let sep = if sole_tight_paragraph { "" } else { "\n" };
                format!("<li>{sep}{}</li>\n", self.render_blocks(children))
            }
            Block::Custom { children, .. } => self.render_blocks(children),
        }
    }

    pub fn render_inline(&self, inline: &Inline) -> String {
        if let Some(handler) = self.handlers.get(inline.kind_name()) {
            return handler(self, ElementRef::Inline(inline));
        }
        match inline {
            Inline::RawText { text } | Inline::Literal { text } => escape_html(text),
            Inline::LineBreak { soft } => {
                if *soft {
                    String::from("\n")
                } else {
                    String::from("<br />\n")
                }
            }
            Inline::InlineHtml { html } => html.clone(),
            Inline::CodeSpan { text } => format!("<code>{}</code>", escape_html(text)),
            Inline::Emphasis { children } => format!("<em>{}</em>", self.render_inlines(children)),
            Inline::StrongEmphasis { children } => {
                format!("<strong>{}</strong>", self.render_inlines(children))
            }
            Inline::Link {
                dest,
                title,
                children,
            } => self.render_link(dest, title.as_deref(), children),
            Inline::AutoLink { dest, children } => self.render_link(dest, None, children),
            Inline::Image { dest, title, children } => {
                let title_attr = title
                    .as_ref()
                    .map(|t| format!(" title=\"{}\"", escape_html(t)))
                    .unwrap_or_default();
                let alt: String = children.iter().map(|c| self.render_plain(c)).collect();
                format!(
                    "<img src=\"{}\" alt=\"{alt}\"{title_attr} />",
                    escape_url(dest)
                )
            }
            Inline::Custom { text, .. } => escape_html(text),
        }
    }

    fn render_link(&self, dest: &str, title: Option<&str>, children: &[Inline]) -> String {
        let title_attr = title
            .map(|t| format!(" title=\"{}\"", escape_html(t)))
            .unwrap_or_default();
        format!(
            "<a href=\"{}\"{title_attr}>{}</a>",
            escape_url(dest),
            self.render_inlines(children)
        )
    }

    /// Alt-text rendering: descendant text only, escaped, no markup.
    pub fn render_plain(&self, inline: &Inline) -> String {
        match inline {
            Inline::RawText { text }
            | Inline::Literal { text }
            | Inline::CodeSpan { text }
            | Inline::InlineHtml { html: text }
            | Inline::Custom { text, .. } => escape_html(text),
            Inline::LineBreak { .. } => String::from("\n"),
            other => other.children().iter().map(|c| self.render_plain(c)).collect(),
        }
    }
}

/// HTML-escape `&`, `<`, `>`, and `"`. Apostrophes pass through.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a destination, keeping the characters CommonMark output
/// leaves intact, then HTML-escape the result.
pub fn escape_url(raw: &str) -> String {
    const SAFE: &[u8] = b"/#:()*?=%@+,&";
    let mut out = String::with_capacity(raw.len());
    for &b in raw.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'~') || SAFE.contains(&b)
        {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    escape_html(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_escape_html_leaves_apostrophes() {
        assert_eq!(escape_html("a & b < c > d \" e ' f"), "a &amp; b &lt; c &gt; d &quot; e ' f");
    }

    #[test]
    fn smoke_test_escape_url() {
        assert_eq!(escape_url("/url?a=1&b=2"), "/url?a=1&amp;b=2");
        assert_eq!(escape_url("/my url"), "/my%20url");
        // existing percent escapes survive
        assert_eq!(escape_url("/a%20b"), "/a%20b");
        // non-ascii goes out as utf-8 percent escapes
        assert_eq!(escape_url("/ä"), "/%C3%A4");
    }

    #[test]
    fn smoke_test_tight_paragraph_unwrapped() {
        let renderer = HtmlRenderer::new();
        let tight = Block::Paragraph {
            body: InlineBody::Parsed(vec![Inline::RawText {
                text: String::from("x"),
            }]),
            tight: true,
        };
        assert_eq!(renderer.render_block(&tight), "x");
    }

    #[test]
    fn smoke_test_ordered_list_start_attribute() {
        let renderer = HtmlRenderer::new();
        let list = Block::List {
            bullet: String::from("3."),
            ordered: true,
            start: 3,
            tight: true,
            children: Vec::new(),
        };
        assert_eq!(renderer.render_block(&list), "<ol start=\"3\">\n</ol>\n");
    }

    #[test]
    fn smoke_test_image_alt_is_plain_text() {
        let renderer = HtmlRenderer::new();
        let image = Inline::Image {
            dest: String::from("/img.png"),
            title: None,
            children: vec![Inline::Emphasis {
                children: vec![Inline::RawText {
                    text: String::from("alt"),
                }],
            }],
        };
        assert_eq!(
            renderer.render_inline(&image),
            "<img src=\"/img.png\" alt=\"alt\" />"
        );
    }
}
