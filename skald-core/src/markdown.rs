// The Markdown bundle: a parser and a renderer behind one value

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::ast::Document;
use crate::extension::Extension;
use crate::parser::shared::camel_to_snake_case;
use crate::parser::Parser;
use crate::render::{HtmlRenderer, RenderFn, Renderer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("unable to register more extensions after setup done")]
    SetupDone,
    #[error("no element named `{0}` to override")]
    UnknownBase(String),
}

/// Converts markdown documents. Extensions must be registered before the
/// first parse; afterwards the registries are frozen.
pub struct Markdown {
    parser: Parser,
    handlers: HashMap<String, RenderFn>,
    setup_done: AtomicBool,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown {
    pub fn new() -> Self {
        Markdown {
            parser: Parser::new(),
            handlers: HashMap::new(),
            setup_done: AtomicBool::new(false),
        }
    }

    /// Register an extension's elements and render handlers.
    pub fn use_extension(&mut self, extension: Extension) -> Result<(), SetupError> {
        if self.setup_done.load(Ordering::Relaxed) {
            return Err(SetupError::SetupDone);
        }
        log::debug!("registering extension {}", extension.name);
        for def in extension.blocks {
            self.parser.add_block(def)?;
        }
        for def in extension.inlines {
            self.parser.add_inline(def)?;
        }
        for (kind, handler) in extension.handlers {
            self.handlers.insert(camel_to_snake_case(kind), handler);
        }
        Ok(())
    }

    /// Parse text into a document. Never fails: unparseable constructs
    /// degrade to paragraphs and raw text.
    pub fn parse(&self, text: &str) -> Document {
        self.setup_done.store(true, Ordering::Relaxed);
        self.parser.parse(text)
    }

    pub fn render(&self, document: &Document) -> String {
        let mut renderer = HtmlRenderer::with_handlers(self.handlers.clone());
        renderer.render(document)
    }

    pub fn convert(&self, text: &str) -> String {
        self.render(&self.parse(text))
    }
}

/// Parse with the default element set.
pub fn parse(text: &str) -> Document {
    Markdown::new().parse(text)
}

/// Render a parsed document to HTML with the default rules.
pub fn render(document: &Document) -> String {
    Markdown::new().render(document)
}

/// Parse and render in one step.
pub fn convert(text: &str) -> String {
    Markdown::new().convert(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_convert() {
        assert_eq!(convert("# Hello\n"), "<h1>Hello</h1>\n");
    }

    #[test]
    fn smoke_test_use_after_parse_fails() {
        let mut markdown = Markdown::new();
        markdown.convert("abc\n");
        let err = markdown.use_extension(Extension::new("late")).unwrap_err();
        assert_eq!(err, SetupError::SetupDone);
    }

    #[test]
    fn smoke_test_unknown_override_target() {
        use crate::parser::blocks::BlockDef;
        let mut markdown = Markdown::new();
        let def = BlockDef {
            name: "Shiny",
            priority: 5,
            is_virtual: false,
            replaces: Some("NoSuchElement"),
            matches: |_, _| None,
            parse: |_, _, _| unreachable!(),
        };
        let err = markdown
            .use_extension(Extension::new("broken").with_block(def))
            .unwrap_err();
        assert_eq!(err, SetupError::UnknownBase(String::from("NoSuchElement")));
    }
}
