// skald core library - CommonMark parser, element registries, renderers

// Core modules: source → parser → AST → renderer
pub mod ast;
pub mod cache;
pub mod extension;
pub mod markdown;
pub mod parser;
pub mod render;
pub mod source;

// Re-export main API
pub use ast::{Block, Document, Inline, InlineBody, LinkRefDef};
pub use cache::ParserCache;
pub use extension::Extension;
pub use markdown::{convert, parse, render, Markdown, SetupError};
pub use parser::Parser;
pub use render::{escape_html, escape_url, ElementRef, HtmlRenderer, RenderFn, Renderer};
pub use source::Source;
