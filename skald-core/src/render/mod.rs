// Renderer dispatch: a visitor over the element tree

pub mod html;

pub use html::{escape_html, escape_url, HtmlRenderer};

use crate::ast::{Block, Document, Inline};

/// A renderer walks the document and produces its textual form. Kinds
/// without a dedicated rule fall back to concatenating their children.
pub trait Renderer {
    fn render(&mut self, document: &Document) -> String;
}

/// Borrowed element handed to override handlers.
#[derive(Clone, Copy)]
pub enum ElementRef<'a> {
    Document(&'a Document),
    Block(&'a Block),
    Inline(&'a Inline),
}

/// An override handler: receives the renderer for recursion and the
/// element to render. Registered under the element's snake_case kind name.
pub type RenderFn = fn(&HtmlRenderer, ElementRef<'_>) -> String;
