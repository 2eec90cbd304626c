// Extensions: extra element kinds and renderer handler overrides

use crate::parser::blocks::BlockDef;
use crate::parser::inlines::InlineDef;
use crate::render::RenderFn;

/// What an extension contributes: block kinds, inline kinds, and render
/// handlers keyed by kind name (CamelCase, as registered). A def whose
/// `replaces` names a base kind swaps that registry entry instead of
/// adding a new one.
pub struct Extension {
    pub name: &'static str,
    pub blocks: Vec<BlockDef>,
    pub inlines: Vec<InlineDef>,
    pub handlers: Vec<(&'static str, RenderFn)>,
}

impl Extension {
    pub fn new(name: &'static str) -> Self {
        Extension {
            name,
            blocks: Vec::new(),
            inlines: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn with_block(mut self, def: BlockDef) -> Self {
        self.blocks.push(def);
        self
    }

    pub fn with_inline(mut self, def: InlineDef) -> Self {
        self.inlines.push(def);
        self
    }

    pub fn with_handler(mut self, kind: &'static str, handler: RenderFn) -> Self {
        self.handlers.push((kind, handler));
        self
    }
}
