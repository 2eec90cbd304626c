// Two-phase parser: block dispatch over a priority registry, then inline
// parsing once every link reference definition has been collected.

pub mod blocks;
pub mod inlines;
pub mod shared;

use crate::ast::{Block, Document, InlineBody};
use crate::markdown::SetupError;
use crate::source::{Source, State};
use blocks::{BlockDef, ParseInfo};
use inlines::{InlineContext, InlineDef};

pub struct Parser {
    block_defs: Vec<BlockDef>,
    inline_defs: Vec<InlineDef>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A parser with all CommonMark elements registered.
    pub fn new() -> Self {
        let mut parser = Parser {
            block_defs: blocks::defaults(),
            inline_defs: inlines::defaults(),
        };
        parser.sort_blocks();
        parser
    }

    fn sort_blocks(&mut self) {
        // stable: registration order decides among equal priorities
        self.block_defs.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    pub fn add_block(&mut self, def: BlockDef) -> Result<(), SetupError> {
        if let Some(base) = def.replaces {
            let slot = self
                .block_defs
                .iter_mut()
                .find(|d| d.name == base)
                .ok_or_else(|| SetupError::UnknownBase(base.to_string()))?;
            *slot = BlockDef { name: base, ..def };
        } else {
            self.block_defs.push(def);
        }
        self.sort_blocks();
        Ok(())
    }

    pub fn add_inline(&mut self, def: InlineDef) -> Result<(), SetupError> {
        if let Some(base) = def.replaces {
            let slot = self
                .inline_defs
                .iter_mut()
                .find(|d| d.name == base)
                .ok_or_else(|| SetupError::UnknownBase(base.to_string()))?;
            *slot = InlineDef { name: base, ..def };
        } else {
            self.inline_defs.push(def);
        }
        Ok(())
    }

    pub(crate) fn lookup_block(&self, name: &str) -> Option<&BlockDef> {
        self.block_defs.iter().find(|d| d.name == name)
    }

    /// Side-effect-free probe used by paragraph interruption checks.
    pub(crate) fn block_matches(&self, name: &str, source: &mut Source) -> bool {
        self.block_match_info(name, source).is_some()
    }

    pub(crate) fn block_match_info(&self, name: &str, source: &mut Source) -> Option<ParseInfo> {
        let def = self.lookup_block(name)?;
        (def.matches)(self, source)
    }

    /// Parse a full document: the block phase under the document state,
    /// then the deferred inline phase.
    pub fn parse(&self, text: &str) -> Document {
        let mut source = Source::new(text);
        log::info!("starting parse: {} bytes", source.buffer().len());
        let children = source.under_state(State::document(), |src| self.parse_source(src));
        log::debug!("parsed {} top-level blocks", children.len());
        let mut document = Document {
            children,
            link_ref_defs: std::mem::take(&mut source.link_ref_defs),
        };
        self.parse_inline_tree(&mut document);
        document
    }

    /// The block dispatch loop: highest-priority match wins; no match
    /// returns control to the enclosing container.
    pub fn parse_source(&self, source: &mut Source) -> Vec<Block> {
        const MAX_DEPTH: usize = 100;
        if source.states_depth() > MAX_DEPTH {
            log::warn!("maximum container depth reached, stopping descent");
            return Vec::new();
        }
        let mut ast: Vec<Block> = Vec::new();
        let mut last_pos = usize::MAX;
        let mut stalled = 0u32;
        while !source.exhausted() {
            // progress guard against a degenerate element that consumes
            // nothing
            if source.pos == last_pos {
                stalled += 1;
                if stalled > 2 {
                    log::warn!("block parser stalled at byte {}", source.pos);
                    break;
                }
            } else {
                stalled = 0;
                last_pos = source.pos;
            }
            let mut matched = false;
            for def in &self.block_defs {
                if def.is_virtual {
                    continue;
                }
                if let Some(info) = (def.matches)(self, source) {
                    log::trace!("block {} matched at byte {}", def.name, source.pos);
                    ast.push((def.parse)(self, source, info));
                    matched = true;
                    break;
                }
            }
            if !matched {
                break;
            }
        }
        ast
    }

    /// Phase two: replace every deferred inline body with parsed inline
    /// children. The definitions map is detached for the walk so the tree
    /// can be mutated freely.
    fn parse_inline_tree(&self, document: &mut Document) {
        let defs = std::mem::take(&mut document.link_ref_defs);
        {
            let ctx = InlineContext {
                link_ref_defs: &defs,
            };
            for child in document.children.iter_mut() {
                self.parse_inline_block(child, &ctx);
            }
        }
        document.link_ref_defs = defs;
    }

    fn parse_inline_block(&self, block: &mut Block, ctx: &InlineContext) {
        match block {
            Block::Paragraph { body, .. }
            | Block::Heading { body, .. }
            | Block::SetextHeading { body, .. } => {
                if let InlineBody::Raw(text) = body {
                    let text = std::mem::take(text);
                    *body = InlineBody::Parsed(inlines::parse(&text, &self.inline_defs, ctx));
                }
            }
            Block::Quote { children }
            | Block::List { children, .. }
            | Block::ListItem { children, .. }
            | Block::Custom { children, .. } => {
                for child in children.iter_mut() {
                    self.parse_inline_block(child, ctx);
                }
            }
            _ => {}
        }
    }
}
