// Source buffer: cursor, container-state stack, and prefix matching

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::LinkRefDefs;
use crate::parser::shared::expand_tabs;

static TRAILING_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ +$").unwrap());
static BLANK_PROBE: Lazy<String> = Lazy::new(|| " ".repeat(999));

/// Normalize line endings, clear whitespace-only lines, and guarantee a
/// final newline before parsing begins.
pub fn preprocess(text: &str) -> String {
    let mut out = TRAILING_SPACES
        .replace_all(&text.replace("\r\n", "\n"), "")
        .into_owned();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// What kind of container pushed this state. `List` carries the data its
/// items need to check bullet compatibility.
#[derive(Debug, Clone, PartialEq)]
pub enum StateKind {
    Document,
    Quote,
    List { bullet: String, ordered: bool },
    ListItem,
}

/// One entry of the container stack. `prefix` is a regex fragment stripped
/// from every interior line; a state with a `second_prefix` switches to it
/// after its first line is consumed.
#[derive(Debug, Clone)]
pub struct State {
    pub kind: StateKind,
    prefix: String,
    second_prefix: Option<String>,
}

impl State {
    pub fn document() -> Self {
        State {
            kind: StateKind::Document,
            prefix: String::new(),
            second_prefix: None,
        }
    }

    pub fn quote() -> Self {
        State {
            kind: StateKind::Quote,
            // prefixes run against tab-expanded lines, so a plain space
            // covers the optional marker gap
            prefix: String::from(" {0,3}> ?"),
            second_prefix: None,
        }
    }

    pub fn list(bullet: String, ordered: bool) -> Self {
        State {
            kind: StateKind::List { bullet, ordered },
            prefix: String::new(),
            second_prefix: None,
        }
    }

    /// Item state whose first line still carries the bullet. After that
    /// line the prefix becomes the continuation indent.
    pub fn list_item(indent: usize, bullet: &str, mid: usize) -> Self {
        State {
            kind: StateKind::ListItem,
            prefix: format!(
                "{}{}{}",
                " ".repeat(indent),
                regex::escape(bullet),
                " ".repeat(mid)
            ),
            second_prefix: Some(" ".repeat(indent + bullet.len() + mid.max(1))),
        }
    }

    /// Item state for an item whose bullet line was already consumed.
    pub fn list_item_continued(indent: usize, bullet: &str, mid: usize) -> Self {
        State {
            kind: StateKind::ListItem,
            prefix: " ".repeat(indent + bullet.len() + mid.max(1)),
            second_prefix: None,
        }
    }
}

/// A stored regex match with absolute byte offsets into the source buffer.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    pub start: usize,
    pub end: usize,
    groups: Vec<Option<(usize, usize)>>,
}

impl MatchInfo {
    /// Span of capture group `i`; group 0 is the whole match.
    pub fn group(&self, i: usize) -> Option<(usize, usize)> {
        if i == 0 {
            Some((self.start, self.end))
        } else {
            self.groups.get(i - 1).copied().flatten()
        }
    }
}

/// Wrapper over the content being parsed: a position cursor, the active
/// container states, a match slot, and an anchor for speculative parsing.
pub struct Source {
    buffer: String,
    pub pos: usize,
    anchor: usize,
    states: Vec<State>,
    prefix_cache: HashMap<String, Regex>,
    last_match: Option<MatchInfo>,
    /// Link reference definitions collected during the block phase; moved
    /// onto the `Document` when parsing finishes.
    pub link_ref_defs: LinkRefDefs,
}

impl Source {
    pub fn new(text: &str) -> Self {
        Source {
            buffer: preprocess(text),
            pos: 0,
            anchor: 0,
            states: Vec::new(),
            prefix_cache: HashMap::new(),
            last_match: None,
            link_ref_defs: LinkRefDefs::new(),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The remaining unparsed source.
    pub fn rest(&self) -> &str {
        &self.buffer[self.pos..]
    }

    pub fn text(&self, span: (usize, usize)) -> &str {
        &self.buffer[span.0..span.1]
    }

    pub fn text_from(&self, start: usize) -> &str {
        &self.buffer[start..]
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// The innermost container state. Panics when the stack is empty; the
    /// parser always runs under at least the document state.
    pub fn state(&self) -> &State {
        self.states.last().expect("state stack is empty")
    }

    pub fn push_state(&mut self, state: State) {
        self.states.push(state);
    }

    pub fn pop_state(&mut self) -> State {
        self.states.pop().expect("state stack is empty")
    }

    /// Run `f` with `state` temporarily on top of the stack. The pop is
    /// unconditional, so the stack stays balanced on every return path.
    pub fn under_state<T>(&mut self, state: State, f: impl FnOnce(&mut Source) -> T) -> T {
        self.push_state(state);
        let out = f(self);
        self.pop_state();
        out
    }

    pub fn states_depth(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn snapshot_states(&self) -> Vec<State> {
        self.states.clone()
    }

    pub(crate) fn restore_states(&mut self, states: Vec<State>) {
        self.states = states;
    }

    fn prefix_string(&self) -> String {
        self.states.iter().map(|s| s.prefix.as_str()).collect()
    }

    fn match_prefix_here(&mut self, line: &str) -> Option<(usize, usize)> {
        let prefix = self.prefix_string();
        let re = self
            .prefix_cache
            .entry(prefix.clone())
            .or_insert_with(|| {
                Regex::new(&format!(r"\A(?:{prefix})")).expect("invalid container prefix")
            });
        match_prefix(re, line)
    }

    /// The next line including its trailing newline, without prefix
    /// handling. Empty at the end of input.
    pub fn peek_line_raw(&self) -> &str {
        if self.pos >= self.buffer.len() {
            return "";
        }
        match self.buffer[self.pos..].find('\n') {
            Some(i) => &self.buffer[self.pos..self.pos + i + 1],
            None => &self.buffer[self.pos..],
        }
    }

    /// The next line with the container prefix stripped, or `None` when the
    /// prefix no longer matches. Columns left over from a tab straddling
    /// the prefix boundary are padded back as spaces.
    pub fn next_line(&mut self) -> Option<String> {
        let line = self.peek_line_raw().to_string();
        let (plen, overshoot) = self.match_prefix_here(&line)?;
        let mut stripped = String::with_capacity(line.len() - plen + overshoot);
        stripped.extend(std::iter::repeat(' ').take(overshoot));
        stripped.push_str(&line[plen..]);
        Some(stripped)
    }

    /// `next_line` plus consuming it and switching continuation prefixes.
    pub fn next_line_consume(&mut self) -> Option<String> {
        let line = self.next_line()?;
        self.advance_line();
        Some(line)
    }

    /// Consume the next raw line without prefix handling.
    pub fn advance_line(&mut self) {
        let len = self.peek_line_raw().len();
        self.pos += len;
        self.update_prefix();
    }

    /// After stripping the container prefix, test `re` at the current
    /// position. A successful match is stored for `consume`.
    pub fn expect_re(&mut self, re: &Regex) -> Option<MatchInfo> {
        let line = self.peek_line_raw().to_string();
        let (plen, _) = self.match_prefix_here(&line)?;
        self.anchor = self.pos;
        let start = self.pos + plen;
        let caps = re.captures(&self.buffer[start..])?;
        let whole = caps.get(0).expect("group 0 always present");
        debug_assert_eq!(whole.start(), 0, "element patterns must be \\A-anchored");
        let info = MatchInfo {
            start: start + whole.start(),
            end: start + whole.end(),
            groups: (1..caps.len())
                .map(|i| caps.get(i).map(|g| (start + g.start(), start + g.end())))
                .collect(),
        };
        self.last_match = Some(info.clone());
        Some(info)
    }

    /// Advance past the match stored by the last successful `expect_re`.
    /// When the match swallowed a newline, every state with a pending
    /// continuation prefix transitions to it.
    pub fn consume(&mut self) {
        let m = self
            .last_match
            .take()
            .expect("consume without a stored match");
        self.pos = m.end;
        if self.buffer[..m.end].ends_with('\n') {
            self.update_prefix();
        }
    }

    pub fn anchor(&mut self) {
        self.anchor = self.pos;
    }

    pub fn reset(&mut self) {
        self.pos = self.anchor;
    }

    fn update_prefix(&mut self) {
        for s in &mut self.states {
            if let Some(second) = s.second_prefix.take() {
                s.prefix = second;
            }
        }
    }
}

/// Check a line against a compiled prefix and return the byte length of the
/// matched prefix plus the column overshoot of a straddling tab. Blank
/// lines degenerately satisfy any prefix made of spaces.
fn match_prefix(re: &Regex, line: &str) -> Option<(usize, usize)> {
    if line.trim().is_empty() && re.is_match(&BLANK_PROBE) {
        return Some((0, 0));
    }
    let expanded = expand_tabs(line);
    let m = re.find(&expanded)?;
    let end = m.end();
    if end == 0 {
        return Some((0, 0));
    }
    let mut col = 0usize;
    for (idx, ch) in line.char_indices() {
        col += if ch == '\t' { 4 - col % 4 } else { 1 };
        if col >= end {
            return Some((idx + ch.len_utf8(), col - end));
        }
    }
    None
}
