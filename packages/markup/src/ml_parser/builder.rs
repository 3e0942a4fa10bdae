//! Syntax Builder
//!
//! Token cursor plus the marker protocol used to grow a syntax tree lazily.
//!
//! The builder keeps an append-only log of tokens and a cursor into it. Every
//! marker records a `Start` production when opened and a `Done` production
//! when sealed. Productions live in an arena of intrusively linked slots, so
//! sealing a marker *before* another one, or making a marker *precede*
//! another, is an O(1) splice. Rolling back resets the cursor and unlinks
//! every production recorded after the marker's start; sealed productions are
//! never rewritten. [`SyntaxBuilder::finish`] replays the production list into
//! a [`SyntaxTree`].

use super::ast::{NodeId, NodeKind, SyntaxTree};
use super::messages::ParseMessage;
use super::tokens::{Token, TokenType};
use crate::parse_util::TextRange;

/// Handle to an open span of the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerState {
    Open,
    Done,
    Dropped,
    RolledBack,
}

#[derive(Debug)]
struct MarkerData {
    /// Lexeme index of the first token
    start: usize,
    /// Lexeme index one past the last token
    end: usize,
    kind: Option<NodeKind>,
    state: MarkerState,
    start_slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Production {
    Start(Marker),
    Done(Marker),
}

#[derive(Debug)]
struct Slot {
    production: Production,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct SyntaxBuilder {
    text: String,
    tokens: Vec<Token>,
    pos: usize,
    markers: Vec<MarkerData>,
    slots: Vec<Slot>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Open markers in production order; only the last one may be sealed
    open: Vec<Marker>,
}

impl SyntaxBuilder {
    pub fn new(text: String, tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.iter().all(|t| t.range.end <= text.len()),
            "token ranges exceed the source text"
        );
        let mut builder = SyntaxBuilder {
            text,
            tokens,
            pos: 0,
            markers: Vec::new(),
            slots: Vec::new(),
            head: None,
            tail: None,
            open: Vec::new(),
        };
        builder.skip_whitespace();
        builder
    }

    // Token cursor

    /// Current token type, `None` at end of input
    pub fn token(&self) -> Option<TokenType> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    pub fn token_text(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|t| t.text(&self.text))
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn advance(&mut self) {
        if !self.eof() {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    /// Change the type of the current token; the change sticks across rollbacks
    pub fn remap_current_token(&mut self, kind: TokenType) {
        if let Some(token) = self.tokens.get_mut(self.pos) {
            log::trace!(
                target: "markup.parser",
                "remapping {:?} to {:?} at {}",
                token.kind,
                kind,
                token.range
            );
            token.kind = kind;
        }
        self.skip_whitespace();
    }

    /// Byte offset of the current token, or the text length at end of input
    pub fn current_offset(&self) -> usize {
        self.offset_of(self.pos)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn skip_whitespace(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_skipped_whitespace())
        {
            self.pos += 1;
        }
    }

    fn offset_of(&self, lexeme: usize) -> usize {
        self.tokens
            .get(lexeme)
            .map_or(self.text.len(), |t| t.range.start)
    }

    /// Move `end` back over skipped whitespace, never before `floor`
    fn back_off(&self, mut end: usize, floor: usize) -> usize {
        while end > floor && self.tokens[end - 1].kind.is_skipped_whitespace() {
            end -= 1;
        }
        end
    }

    /// Trailing whitespace is left to the parent, but a node never ends
    /// before the production recorded right before its `Done`
    fn last_production_lexeme(&self, slot: Option<usize>, start: usize) -> usize {
        let lexeme = slot.map_or(start, |slot| match self.slots[slot].production {
            Production::Start(m) => self.markers[m.0].start,
            Production::Done(m) => self.markers[m.0].end,
        });
        lexeme.max(start)
    }

    // Markers

    pub fn mark(&mut self) -> Marker {
        let marker = Marker(self.markers.len());
        let slot = self.push_slot(Production::Start(marker));
        self.markers.push(MarkerData {
            start: self.pos,
            end: self.pos,
            kind: None,
            state: MarkerState::Open,
            start_slot: slot,
        });
        self.open.push(marker);
        marker
    }

    /// Open a new marker starting exactly where `marker` starts, enclosing it
    pub fn precede(&mut self, marker: Marker) -> Marker {
        self.expect_state(marker, &[MarkerState::Open, MarkerState::Done]);
        let anchor = self.markers[marker.0].start_slot;
        let preceding = Marker(self.markers.len());
        let slot = self.insert_slot_before(anchor, Production::Start(preceding));
        self.markers.push(MarkerData {
            start: self.markers[marker.0].start,
            end: self.markers[marker.0].start,
            kind: None,
            state: MarkerState::Open,
            start_slot: slot,
        });
        let index = match self.markers[marker.0].state {
            MarkerState::Open => self.open_index(marker),
            _ => self.first_open_after(anchor).and_then(|next| self.open_index(next)),
        };
        self.open.insert(index.unwrap_or(self.open.len()), preceding);
        preceding
    }

    /// Seal the marker as a node covering every token advanced since it opened
    pub fn done(&mut self, marker: Marker, kind: NodeKind) {
        self.expect_state(marker, &[MarkerState::Open]);
        match self.open.last() {
            Some(&top) if top == marker => {
                self.open.pop();
            }
            top => panic!("marker {:?} is sealed while {:?} is still open", marker, top),
        }
        let floor = self.last_production_lexeme(self.tail, self.markers[marker.0].start);
        let end = self.back_off(self.pos, floor);
        let data = &mut self.markers[marker.0];
        data.end = end;
        data.kind = Some(kind);
        data.state = MarkerState::Done;
        self.push_slot(Production::Done(marker));
    }

    /// Seal the marker so that it ends right where `before` starts
    pub fn done_before(&mut self, marker: Marker, kind: NodeKind, before: Marker) {
        self.expect_state(marker, &[MarkerState::Open]);
        self.expect_state(before, &[MarkerState::Open, MarkerState::Done]);
        let start = self.markers[marker.0].start;
        let before_start = self.markers[before.0].start;
        assert!(
            before_start >= start,
            "marker {:?} cannot end before {:?}, which starts earlier",
            marker,
            before
        );
        self.close_before(marker, before);
        let anchor = self.markers[before.0].start_slot;
        let floor = self.last_production_lexeme(self.slots[anchor].prev, start);
        let end = self.back_off(before_start, floor);
        let data = &mut self.markers[marker.0];
        data.end = end;
        data.kind = Some(kind);
        data.state = MarkerState::Done;
        self.insert_slot_before(anchor, Production::Done(marker));
    }

    pub fn error(&mut self, marker: Marker, message: ParseMessage) {
        self.done(marker, NodeKind::Error(message));
    }

    pub fn error_before(&mut self, marker: Marker, message: ParseMessage, before: Marker) {
        self.done_before(marker, NodeKind::Error(message), before);
    }

    /// Zero-width error at the current position
    pub fn error_here(&mut self, message: ParseMessage) {
        let marker = self.mark();
        self.error(marker, message);
    }

    /// Discard the marker; its tokens stay with the enclosing marker
    pub fn drop_marker(&mut self, marker: Marker) {
        self.expect_state(marker, &[MarkerState::Open]);
        let slot = self.markers[marker.0].start_slot;
        self.unlink_slot(slot);
        self.markers[marker.0].state = MarkerState::Dropped;
        if let Some(index) = self.open_index(marker) {
            self.open.remove(index);
        }
    }

    /// Discard the marker, every production recorded after it, and every
    /// token advance since it was opened
    pub fn rollback_to(&mut self, marker: Marker) {
        self.expect_state(marker, &[MarkerState::Open]);
        let data = &self.markers[marker.0];
        let first = data.start_slot;
        self.pos = data.start;

        let new_tail = self.slots[first].prev;
        let mut cursor = Some(first);
        while let Some(slot) = cursor {
            if let Production::Start(discarded) = self.slots[slot].production {
                self.markers[discarded.0].state = MarkerState::RolledBack;
            }
            cursor = self.slots[slot].next;
        }
        match new_tail {
            Some(prev) => self.slots[prev].next = None,
            None => self.head = None,
        }
        self.tail = new_tail;
        if let Some(index) = self.open_index(marker) {
            self.open.truncate(index);
        }

        log::trace!(target: "markup.parser", "rolled back to offset {}", self.current_offset());
    }

    pub fn is_open(&self, marker: Marker) -> bool {
        self.markers[marker.0].state == MarkerState::Open
    }

    fn expect_state(&self, marker: Marker, allowed: &[MarkerState]) {
        let state = self.markers[marker.0].state;
        assert!(
            allowed.contains(&state),
            "marker {:?} is {:?}, expected one of {:?}",
            marker,
            state,
            allowed
        );
    }

    fn open_index(&self, marker: Marker) -> Option<usize> {
        self.open.iter().rposition(|&open| open == marker)
    }

    /// Take `marker` off the open stack so it can end where `before` starts.
    /// Markers above it must start at or after `before`.
    fn close_before(&mut self, marker: Marker, before: Marker) {
        let Some(index) = self.open_index(marker) else {
            return;
        };
        if let Some(&next) = self.open.get(index + 1) {
            let nested = if self.markers[before.0].state == MarkerState::Open {
                next != before
            } else {
                self.precedes(next, before)
            };
            assert!(
                !nested,
                "marker {:?} is sealed while {:?} is still open",
                marker,
                next
            );
        }
        self.open.remove(index);
    }

    /// First open marker whose `Start` follows `slot`
    fn first_open_after(&self, slot: usize) -> Option<Marker> {
        let mut cursor = self.slots[slot].next;
        while let Some(id) = cursor {
            if let Production::Start(m) = self.slots[id].production {
                if self.markers[m.0].state == MarkerState::Open {
                    return Some(m);
                }
            }
            cursor = self.slots[id].next;
        }
        None
    }

    /// Whether `open` starts before `before` in production order
    fn precedes(&self, open: Marker, before: Marker) -> bool {
        let stop = self.markers[before.0].start_slot;
        let mut cursor = self.slots[self.markers[open.0].start_slot].next;
        while let Some(id) = cursor {
            if id == stop {
                return true;
            }
            cursor = self.slots[id].next;
        }
        false
    }

    // Production list

    fn push_slot(&mut self, production: Production) -> usize {
        let id = self.slots.len();
        self.slots.push(Slot {
            production,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.slots[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    fn insert_slot_before(&mut self, anchor: usize, production: Production) -> usize {
        let id = self.slots.len();
        let prev = self.slots[anchor].prev;
        self.slots.push(Slot {
            production,
            prev,
            next: Some(anchor),
        });
        self.slots[anchor].prev = Some(id);
        match prev {
            Some(prev) => self.slots[prev].next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    fn unlink_slot(&mut self, slot: usize) {
        let Slot { prev, next, .. } = self.slots[slot];
        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Replay the production list into a tree. The first production must
    /// open the root marker and the last one must seal it; tokens outside
    /// every other marker are attached to the root.
    pub fn finish(self) -> SyntaxTree {
        let mut tree = SyntaxTree::new(self.text.clone());
        let mut stack: Vec<NodeId> = Vec::new();
        let mut cursor = 0;
        let mut root = None;

        let mut slot = self.head;
        while let Some(id) = slot {
            match self.slots[id].production {
                Production::Start(marker) => {
                    let data = &self.markers[marker.0];
                    let kind = match (&data.state, &data.kind) {
                        (MarkerState::Done, Some(kind)) => kind.clone(),
                        _ => panic!("marker {:?} was never sealed", marker),
                    };
                    let node = match stack.last() {
                        Some(&parent) => {
                            self.attach_tokens(&mut tree, parent, cursor, data.start);
                            cursor = cursor.max(data.start);
                            let range = self.node_range(data.start, data.end);
                            let node = tree.alloc(kind, range);
                            tree.append_child(parent, node);
                            node
                        }
                        None => {
                            assert!(root.is_none(), "more than one root marker");
                            let node = tree.alloc(kind, TextRange::new(0, self.text.len()));
                            root = Some(node);
                            node
                        }
                    };
                    stack.push(node);
                }
                Production::Done(marker) => {
                    let node = stack.pop().expect("unbalanced production list");
                    let end = if stack.is_empty() {
                        self.tokens.len()
                    } else {
                        self.markers[marker.0].end
                    };
                    self.attach_tokens(&mut tree, node, cursor, end);
                    cursor = cursor.max(end);
                }
            }
            slot = self.slots[id].next;
        }

        assert!(stack.is_empty(), "unbalanced production list");
        tree.set_root(root.expect("no root marker"));
        tree
    }

    fn node_range(&self, start: usize, end: usize) -> TextRange {
        let start_offset = self.offset_of(start);
        if end > start {
            TextRange::new(start_offset, self.tokens[end - 1].range.end)
        } else {
            TextRange::empty(start_offset)
        }
    }

    fn attach_tokens(&self, tree: &mut SyntaxTree, parent: NodeId, from: usize, to: usize) {
        for token in self.tokens.iter().take(to).skip(from) {
            let leaf = tree.alloc(NodeKind::Token(token.kind), token.range);
            tree.append_child(parent, leaf);
        }
    }
}
