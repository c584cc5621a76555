use crate::lexer::tokens::{TokenKind, TokenSlice, TokenStream};

/// Saved cursor position, see [`Cursor::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(u32);

/// Read cursor over `[start, end)` of one token stream.
///
/// Reading past `end` yields `EOF`, so callers never index out of range.
#[derive(Debug, Clone)]
pub struct Cursor<'t> {
    tokens: &'t TokenStream,
    start: u32,
    end: u32,
    pos: u32,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t TokenStream, slice: TokenSlice) -> Self {
        Cursor {
            tokens,
            start: slice.start,
            end: slice.end,
            pos: slice.start,
        }
    }

    pub fn tokens(&self) -> &'t TokenStream {
        self.tokens
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Moves to `pos`, clamped to the cursor's range.
    pub fn jump(&mut self, pos: u32) {
        self.pos = pos.clamp(self.start, self.end);
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    pub fn peek(&self, offset: u32) -> TokenKind {
        let index = self.pos + offset;
        if index >= self.end {
            TokenKind::EOF
        } else {
            self.tokens.kind(index)
        }
    }

    pub fn current(&self) -> TokenKind {
        self.peek(0)
    }

    /// Whether the tokens from the current one on are exactly `kinds`.
    pub fn is_type_sequence(&self, kinds: &[TokenKind]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(offset, kind)| self.peek(offset as u32) == *kind)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.pos)
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.jump(snapshot.0);
    }

    pub fn literal(&self, offset: u32) -> &'t str {
        let index = self.pos + offset;
        if index >= self.end {
            "EOF"
        } else {
            self.tokens.literal(index)
        }
    }

    /// Consumes the current token and returns its index.
    pub fn advance(&mut self) -> u32 {
        let index = self.pos;
        if !self.at_end() {
            self.pos += 1;
        }
        index
    }

    /// Consumes the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances until the current token is one of `kinds`.
    ///
    /// Returns false when the range ends first.
    pub fn skip_until(&mut self, kinds: &[TokenKind]) -> bool {
        while !self.at_end() {
            if kinds.contains(&self.current()) {
                return true;
            }
            self.advance();
        }
        false
    }

    /// Skips a balanced `{ ... }` group starting at the current `{`.
    pub fn skip_block(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current() {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Recovery after a malformed statement.
    ///
    /// Skips the offending token and everything up to the end of the
    /// statement: a `;` is consumed, a `}` is consumed only when it closes a
    /// `{` opened among the skipped tokens, and an unmatched `}` is left in
    /// place for the enclosing block.
    pub fn try_skip_to_next_statement(&mut self) {
        let mut depth = 0usize;

        match self.current() {
            TokenKind::EOF | TokenKind::CloseCurly => return,
            TokenKind::Semicolon => {
                self.advance();
                return;
            }
            TokenKind::OpenCurly => depth += 1,
            _ => {}
        }
        self.advance();

        while !self.at_end() {
            match self.current() {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::CloseCurly if depth == 0 => return,
                TokenKind::CloseCurly => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::OpenCurly => {
                    depth += 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Slice from `start` up to (excluding) the current position.
    pub fn slice_from(&self, start: u32) -> TokenSlice {
        TokenSlice::new(start, self.pos.max(start))
    }
}
