// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Syntax highlighting for LuoYan source text.
//!
//! The tokenizer works one line at a time. Everything that spans lines (nested comments,
//! strings, quoted identifiers) lives in [`LexerState`], which the caller passes in and
//! receives back. There is no hidden state: tokenizing the same line from the same state
//! always yields the same tokens and the same resulting state.

mod lexer;
pub mod words;

pub use lexer::{Step, next_token};

/// The lexical category of a token.
///
/// Categories say nothing about fonts or colors. That mapping belongs to the host,
/// see [`crate::mode::style`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    String,
    QuotedIdentifier,
    Number,
    CharLiteral,
    Keyword,
    Type,
    Builtin,
    Constructor,
    Variable,
    Operator,
    Punctuation,
}

/// A token produced by the tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Byte offset from the start of the line.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
    pub kind: TokenKind,
}

impl Token {
    /// The text this token covers in `line`.
    pub fn lexeme<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.offset..self.offset + self.len).unwrap_or("")
    }
}

/// State carried from the end of one line to the start of the next.
///
/// `comment_depth` is 0 if and only if `in_comment` is false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LexerState {
    pub in_comment: bool,
    pub comment_depth: u32,
    pub in_string: bool,
    /// The character that closes the open string.
    pub string_delimiter: Option<char>,
    pub in_quoted_identifier: bool,
}

impl LexerState {
    /// The state at the very start of a document.
    pub const INITIAL: Self = Self {
        in_comment: false,
        comment_depth: 0,
        in_string: false,
        string_delimiter: None,
        in_quoted_identifier: false,
    };
}

/// Tokenizes a line.
///
/// `state` is the tokenizer state from the end of the previous line
/// ([`LexerState::INITIAL`] for the first line). Returns the new state at the end of this line.
/// Spans that yield no category (whitespace, unknown characters) produce no token.
pub fn tokenize_line(line: &str, mut state: LexerState, tokens: &mut Vec<Token>) -> LexerState {
    let mut off = 0;

    while off < line.len() {
        let step = next_token(line, off, state);
        if let Some(kind) = step.kind {
            tokens.push(Token { offset: off, len: step.len, kind });
        }
        off += step.len;
        state = step.state;
    }

    state
}

/// Holds the highlighting state for a document.
pub struct HighlightState {
    /// Per-line tokenizer state, indexed by logical line number.
    /// Each entry is the state at the *start* of that line.
    pub line_states: Vec<LexerState>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self { line_states: vec![LexerState::INITIAL] }
    }

    /// The state at the start of `line`, if it has been computed.
    pub fn state_at(&self, line: usize) -> Option<LexerState> {
        self.line_states.get(line).copied()
    }

    /// Recomputes line states starting from `from_line`.
    /// Call this after edits to update multi-line state propagation.
    pub fn recompute_states<'a>(
        &mut self,
        from_line: usize,
        get_line: &dyn Fn(usize) -> Option<&'a str>,
    ) {
        if from_line >= self.line_states.len() {
            return;
        }

        let mut state = self.line_states[from_line];
        let mut tokens = Vec::new();
        let mut line_idx = from_line;

        while let Some(line) = get_line(line_idx) {
            state = tokenize_line(line, state, &mut tokens);
            tokens.clear();

            let next = line_idx + 1;
            if next < self.line_states.len() {
                if self.line_states[next] == state {
                    tracing::trace!(line = next, "line states converged");
                    break;
                }
                self.line_states[next] = state;
            } else {
                self.line_states.push(state);
            }
            line_idx = next;
        }
    }

    /// Drops cached states past the end of a document that now has `line_count` lines.
    pub fn truncate(&mut self, line_count: usize) {
        self.line_states.truncate(line_count.max(1));
    }
}

impl Default for HighlightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> (Vec<Token>, LexerState) {
        let mut tokens = Vec::new();
        let state = tokenize_line(input, LexerState::INITIAL, &mut tokens);
        (tokens, state)
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).0.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_declaration_line() {
        let line = "设「计数」为 42";
        let (tokens, state) = tokenize(line);
        assert_eq!(state, LexerState::INITIAL);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].lexeme(line), "设");
        assert_eq!(tokens[1].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[1].lexeme(line), "「");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Number && t.lexeme(line) == "42"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Keyword && t.lexeme(line) == "为"));
    }

    #[test]
    fn test_empty_line() {
        let (tokens, state) = tokenize("");
        assert!(tokens.is_empty());
        assert_eq!(state, LexerState::INITIAL);
    }

    #[test]
    fn test_whitespace_line() {
        let (tokens, _) = tokenize("   \t ");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_string_spans_lines() {
        let mut tokens = Vec::new();
        let state = tokenize_line("打印 『你好", LexerState::INITIAL, &mut tokens);
        assert!(state.in_string);
        assert_eq!(state.string_delimiter, Some('』'));

        tokens.clear();
        let state = tokenize_line("世界』", state, &mut tokens);
        assert!(!state.in_string);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn test_offsets_cover_lexemes() {
        let line = "若 x <= 3.5e2 则 『是』";
        let (tokens, _) = tokenize(line);
        let mut last_end = 0;
        for t in &tokens {
            assert!(t.offset >= last_end);
            assert!(line.is_char_boundary(t.offset));
            assert!(line.is_char_boundary(t.offset + t.len));
            last_end = t.offset + t.len;
        }
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Number && t.lexeme(line) == "3.5e2"));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Operator && t.lexeme(line) == "<="));
    }

    #[test]
    fn test_categories() {
        assert_eq!(kinds("整型"), [TokenKind::Type]);
        assert_eq!(kinds("整数"), [TokenKind::Keyword]);
        assert_eq!(kinds("打印行"), [TokenKind::Builtin]);
        assert_eq!(kinds("Some"), [TokenKind::Keyword]);
        assert_eq!(kinds("Cons"), [TokenKind::Constructor]);
        assert_eq!(kinds("问候"), [TokenKind::Constructor]);
        assert_eq!(kinds("count"), [TokenKind::Variable]);
        assert_eq!(kinds("'a'"), [TokenKind::CharLiteral]);
    }

    #[test]
    fn test_recompute_states_converges() {
        let lines = ["「：开始", "仍是注释", "：」", "设「x」为 1"];
        let get = |i: usize| lines.get(i).copied();

        let mut hs = HighlightState::new();
        hs.recompute_states(0, &get);
        assert_eq!(hs.line_states.len(), 5);
        assert!(hs.line_states[1].in_comment);
        assert!(hs.line_states[2].in_comment);
        assert!(!hs.line_states[3].in_comment);

        // Editing line 1 without changing its outcome stops at line 2.
        let edited = ["「：开始", "还是注释", "：」", "设「x」为 1"];
        let get = |i: usize| edited.get(i).copied();
        hs.recompute_states(1, &get);
        assert_eq!(hs.state_at(3), Some(LexerState::INITIAL));
    }

    #[test]
    fn test_truncate_after_deleting_lines() {
        let lines = ["「：开始", "：」", "打印 1"];
        let mut hs = HighlightState::new();
        hs.recompute_states(0, &|i| lines.get(i).copied());
        assert_eq!(hs.line_states.len(), 4);

        hs.truncate(2);
        assert_eq!(hs.line_states.len(), 2);
        assert!(hs.state_at(1).unwrap().in_comment);
        assert_eq!(hs.state_at(2), None);

        // The first line's state always survives.
        hs.truncate(0);
        assert_eq!(hs.line_states, vec![LexerState::INITIAL]);

        // Recomputing after a shrink extends the cache again.
        let shorter = ["打印 1"];
        hs.recompute_states(0, &|i| shorter.get(i).copied());
        assert_eq!(hs.line_states.len(), 2);
    }

    #[test]
    fn test_recompute_states_out_of_range() {
        let mut hs = HighlightState::new();
        hs.recompute_states(10, &|_| None);
        assert_eq!(hs.line_states, vec![LexerState::INITIAL]);
    }
}
