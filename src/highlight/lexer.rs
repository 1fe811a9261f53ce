// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! The per-position tokenizer state machine.
//!
//! At each position the rules below are tried in a fixed order and the first hit wins:
//!
//! 1. inside a comment: nested opener, closer, or any single character
//! 2. comment opener `「：`
//! 3. inside a string: its delimiter, an escape pair, or any single character
//! 4. string opener `『` or `"`
//! 5. inside a quoted identifier: `」` or any single character
//! 6. quoted identifier opener `「`
//! 7. number
//! 8. character literal
//! 9. identifier run (keyword / type / builtin / constructor / variable)
//! 10. multi-character operator
//! 11. single-character operator
//! 12. word-form operator
//! 13. punctuation
//! 14. anything else: one character, no category
//!
//! Whitespace outside of all regions is skipped as a single uncategorized run.
//!
//! ## Quirks
//!
//! - A comment opener is honored inside strings and quoted identifiers, because rule 2
//!   precedes rules 3 and 5. The region resumes once the comment closes.
//! - An identifier run that is exactly a word-form operator (`加`, `mod`, ...) is not an
//!   identifier. Otherwise rule 12 could never fire for them.

use super::words::*;
use super::{LexerState, TokenKind};

const COMMENT_OPEN: &str = "「：";
const COMMENT_CLOSE: &str = "：」";
const QUOTED_OPEN: char = '「';
const QUOTED_CLOSE: char = '」';
const ESCAPE: char = '\\';
/// (opener, closer) pairs for strings.
const STRING_DELIMITERS: &[(char, char)] = &[('『', '』'), ('"', '"')];

/// The outcome of scanning a single token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Number of bytes consumed. Always at least one character unless `pos` was at the end.
    pub len: usize,
    /// `None` for spans that carry no category.
    pub kind: Option<TokenKind>,
    /// The state after this token.
    pub state: LexerState,
}

/// Scans one token of `line` starting at byte offset `pos`.
pub fn next_token(line: &str, pos: usize, state: LexerState) -> Step {
    let rest = line.get(pos..).unwrap_or("");
    let Some(ch) = rest.chars().next() else {
        return Step { len: 0, kind: None, state };
    };
    let mut s = state;

    if s.in_comment {
        if rest.starts_with(COMMENT_OPEN) {
            s.comment_depth += 1;
            return hit(COMMENT_OPEN.len(), TokenKind::Comment, s);
        }
        if rest.starts_with(COMMENT_CLOSE) {
            s.comment_depth = s.comment_depth.saturating_sub(1);
            if s.comment_depth == 0 {
                s.in_comment = false;
            }
            return hit(COMMENT_CLOSE.len(), TokenKind::Comment, s);
        }
        return hit(ch.len_utf8(), TokenKind::Comment, s);
    }

    if rest.starts_with(COMMENT_OPEN) {
        s.in_comment = true;
        s.comment_depth = 1;
        return hit(COMMENT_OPEN.len(), TokenKind::Comment, s);
    }

    if s.in_string {
        if s.string_delimiter == Some(ch) {
            s.in_string = false;
            s.string_delimiter = None;
            return hit(ch.len_utf8(), TokenKind::String, s);
        }
        if ch == ESCAPE {
            let escaped = rest[1..].chars().next().map_or(0, char::len_utf8);
            return hit(1 + escaped, TokenKind::String, s);
        }
        return hit(ch.len_utf8(), TokenKind::String, s);
    }

    if let Some(&(_, close)) = STRING_DELIMITERS.iter().find(|&&(open, _)| open == ch) {
        s.in_string = true;
        s.string_delimiter = Some(close);
        return hit(ch.len_utf8(), TokenKind::String, s);
    }

    if s.in_quoted_identifier {
        if ch == QUOTED_CLOSE {
            s.in_quoted_identifier = false;
        }
        return hit(ch.len_utf8(), TokenKind::QuotedIdentifier, s);
    }

    if ch == QUOTED_OPEN {
        s.in_quoted_identifier = true;
        return hit(ch.len_utf8(), TokenKind::QuotedIdentifier, s);
    }

    if ch.is_whitespace() {
        let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
        return Step { len, kind: None, state: s };
    }

    if let Some(len) = scan_number(rest) {
        return hit(len, TokenKind::Number, s);
    }

    if let Some(len) = scan_char_literal(rest) {
        return hit(len, TokenKind::CharLiteral, s);
    }

    if is_ident_start(ch) {
        let len = rest.find(|c: char| !is_ident_continuation(c)).unwrap_or(rest.len());
        let word = &rest[..len];
        if !is_word_operator(word) {
            return hit(len, classify_word(word), s);
        }
    }

    if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
        return hit(op.len(), TokenKind::Operator, s);
    }

    if SINGLE_CHAR_OPERATORS.contains(&ch) {
        return hit(ch.len_utf8(), TokenKind::Operator, s);
    }

    if let Some(op) = WORD_OPERATORS.iter().find(|op| rest.starts_with(**op)) {
        return hit(op.len(), TokenKind::Operator, s);
    }

    if is_punctuation(ch) {
        return hit(ch.len_utf8(), TokenKind::Punctuation, s);
    }

    Step { len: ch.len_utf8(), kind: None, state: s }
}

fn hit(len: usize, kind: TokenKind, state: LexerState) -> Step {
    Step { len, kind: Some(kind), state }
}

/// `[0-9]+ (\.[0-9]*)? ([eE][+-]?[0-9]+)?`
fn scan_number(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut i = digits(0);
    if i == 0 {
        return None;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        i += digits(i);
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp = digits(j);
        if exp > 0 {
            i = j + exp;
        }
    }

    Some(i)
}

/// A quote, one or more plain or escaped characters, and a closing quote.
fn scan_char_literal(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    if chars.next()?.1 != '\'' {
        return None;
    }

    let mut count = 0;
    while let Some((i, c)) = chars.next() {
        match c {
            '\'' if count > 0 => return Some(i + 1),
            '\'' => return None,
            ESCAPE => {
                chars.next()?;
                count += 1;
            }
            _ => count += 1,
        }
    }

    None
}

/// Characters outside the ASCII range count as identifier characters when they're alphabetic,
/// which covers CJK ideographs but not CJK punctuation.
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || (!ch.is_ascii() && ch.is_alphabetic())
}

fn is_ident_continuation(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn classify_word(word: &str) -> TokenKind {
    if is_keyword(word) {
        return TokenKind::Keyword;
    }
    if is_builtin_type(word) {
        return TokenKind::Type;
    }
    if is_builtin_function(word) {
        return TokenKind::Builtin;
    }
    match word.chars().next() {
        Some(c) if c.is_ascii_uppercase() || !c.is_ascii() => TokenKind::Constructor,
        _ => TokenKind::Variable,
    }
}
