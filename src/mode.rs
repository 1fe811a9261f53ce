// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Editor integration: what a host editor needs to support LuoYan buffers.
//!
//! The host calls [`token`] repeatedly per visible line, threading the returned
//! [`LexerState`] into the next call and across line boundaries. Styling is up to the host;
//! [`style`] only names the category in the usual editor vocabulary.
//!
//! Columns in this module are byte offsets into the line.

use std::ops::Range;

use crate::highlight::{LexerState, TokenKind, next_token};

/// Static description of the language mode.
pub struct ModeInfo {
    pub name: &'static str,
    pub mime_type: &'static str,
    pub extensions: &'static [&'static str],
    pub block_comment: (&'static str, &'static str),
    pub line_comment: Option<&'static str>,
    pub electric_chars: &'static str,
}

pub const MODE: ModeInfo = ModeInfo {
    name: "luoyan",
    mime_type: "text/x-luoyan",
    extensions: &["ly"],
    block_comment: ("「：", "：」"),
    line_comment: None,
    electric_chars: "}",
};

/// Characters that make up a "word" for double-click selection and the like.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// A cursor over one line, advanced by [`token`].
pub struct Stream<'a> {
    line: &'a str,
    start: usize,
    pos: usize,
}

impl<'a> Stream<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, start: 0, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// The text consumed by the last call to [`token`].
    pub fn current(&self) -> &'a str {
        &self.line[self.start..self.pos]
    }
}

/// The state at the start of a document.
pub fn start_state() -> LexerState {
    LexerState::INITIAL
}

/// Consumes one token from `stream` and returns its category (if any) and the next state.
pub fn token(stream: &mut Stream<'_>, state: LexerState) -> (Option<TokenKind>, LexerState) {
    stream.start = stream.pos;
    let step = next_token(stream.line, stream.pos, state);
    stream.pos += step.len;
    (step.kind, step.state)
}

/// The host-side style name for a category.
pub fn style(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Comment => "comment",
        TokenKind::String => "string",
        TokenKind::QuotedIdentifier => "variable-2",
        TokenKind::Number => "number",
        TokenKind::CharLiteral => "string-2",
        TokenKind::Keyword => "keyword",
        TokenKind::Type => "type",
        TokenKind::Builtin => "builtin",
        TokenKind::Constructor => "atom",
        TokenKind::Variable => "variable",
        TokenKind::Operator => "operator",
        TokenKind::Punctuation => "punctuation",
    }
}

pub const BRACKETS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('「', '」'),
    ('『', '』'),
    ('（', '）'),
    ('【', '】'),
    ('〈', '〉'),
];

pub fn closing_bracket(open: char) -> Option<char> {
    BRACKETS.iter().find(|&&(o, _)| o == open).map(|&(_, c)| c)
}

pub fn opening_bracket(close: char) -> Option<char> {
    BRACKETS.iter().find(|&&(_, c)| c == close).map(|&(o, _)| o)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A foldable span. `from` is just past the opening marker, `to` just past the closing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoldRange {
    pub from: Position,
    pub to: Position,
}

enum Opener {
    Literal(&'static str),
    /// The first marker followed later on the same line by the second, like `观 … 性`.
    Spanning(&'static str, &'static str),
}

impl Opener {
    /// If an opener starts at `at`, returns the offset just past it.
    fn match_at(&self, text: &str, at: usize) -> Option<usize> {
        let rest = &text[at..];
        match *self {
            Opener::Literal(open) => rest.starts_with(open).then(|| at + open.len()),
            Opener::Spanning(head, tail) => {
                let after_head = rest.strip_prefix(head)?;
                let idx = after_head.find(tail)?;
                Some(at + head.len() + idx + tail.len())
            }
        }
    }
}

struct FoldMarker {
    open: Opener,
    close: &'static str,
}

/// Tried in order; the first pair that yields a range wins.
const FOLD_MARKERS: &[FoldMarker] = &[
    FoldMarker { open: Opener::Literal("算法乃"), close: "也" },
    FoldMarker { open: Opener::Spanning("观", "性"), close: "观毕" },
    FoldMarker { open: Opener::Literal("函数"), close: "end" },
    FoldMarker { open: Opener::Literal("{"), close: "}" },
    FoldMarker { open: Opener::Literal("("), close: ")" },
    FoldMarker { open: Opener::Literal("["), close: "]" },
];

/// Finds the fold range that starts on the cursor's line.
///
/// The opener has to start at or before the cursor column. Nested openers of the same
/// pair are counted so the matching closer is found.
pub fn fold_range(lines: &[&str], cursor: Position) -> Option<FoldRange> {
    let text = *lines.get(cursor.line)?;

    for marker in FOLD_MARKERS {
        let Some((open_pos, open_end)) = first_opener(text, marker) else {
            continue;
        };
        if open_pos > cursor.column {
            continue;
        }
        if let Some(to) = find_closing(lines, Position::new(cursor.line, open_end), marker) {
            return Some(FoldRange { from: Position::new(cursor.line, open_end), to });
        }
    }

    None
}

fn first_opener(text: &str, marker: &FoldMarker) -> Option<(usize, usize)> {
    text.char_indices()
        .map(|(i, _)| i)
        .filter(|&i| !text[i..].starts_with(marker.close))
        .find_map(|i| marker.open.match_at(text, i).map(|end| (i, end)))
}

fn find_closing(lines: &[&str], from: Position, marker: &FoldMarker) -> Option<Position> {
    let mut depth = 1usize;

    for (line_idx, text) in lines.iter().enumerate().skip(from.line) {
        let mut i = if line_idx == from.line { from.column } else { 0 };

        while i < text.len() {
            if text[i..].starts_with(marker.close) {
                depth -= 1;
                if depth == 0 {
                    return Some(Position::new(line_idx, i + marker.close.len()));
                }
                i += marker.close.len();
            } else if let Some(end) = marker.open.match_at(text, i) {
                depth += 1;
                i = end;
            } else {
                i += text[i..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    None
}

const HOVER_HELP: &[(&str, &str)] = &[
    ("设", "Variable declaration: `设「name」为 value`"),
    ("让", "Let binding"),
    ("函数", "Function definition"),
    ("夫", "Classical-style function definition: `夫「name」者受 params 焉算法乃 body`"),
    ("是谓", "Classical-style end marker"),
    ("若", "Condition (if)"),
    ("则", "Branch taken when the condition holds (then)"),
    ("余者", "Fallback branch (else)"),
    ("答", "Return a value"),
    ("观", "Pattern match expression"),
    ("性", "Pattern match property"),
    ("打印", "Print a value to the console"),
];

/// Markdown hover text for a keyword.
pub fn hover(word: &str) -> Option<String> {
    let (_, help) = HOVER_HELP.iter().find(|&&(w, _)| w == word)?;
    Some(format!("**{word}**\n\n{help}"))
}

/// A replacement of `range` (byte offsets) on one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub line: usize,
    pub range: Range<usize>,
    pub new_text: String,
}

/// Formatting: one edit per line that has trailing whitespace, removing it.
pub fn trailing_whitespace_edits(text: &str) -> Vec<TextEdit> {
    text.lines()
        .enumerate()
        .filter_map(|(line, content)| {
            let trimmed = content.trim_end().len();
            (trimmed != content.len()).then(|| TextEdit {
                line,
                range: trimmed..content.len(),
                new_text: String::new(),
            })
        })
        .collect()
}
