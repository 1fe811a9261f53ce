// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Line-pattern parser.
//!
//! Every physical line is classified on its own. There's no tree, no scope, and no check
//! that a `答` sits inside a function body.
//!
//! ## Quirks
//!
//! - A line containing `答` anywhere is a return statement, prefix and all.
//! - A line that only partially matches a rule falls through to the next rule.

use super::ast::Statement;
use super::{CompileError, CompileResult};

const DECLARATION: &str = "设「";
const NAME_END: char = '」';
const EQUALS: &str = "为";
const PRINT: &str = "打印";
const FUNCTION: &str = "夫「";
const PARAMS_BEGIN: &str = "者受";
const PARAMS_END: char = '焉';
const BODY_BEGIN: &str = "算法乃";
const RETURN: char = '答';
const STRING_OPEN: char = '『';
const STRING_CLOSE: char = '』';

/// Result of classifying a single line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    Matched(Statement),
    /// No rule applies. Kept distinct from a hard error so callers can decide.
    Unmatched,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Unmatched lines are dropped silently.
    #[default]
    Lenient,
    /// The first unmatched line is an error.
    Strict,
}

/// Rules in priority order. The first one to match wins.
const RULES: &[fn(&str) -> Option<Statement>] =
    &[var_declaration, print, function_definition, return_statement, literal, string_literal];

/// Classifies one trimmed, non-empty line.
pub fn parse_line(line: &str) -> ParseOutcome {
    match RULES.iter().find_map(|rule| rule(line)) {
        Some(stmt) => ParseOutcome::Matched(stmt),
        None => ParseOutcome::Unmatched,
    }
}

/// Parses `source` leniently. Lines that match nothing are skipped.
pub fn parse(source: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    for (line_no, line) in lines(source) {
        match parse_line(line) {
            ParseOutcome::Matched(stmt) => statements.push(stmt),
            ParseOutcome::Unmatched => tracing::trace!(line = line_no, "skipping unmatched line"),
        }
    }
    statements
}

pub fn parse_with_mode(source: &str, mode: ParseMode) -> CompileResult<Vec<Statement>> {
    match mode {
        ParseMode::Lenient => Ok(parse(source)),
        ParseMode::Strict => {
            let mut statements = Vec::new();
            for (line_no, line) in lines(source) {
                match parse_line(line) {
                    ParseOutcome::Matched(stmt) => statements.push(stmt),
                    ParseOutcome::Unmatched => {
                        return Err(CompileError::at(
                            line_no,
                            format!("unrecognized statement: {line}"),
                        ));
                    }
                }
            }
            Ok(statements)
        }
    }
}

/// Trimmed, non-empty lines with their 1-based physical line numbers.
fn lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Splits `「name」rest` (with the opener already stripped) into a non-empty name and the rest.
fn quoted_name(rest: &str) -> Option<(&str, &str)> {
    let (name, rest) = rest.split_once(NAME_END)?;
    if name.is_empty() { None } else { Some((name, rest)) }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn var_declaration(line: &str) -> Option<Statement> {
    let (name, rest) = quoted_name(line.strip_prefix(DECLARATION)?)?;
    let value = non_empty(rest.strip_prefix(EQUALS)?.trim_start())?;
    Some(Statement::VarDeclaration { name: name.to_string(), value: value.to_string() })
}

fn print(line: &str) -> Option<Statement> {
    let value = non_empty(line.strip_prefix(PRINT)?.trim_start())?;
    Some(Statement::Print { value: value.to_string() })
}

fn function_definition(line: &str) -> Option<Statement> {
    let (name, rest) = quoted_name(line.strip_prefix(FUNCTION)?)?;
    let (params, rest) = rest.strip_prefix(PARAMS_BEGIN)?.split_once(PARAMS_END)?;
    let body = rest.strip_prefix(BODY_BEGIN)?.trim_start();
    Some(Statement::FunctionDefinition {
        name: name.to_string(),
        params: params.split_whitespace().map(str::to_string).collect(),
        body: body.to_string(),
    })
}

fn return_statement(line: &str) -> Option<Statement> {
    let (_, value) = line.split_once(RETURN)?;
    let value = non_empty(value.trim_start())?;
    Some(Statement::Return { value: value.to_string() })
}

fn literal(line: &str) -> Option<Statement> {
    let (int, frac) = match line.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (line, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if all_digits(int) && frac.is_none_or(all_digits) {
        Some(Statement::Literal { text: line.to_string() })
    } else {
        None
    }
}

fn string_literal(line: &str) -> Option<Statement> {
    let text = line.strip_prefix(STRING_OPEN)?.strip_suffix(STRING_CLOSE)?;
    Some(Statement::StringLiteral { text: text.to_string() })
}
