// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! The preview compiler: LuoYan lines in, C source out.
//!
//!   source text
//! → `parser` (one pattern match per line) → `Statement`s
//! → `codegen` → C source with an embedded runtime
//!
//! This is a demonstration pipeline. The real compiler is an external binary,
//! see [`crate::pipeline::ExternalCompiler`].

pub mod ast;
pub mod codegen;
pub mod parser;

use std::fmt;

pub use self::ast::Statement;
pub use self::codegen::{CodegenContext, CodegenOptions, Generator};
pub use self::parser::{ParseMode, ParseOutcome};

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// 1-based physical line, when the failure can be tied to one.
    pub line: Option<usize>,
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { line: None, message: message.into() }
    }

    pub fn at(line: usize, message: impl Into<String>) -> Self {
        Self { line: Some(line), message: message.into() }
    }
}

impl std::error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "compile failed: {} (line {line})", self.message),
            None => write!(f, "compile failed: {}", self.message),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CompileOptions {
    pub parse_mode: ParseMode,
    pub codegen: CodegenOptions,
}

/// Compiles `source` to C with the default options.
pub fn compile_to_c(source: &str) -> CompileResult<String> {
    compile(source, &CompileOptions::default())
}

pub fn compile(source: &str, options: &CompileOptions) -> CompileResult<String> {
    let statements = parser::parse_with_mode(source, options.parse_mode)?;
    tracing::debug!(statements = statements.len(), "parsed source");
    Generator::new(options.codegen).generate(&statements)
}
