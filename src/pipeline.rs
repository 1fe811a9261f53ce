// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Glue between user actions and the preview compiler.
//!
//! Everything here is one-shot and synchronous. The simulated second stage of the WASM
//! preview and the run preview sleep on the calling thread. Once started they always
//! finish: there's no cancellation and no timeout.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread;

use crate::compiler::{self, CompileResult};
use crate::config::Settings;

pub const SOURCE_EXTENSION: &str = ".ly";
pub const C_MIME_TYPE: &str = "text/c";
pub const WASM_MIME_TYPE: &str = "application/wasm";
/// Printed by the run preview once every print has been shown.
pub const RUN_FINISHED: &str = "Program finished.";

const PRINT: &str = "打印";

/// A generated file offered to the user for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// `hello.ly` -> `hello.c`. Names without the `.ly` suffix get the extension appended.
pub fn artifact_name(source_name: &str, extension: &str) -> String {
    let stem = source_name.strip_suffix(SOURCE_EXTENSION).unwrap_or(source_name);
    format!("{stem}{extension}")
}

/// The compile surface: source text in, C source out.
pub fn compile(source: &str, settings: &Settings) -> CompileResult<String> {
    let res = compiler::compile(source, &settings.compile_options());
    if let Err(err) = &res {
        tracing::warn!(%err, "compilation failed");
    }
    res
}

pub fn compile_c(source_name: &str, source: &str, settings: &Settings) -> CompileResult<Artifact> {
    let contents = compile(source, settings)?;
    tracing::info!(source = source_name, "compiled to C");
    Ok(Artifact { file_name: artifact_name(source_name, ".c"), mime_type: C_MIME_TYPE, contents })
}

/// Compiles to C, then runs the delayed second stage that wraps it in a WebAssembly preview.
pub fn compile_wasm_preview(
    source_name: &str,
    source: &str,
    settings: &Settings,
) -> CompileResult<Artifact> {
    let c_source = compile(source, settings)?;
    tracing::info!(source = source_name, "stage 1: compiled to C");

    thread::sleep(settings.wasm_stage_delay());
    let contents = wasm_preview_module(&c_source);
    tracing::info!(source = source_name, "stage 2: WebAssembly preview ready");

    Ok(Artifact {
        file_name: artifact_name(source_name, ".wasm"),
        mime_type: WASM_MIME_TYPE,
        contents,
    })
}

/// A WebAssembly text module that carries the C source as comments.
///
/// This is a placeholder for a real C-to-WASM toolchain.
pub fn wasm_preview_module(c_source: &str) -> String {
    let mut out = String::from(";; WebAssembly preview module\n;; Generated from C source:\n");
    for line in c_source.lines() {
        if line.is_empty() {
            out.push_str(";;\n");
        } else {
            out.push_str(";; ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(concat!(
        "\n(module\n",
        "  (func $main (result i32)\n",
        "    i32.const 0\n",
        "  )\n",
        "  (export \"main\" (func $main))\n",
        ")\n",
    ));
    out
}

/// Simulates running `source`: after the configured delay, returns the text of every
/// `打印『…』` / `打印 "…"` in the source, followed by [`RUN_FINISHED`].
pub fn run_preview(source: &str, settings: &Settings) -> Vec<String> {
    thread::sleep(settings.run_delay());

    let mut output: Vec<String> = source
        .match_indices(PRINT)
        .filter_map(|(i, _)| printed_literal(&source[i + PRINT.len()..]))
        .map(str::to_string)
        .collect();
    output.push(RUN_FINISHED.to_string());
    output
}

/// Matches `\s*『text』` or `\s*"text"` at the start of `rest`. The literal must close on
/// the same line.
fn printed_literal(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let (close, body) = if let Some(body) = rest.strip_prefix('『') {
        ('』', body)
    } else if let Some(body) = rest.strip_prefix('"') {
        ('"', body)
    } else {
        return None;
    };

    let line = body.lines().next().unwrap_or("");
    line.find(close).map(|end| &line[..end])
}

/// The authoritative compiler, invoked as an opaque subprocess.
///
/// Its output and exit status are passed through untouched.
#[derive(Clone, Debug)]
pub struct ExternalCompiler {
    binary: String,
}

impl ExternalCompiler {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.compiler.clone())
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// `<compiler> "<path>"`, as it would be typed into a terminal.
    pub fn compile_command_line(&self, path: &Path) -> String {
        format!("{} \"{}\"", self.binary, path.display())
    }

    /// `cd "<dir>" && <compiler> "<path>" && ./<stem>`
    pub fn run_command_line(&self, path: &Path) -> String {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        format!(
            "cd \"{}\" && {} && ./{stem}",
            dir.display(),
            self.compile_command_line(path)
        )
    }

    pub fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(path);
        cmd
    }

    /// Runs the compiler with inherited stdio and waits for it.
    pub fn spawn(&self, path: &Path) -> io::Result<ExitStatus> {
        tracing::info!(command = %self.compile_command_line(path), "running external compiler");
        self.command(path).status()
    }
}
