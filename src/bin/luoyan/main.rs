// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

use std::fs;
use std::io::{Write as _, stdout};
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context as _, bail};
use argh::FromArgs;
use luoyan::config::Settings;
use luoyan::highlight::{LexerState, Token, TokenKind, tokenize_line};
use luoyan::mode::{self, Position};
use luoyan::pipeline::{self, Artifact, ExternalCompiler};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(description = "Tools for the LuoYan (洛言) language")]
struct Command {
    #[argh(option, description = "path to a settings.json to use instead of the default")]
    config: Option<PathBuf>,
    #[argh(subcommand)]
    sub: SubCommands,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommands {
    Render(SubCommandRender),
    Tokens(SubCommandTokens),
    Compile(SubCommandCompile),
    Wasm(SubCommandWasm),
    Build(SubCommandBuild),
    Run(SubCommandRun),
    Fold(SubCommandFold),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "render", description = "Print a source file with ANSI highlighting")]
struct SubCommandRender {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "tokens", description = "Dump the tokens of every line")]
struct SubCommandTokens {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "compile", description = "Compile to C")]
struct SubCommandCompile {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
    #[argh(option, short = 'o', description = "output file (default: stdout)")]
    output: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "wasm", description = "Produce the WebAssembly preview module")]
struct SubCommandWasm {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
    #[argh(option, short = 'o', description = "output file (default: stdout)")]
    output: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "build", description = "Compile with the external compiler")]
struct SubCommandBuild {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "run", description = "Simulate running a program")]
struct SubCommandRun {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "fold", description = "Show the fold range starting at a position")]
struct SubCommandFold {
    #[argh(positional, description = "source .ly file")]
    input: PathBuf,
    #[argh(positional, description = "zero-based line")]
    line: usize,
    #[argh(positional, description = "zero-based byte column")]
    column: usize,
}

pub fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("LUOYAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();

    let command: Command = argh::from_env();
    let settings = match &command.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Settings::load()?,
    };

    match &command.sub {
        SubCommands::Render(cmd) => run_render(&read_source(&cmd.input)?)?,
        SubCommands::Tokens(cmd) => run_tokens(&read_source(&cmd.input)?)?,
        SubCommands::Compile(cmd) => {
            let source = read_source(&cmd.input)?;
            let artifact = pipeline::compile_c(&source_name(&cmd.input), &source, &settings)?;
            write_artifact(&artifact, cmd.output.as_deref())?;
        }
        SubCommands::Wasm(cmd) => {
            let source = read_source(&cmd.input)?;
            let artifact =
                pipeline::compile_wasm_preview(&source_name(&cmd.input), &source, &settings)?;
            write_artifact(&artifact, cmd.output.as_deref())?;
        }
        SubCommands::Build(cmd) => {
            let compiler = ExternalCompiler::from_settings(&settings);
            let status = compiler
                .spawn(&cmd.input)
                .with_context(|| format!("failed to run {}", compiler.binary()))?;
            if !status.success() {
                bail!("{} exited with {status}", compiler.binary());
            }
        }
        SubCommands::Run(cmd) => {
            let source = read_source(&cmd.input)?;
            let mut stdout = stdout();
            for line in pipeline::run_preview(&source, &settings) {
                writeln!(stdout, "{line}")?;
            }
        }
        SubCommands::Fold(cmd) => {
            let source = read_source(&cmd.input)?;
            let lines: Vec<&str> = source.lines().collect();
            let Some(range) = mode::fold_range(&lines, Position::new(cmd.line, cmd.column)) else {
                bail!("No fold range at {}:{}", cmd.line, cmd.column);
            };
            println!(
                "{}:{} - {}:{}",
                range.from.line, range.from.column, range.to.line, range.to.column
            );
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn source_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn write_artifact(artifact: &Artifact, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, &artifact.contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} ({}) written to {}",
                artifact.file_name,
                artifact.mime_type,
                path.display()
            );
        }
        None => stdout().write_all(artifact.contents.as_bytes())?,
    }
    Ok(())
}

fn color(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Comment => "\x1b[32m",          // Green
        TokenKind::String => "\x1b[91m",           // Bright Red
        TokenKind::QuotedIdentifier => "\x1b[96m", // Bright Cyan
        TokenKind::Number => "\x1b[92m",           // Bright Green
        TokenKind::CharLiteral => "\x1b[31m",      // Red
        TokenKind::Keyword => "\x1b[95m",          // Bright Magenta
        TokenKind::Type => "\x1b[94m",             // Bright Blue
        TokenKind::Builtin => "\x1b[93m",          // Bright Yellow
        TokenKind::Constructor => "\x1b[33m",      // Yellow
        TokenKind::Variable => "",
        TokenKind::Operator => "\x1b[1m", // Bold
        TokenKind::Punctuation => "",
    }
}

fn run_render(source: &str) -> anyhow::Result<()> {
    let mut stdout = stdout();
    let mut state = LexerState::INITIAL;
    let mut tokens: Vec<Token> = Vec::new();

    for line in source.lines() {
        tokens.clear();
        state = tokenize_line(line, state, &mut tokens);

        let mut pos = 0;
        for token in &tokens {
            stdout.write_all(line[pos..token.offset].as_bytes())?;
            let color = color(token.kind);
            let text = token.lexeme(line);
            if color.is_empty() {
                stdout.write_all(text.as_bytes())?;
            } else {
                write!(stdout, "{color}{text}\x1b[m")?;
            }
            pos = token.offset + token.len;
        }
        stdout.write_all(line[pos..].as_bytes())?;
        writeln!(stdout)?;
    }

    Ok(())
}

fn run_tokens(source: &str) -> anyhow::Result<()> {
    let mut stdout = stdout();
    let mut state = LexerState::INITIAL;
    let mut tokens = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        tokens.clear();
        state = tokenize_line(line, state, &mut tokens);
        for token in &tokens {
            writeln!(
                stdout,
                "{}:{}\t{:<12}\t{:?}",
                idx + 1,
                token.offset,
                mode::style(token.kind),
                token.lexeme(line)
            )?;
        }
    }

    Ok(())
}
