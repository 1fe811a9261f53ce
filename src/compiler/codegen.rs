// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! C code generation.
//!
//! The output is four blocks in a fixed order:
//!
//! 1. includes, the `luoyan_value_t` tagged union and runtime forward declarations
//! 2. global variables (currently always empty: declarations are emitted inline in `main`)
//! 3. one C function per function definition
//! 4. `main`, followed by the runtime helper implementations
//!
//! ## Quirks
//!
//! - A function returns the text after the *first* `答` in its body, trimmed and lowered
//!   like any other value, so `答 『hi』` returns the string `hi`. Whatever precedes the
//!   marker is dropped. Without a `答` the function returns unit.
//! - Integers are normalized before they reach C: `010` becomes `10`, since C would read
//!   it as octal. Digit runs that don't fit in an `int` are printed as strings.
//!
//! ## Gotchas
//!
//! - Identifier escaping is lossy: `「a-b」` and `「a_b」` both become `luoyan_a_b`.
//!   [`CodegenOptions::disambiguate_identifiers`] fixes that but changes the output.
//! - A name that would escape to one of the runtime's own identifiers (`「print」` ->
//!   `luoyan_print`) gets a trailing `_` so it can't shadow the helper.
//! - Nothing is type checked. Value text that is neither an integer nor a `『…』` string
//!   is printed as a string.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use super::ast::Statement;
use super::{CompileError, CompileResult};

const IDENT_PREFIX: &str = "luoyan_";
const VALUE_TYPE: &str = "luoyan_value_t";
const STRING_OPEN: char = '『';
const STRING_CLOSE: char = '』';
const REFERENCE_OPEN: char = '「';
const REFERENCE_CLOSE: char = '」';
const RETURN: char = '答';

/// Identifiers the generated runtime defines. User names must not escape to these.
const RUNTIME_IDENTIFIERS: &[&str] = &[
    "luoyan_value_t",
    "luoyan_print",
    "luoyan_make_int",
    "luoyan_make_string",
    "luoyan_make_unit",
];

const DEFAULT_INCLUDES: &[&str] = &["stdio.h", "stdlib.h", "string.h"];

const RUNTIME_DECLARATIONS: &str = "\
// LuoYan runtime value
typedef struct {
    enum { LUOYAN_INT, LUOYAN_STRING, LUOYAN_UNIT } type;
    union {
        int int_val;
        char* string_val;
    } value;
} luoyan_value_t;

// LuoYan runtime helpers
void luoyan_print(luoyan_value_t val);
luoyan_value_t luoyan_make_int(int val);
luoyan_value_t luoyan_make_string(const char* val);
luoyan_value_t luoyan_make_unit(void);

";

const RUNTIME_DEFINITIONS: &str = r#"// LuoYan runtime helper implementations
void luoyan_print(luoyan_value_t val) {
    switch (val.type) {
        case LUOYAN_INT:
            printf("%d\n", val.value.int_val);
            break;
        case LUOYAN_STRING:
            printf("%s\n", val.value.string_val);
            break;
        case LUOYAN_UNIT:
            printf("()\n");
            break;
    }
}

luoyan_value_t luoyan_make_int(int val) {
    luoyan_value_t result;
    result.type = LUOYAN_INT;
    result.value.int_val = val;
    return result;
}

luoyan_value_t luoyan_make_string(const char* val) {
    luoyan_value_t result;
    result.type = LUOYAN_STRING;
    result.value.string_val = strdup(val);
    return result;
}

luoyan_value_t luoyan_make_unit(void) {
    luoyan_value_t result;
    result.type = LUOYAN_UNIT;
    return result;
}
"#;

#[derive(Clone, Copy, Debug, Default)]
pub struct CodegenOptions {
    /// Append a per-name counter to every escaped identifier so distinct source names
    /// never collide. Off by default because it changes the generated text.
    pub disambiguate_identifiers: bool,
}

/// State for a single compile. Created fresh per call and dropped with the generator.
#[derive(Debug, Default)]
pub struct CodegenContext {
    pub variable_counter: u32,
    pub required_includes: BTreeSet<&'static str>,
    pub global_variable_names: Vec<String>,
    pub generated_functions: Vec<String>,
    /// Source name -> counter value, only filled when disambiguating.
    assigned: HashMap<String, u32>,
}

impl CodegenContext {
    pub fn new() -> Self {
        Self { required_includes: DEFAULT_INCLUDES.iter().copied().collect(), ..Default::default() }
    }
}

pub struct Generator {
    ctx: CodegenContext,
    options: CodegenOptions,
}

impl Generator {
    pub fn new(options: CodegenOptions) -> Self {
        Self { ctx: CodegenContext::new(), options }
    }

    /// Generates the full C translation unit.
    pub fn generate(mut self, statements: &[Statement]) -> CompileResult<String> {
        for stmt in statements {
            if let Statement::FunctionDefinition { name, params, body } = stmt {
                let function = self.function(name, params, body)?;
                self.ctx.generated_functions.push(function);
            }
        }

        let main = self.main(statements)?;

        let mut output = String::new();
        self.write_header(&mut output);
        self.write_globals(&mut output);
        for function in &self.ctx.generated_functions {
            output.push_str(function);
        }
        output.push_str(&main);
        output.push_str(RUNTIME_DEFINITIONS);

        tracing::debug!(
            functions = self.ctx.generated_functions.len(),
            bytes = output.len(),
            "generated C source"
        );
        Ok(output)
    }

    fn write_header(&self, output: &mut String) {
        for include in &self.ctx.required_includes {
            _ = writeln!(output, "#include <{include}>");
        }
        output.push('\n');
        output.push_str(RUNTIME_DECLARATIONS);
    }

    fn write_globals(&self, output: &mut String) {
        output.push_str("// Global variables\n");
        for name in &self.ctx.global_variable_names {
            _ = writeln!(output, "{VALUE_TYPE} {name};");
        }
        output.push('\n');
    }

    fn function(&mut self, name: &str, params: &[String], body: &str) -> CompileResult<String> {
        if name.is_empty() {
            return Err(CompileError::new("function definition is missing a name"));
        }

        let c_name = self.identifier(name);
        let mut c_params = Vec::with_capacity(params.len());
        for param in params {
            if param.is_empty() {
                return Err(CompileError::new(format!(
                    "function `{name}` has an empty parameter name"
                )));
            }
            c_params.push(format!("{VALUE_TYPE} {}", self.identifier(param)));
        }
        let c_params = if c_params.is_empty() { "void".to_string() } else { c_params.join(", ") };

        // Parameters only shape the signature. The body is searched for a return marker.
        let result = match body.split_once(RETURN) {
            Some((_, value)) => self.value(value.trim(), false),
            None => "luoyan_make_unit()".to_string(),
        };

        let mut output = String::new();
        _ = writeln!(output, "{VALUE_TYPE} {c_name}({c_params}) {{");
        _ = writeln!(output, "    return {result};");
        output.push_str("}\n\n");
        Ok(output)
    }

    fn main(&mut self, statements: &[Statement]) -> CompileResult<String> {
        let mut output = String::from("int main(void) {\n");

        for stmt in statements {
            match stmt {
                Statement::VarDeclaration { name, value } => {
                    if name.is_empty() {
                        return Err(CompileError::new("variable declaration is missing a name"));
                    }
                    let c_name = self.identifier(name);
                    let init = self.value(value, false);
                    _ = writeln!(output, "    {VALUE_TYPE} {c_name} = {init};");
                }
                Statement::Print { value } => {
                    let value = self.value(value, true);
                    _ = writeln!(output, "    luoyan_print({value});");
                }
                Statement::Literal { text } => {
                    let value = self.value(text, false);
                    _ = writeln!(output, "    luoyan_print({value});");
                }
                Statement::StringLiteral { text } => {
                    let text = c_string_literal(text);
                    _ = writeln!(output, "    luoyan_print(luoyan_make_string({text}));");
                }
                Statement::FunctionDefinition { .. } | Statement::Return { .. } => {}
            }
        }

        output.push_str("    return 0;\n");
        output.push_str("}\n\n");
        Ok(output)
    }

    /// Lowers raw value text to a C expression of type `luoyan_value_t`.
    ///
    /// `allow_reference` enables `「name」` as a read of a previously declared local.
    fn value(&mut self, raw: &str, allow_reference: bool) -> String {
        if let Some(int) = int_literal(raw) {
            return format!("luoyan_make_int({int})");
        }
        if let Some(text) = strip_delimiters(raw, STRING_OPEN, STRING_CLOSE) {
            return format!("luoyan_make_string({})", c_string_literal(text));
        }
        if allow_reference {
            match strip_delimiters(raw, REFERENCE_OPEN, REFERENCE_CLOSE) {
                Some(name) if !name.is_empty() => return self.identifier(name),
                _ => {}
            }
        }
        format!("luoyan_make_string({})", c_string_literal(raw))
    }

    fn identifier(&mut self, name: &str) -> String {
        let escaped = escape_identifier(name);
        if !self.options.disambiguate_identifiers {
            return escaped;
        }

        let id = match self.ctx.assigned.get(name) {
            Some(&id) => id,
            None => {
                let id = self.ctx.variable_counter;
                self.ctx.variable_counter += 1;
                self.ctx.assigned.insert(name.to_string(), id);
                id
            }
        };
        format!("{escaped}_{id}")
    }
}

/// Turns a source name into a C identifier: `luoyan_` plus the name with every character
/// outside `[A-Za-z0-9_]` replaced by `_`. Distinct names may map to the same identifier.
pub fn escape_identifier(name: &str) -> String {
    let mut out = String::with_capacity(IDENT_PREFIX.len() + name.len());
    out.push_str(IDENT_PREFIX);
    out.extend(name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }));
    if RUNTIME_IDENTIFIERS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Quotes `text` as a C string literal.
pub fn c_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A run of ASCII digits that fits in a C `int`, without leading zeros.
fn int_literal(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn strip_delimiters(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(statements: &[Statement]) -> String {
        Generator::new(CodegenOptions::default()).generate(statements).unwrap()
    }

    fn main_body(output: &str) -> &str {
        let start = output.find("int main(void) {\n").unwrap();
        let end = output[start..].find("}\n").unwrap();
        &output[start..start + end]
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("计数"), "luoyan___");
        assert_eq!(escape_identifier("count_2"), "luoyan_count_2");
        assert_eq!(escape_identifier("a-b"), escape_identifier("a_b"));
    }

    #[test]
    fn test_c_string_literal() {
        assert_eq!(c_string_literal("你好"), "\"你好\"");
        assert_eq!(c_string_literal(r#"say "hi"\"#), r#""say \"hi\"\\""#);
        assert_eq!(c_string_literal("a\tb\u{1}"), "\"a\\tb\\001\"");
    }

    #[test]
    fn test_block_order() {
        let out = generate(&[
            Statement::Print { value: "1".into() },
            Statement::FunctionDefinition { name: "f".into(), params: vec![], body: "".into() },
        ]);

        let header = out.find("#include <stdio.h>").unwrap();
        let typedef = out.find("} luoyan_value_t;").unwrap();
        let globals = out.find("// Global variables").unwrap();
        let function = out.find("luoyan_value_t luoyan_f(void) {").unwrap();
        let main = out.find("int main(void) {").unwrap();
        let runtime = out.find("// LuoYan runtime helper implementations").unwrap();
        assert!(header < typedef && typedef < globals && globals < function);
        assert!(function < main && main < runtime);
    }

    #[test]
    fn test_header_includes_and_declarations() {
        let out = generate(&[]);
        assert!(out.starts_with("#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n"));
        for decl in [
            "void luoyan_print(luoyan_value_t val);",
            "luoyan_value_t luoyan_make_int(int val);",
            "luoyan_value_t luoyan_make_string(const char* val);",
            "luoyan_value_t luoyan_make_unit(void);",
        ] {
            assert!(out.contains(decl), "missing {decl}");
        }
        assert_eq!(main_body(&out), "int main(void) {\n    return 0;\n");
    }

    #[test]
    fn test_var_declaration_lowering() {
        let out = generate(&[
            Statement::VarDeclaration { name: "甲".into(), value: "42".into() },
            Statement::VarDeclaration { name: "乙".into(), value: "『你好』".into() },
            Statement::VarDeclaration { name: "丙".into(), value: "x 加 1".into() },
        ]);
        let main = main_body(&out);
        assert!(main.contains("    luoyan_value_t luoyan__ = luoyan_make_int(42);\n"));
        assert!(main.contains("    luoyan_value_t luoyan__ = luoyan_make_string(\"你好\");\n"));
        assert!(main.contains("    luoyan_value_t luoyan__ = luoyan_make_string(\"x 加 1\");\n"));
    }

    #[test]
    fn test_print_lowering() {
        let out = generate(&[
            Statement::Print { value: "7".into() },
            Statement::Print { value: "『你好』".into() },
            Statement::Print { value: "「count」".into() },
            Statement::Print { value: "「」".into() },
            Statement::Print { value: "随便".into() },
        ]);
        let main = main_body(&out);
        assert!(main.contains("    luoyan_print(luoyan_make_int(7));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"你好\"));\n"));
        assert!(main.contains("    luoyan_print(luoyan_count);\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"「」\"));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"随便\"));\n"));
    }

    #[test]
    fn test_reference_only_in_print() {
        let out =
            generate(&[Statement::VarDeclaration { name: "a".into(), value: "「b」".into() }]);
        assert!(out.contains("luoyan_value_t luoyan_a = luoyan_make_string(\"「b」\");"));
    }

    #[test]
    fn test_function_returns() {
        let out = generate(&[
            Statement::FunctionDefinition {
                name: "answer".into(),
                params: vec!["x".into(), "y".into()],
                body: "答 42".into(),
            },
            Statement::FunctionDefinition {
                name: "greet".into(),
                params: vec![],
                body: "答 『hi』".into(),
            },
            Statement::FunctionDefinition { name: "noop".into(), params: vec![], body: "".into() },
        ]);
        assert!(out.contains(concat!(
            "luoyan_value_t luoyan_answer(luoyan_value_t luoyan_x, luoyan_value_t luoyan_y) {\n",
            "    return luoyan_make_int(42);\n}\n",
        )));
        assert!(out.contains(
            "luoyan_value_t luoyan_greet(void) {\n    return luoyan_make_string(\"hi\");\n}\n"
        ));
        assert!(
            out.contains("luoyan_value_t luoyan_noop(void) {\n    return luoyan_make_unit();\n}\n")
        );
        // Function definitions don't leak into main.
        assert!(!main_body(&out).contains("answer"));
    }

    #[test]
    fn test_literals_at_top_level() {
        let out = generate(&[
            Statement::Literal { text: "5".into() },
            Statement::Literal { text: "2.5".into() },
            Statement::StringLiteral { text: "say \"x\"".into() },
            Statement::Return { value: "1".into() },
        ]);
        let main = main_body(&out);
        assert!(main.contains("    luoyan_print(luoyan_make_int(5));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"2.5\"));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"say \\\"x\\\"\"));\n"));
        assert_eq!(main.matches("luoyan_print").count(), 3);
    }

    #[test]
    fn test_missing_names_fail() {
        let err = Generator::new(CodegenOptions::default())
            .generate(&[Statement::FunctionDefinition {
                name: String::new(),
                params: vec![],
                body: String::new(),
            }])
            .unwrap_err();
        assert!(err.message.contains("missing a name"));

        let err = Generator::new(CodegenOptions::default())
            .generate(&[Statement::VarDeclaration { name: String::new(), value: "1".into() }])
            .unwrap_err();
        assert!(err.message.contains("missing a name"));
    }

    #[test]
    fn test_disambiguated_identifiers() {
        let options = CodegenOptions { disambiguate_identifiers: true };
        let out = Generator::new(options)
            .generate(&[
                Statement::VarDeclaration { name: "甲".into(), value: "1".into() },
                Statement::VarDeclaration { name: "乙".into(), value: "2".into() },
                Statement::Print { value: "「甲」".into() },
            ])
            .unwrap();
        assert!(out.contains("luoyan_value_t luoyan___0 = luoyan_make_int(1);"));
        assert!(out.contains("luoyan_value_t luoyan___1 = luoyan_make_int(2);"));
        assert!(out.contains("luoyan_print(luoyan___0);"));
    }

    #[test]
    fn test_integers_are_normalized() {
        let out = generate(&[
            Statement::VarDeclaration { name: "a".into(), value: "010".into() },
            Statement::Print { value: "09".into() },
            Statement::Print { value: "000".into() },
            Statement::Print { value: "99999999999".into() },
            Statement::Print { value: "2147483647".into() },
            Statement::Literal { text: "007".into() },
        ]);
        let main = main_body(&out);
        assert!(main.contains("    luoyan_value_t luoyan_a = luoyan_make_int(10);\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_int(9));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_int(0));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_string(\"99999999999\"));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_int(2147483647));\n"));
        assert!(main.contains("    luoyan_print(luoyan_make_int(7));\n"));
    }

    #[test]
    fn test_integer_returns_are_normalized() {
        let out = generate(&[Statement::FunctionDefinition {
            name: "f".into(),
            params: vec![],
            body: "答 0042".into(),
        }]);
        assert!(
            out.contains("luoyan_value_t luoyan_f(void) {\n    return luoyan_make_int(42);\n}\n")
        );
    }

    #[test]
    fn test_names_cannot_shadow_the_runtime() {
        assert_eq!(escape_identifier("print"), "luoyan_print_");
        assert_eq!(escape_identifier("make_int"), "luoyan_make_int_");
        assert_eq!(escape_identifier("value_t"), "luoyan_value_t_");
        assert_eq!(escape_identifier("printer"), "luoyan_printer");

        let out = generate(&[
            Statement::VarDeclaration { name: "print".into(), value: "1".into() },
            Statement::Print { value: "「print」".into() },
        ]);
        let main = main_body(&out);
        assert!(main.contains("    luoyan_value_t luoyan_print_ = luoyan_make_int(1);\n"));
        assert!(main.contains("    luoyan_print(luoyan_print_);\n"));
    }

    #[test]
    fn test_fresh_context() {
        let ctx = CodegenContext::new();
        assert_eq!(ctx.variable_counter, 0);
        assert!(ctx.global_variable_names.is_empty());
        assert!(ctx.generated_functions.is_empty());
        assert_eq!(ctx.required_includes.len(), 3);
    }
}
