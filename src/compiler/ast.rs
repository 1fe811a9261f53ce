// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

/// One recognized source line.
///
/// Values are kept as raw text. The code generator decides what they mean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// `设「name」为 value`
    VarDeclaration { name: String, value: String },
    /// `打印 value`
    Print { value: String },
    /// `夫「name」者受 params 焉算法乃 body`
    FunctionDefinition { name: String, params: Vec<String>, body: String },
    /// `答 value`
    Return { value: String },
    /// A line that is a bare number.
    Literal { text: String },
    /// A line that is a bare `『…』` string, without its delimiters.
    StringLiteral { text: String },
}
