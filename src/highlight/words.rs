// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Word lists used to classify identifier runs and operators.

pub const KEYWORDS: &[&str] = &[
    // Core syntax
    "设", "为", "夫", "者", "受", "焉", "算法", "乃", "打印", "观", "之", "性", "若", "则", "答",
    "余者", "观毕", "也",
    // Conditionals and loops
    "如果", "否则", "当", "循环", "直到", "对于", "在",
    // Data types
    "整数", "浮点", "字符串", "布尔", "列表", "记录",
    // Pattern matching
    "匹配", "模式", "守卫",
    // Functions
    "函数", "返回", "递归", "尾递归",
    // Types
    "类型", "变体", "构造子", "约束",
    // Modules
    "模块", "导入", "导出", "开放",
    // Exceptions
    "尝试", "捕获", "抛出", "最终",
    // Concurrency
    "并行", "等待", "异步",
    // ML-style keywords
    "let", "in", "if", "then", "else", "match", "with", "when", "function", "fun", "rec", "and",
    "type", "of", "module", "open", "include", "val", "external", "mutable", "ref", "try",
    "exception", "raise", "failwith", "assert",
    // Constants
    "true", "false", "unit", "Some", "None", "Ok", "Error",
];

pub const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "char", "unit", "list", "array", "option", "result", "ref",
    "整型", "浮点型", "字符串型", "布尔型", "字符型", "单元型", "列表型", "数组型", "选项型",
    "结果型", "引用型",
];

pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "print", "print_endline", "print_int", "print_float", "read_line", "read_int", "read_float",
    "List.map", "List.fold_left", "List.fold_right", "List.iter", "String.length",
    "String.concat", "String.sub", "Array.length", "Array.get", "Array.set", "Array.make",
    "Printf.printf", "Printf.sprintf", "打印", "打印行", "打印整数", "打印浮点", "读取行",
    "读取整数", "读取浮点", "映射", "左折叠", "右折叠", "迭代", "长度", "连接", "子串", "获取",
    "设置", "创建",
];

/// Multi-character symbolic operators, longest first.
pub const MULTI_CHAR_OPERATORS: &[&str] = &["<->", "->", "<-", "<=", ">=", "<>", "::", ";;", ":="];

pub const SINGLE_CHAR_OPERATORS: &[char] =
    &['+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', '^', '~', '@'];

/// Operators spelled as whole words, longest first so `小于等于` wins over `小于`.
pub const WORD_OPERATORS: &[&str] = &[
    "小于等于", "大于等于", "不等于", "等于", "小于", "大于", "mod", "not", "加", "减", "乘", "除",
    "且", "或", "非",
];

pub const ASCII_PUNCTUATION: &[char] = &['(', ')', '[', ']', '{', '}', ',', '.', ';', ':', '|'];

pub const WIDE_PUNCTUATION: &[char] =
    &['，', '。', '；', '：', '！', '？', '（', '）', '【', '】', '〈', '〉', '「', '」', '『', '』'];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_builtin_type(word: &str) -> bool {
    BUILTIN_TYPES.contains(&word)
}

pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&word)
}

pub fn is_word_operator(word: &str) -> bool {
    WORD_OPERATORS.contains(&word)
}

pub fn is_punctuation(ch: char) -> bool {
    ASCII_PUNCTUATION.contains(&ch) || WIDE_PUNCTUATION.contains(&ch)
}
