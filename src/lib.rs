// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

//! Language support for LuoYan (洛言), a Chinese-keyword programming language.
//!
//! * [`highlight`] is the incremental line tokenizer used for syntax coloring.
//! * [`mode`] adapts it to a host editor (brackets, folding, hover help, formatting).
//! * [`compiler`] is the line-oriented preview compiler that emits C.
//! * [`pipeline`] wires the compiler to user actions (artifacts, previews, the external compiler).

pub mod apperr;
pub mod compiler;
pub mod config;
pub mod highlight;
pub mod mode;
pub mod pipeline;
