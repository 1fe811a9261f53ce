// Copyright (c) LuoYan contributors.
// Licensed under the MIT License.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use luoyan::compiler;
use luoyan::highlight::{HighlightState, LexerState, tokenize_line};

const SAMPLE: &str = "\
「：示例程序 「：嵌套注释：」 结束：」
设「计数」为 42
设「问候」为 『你好，世界』
夫「加一」者受 x 焉算法乃 答 x 加 1
打印 「计数」
打印 『结果是 \\『转义\\』』
让 xs = [1; 2; 3] in List.map (fun x -> x * 2) xs
若 「计数」 大于等于 10 则 打印 'a' 余者 打印 3.14e2
";

fn document(repeat: usize) -> String {
    SAMPLE.repeat(repeat)
}

fn bench_tokenize(c: &mut Criterion) {
    let text = document(64);
    c.bench_function("highlight::tokenize_line", |b| {
        let mut tokens = Vec::new();
        b.iter(|| {
            let mut state = LexerState::INITIAL;
            for line in black_box(&text).lines() {
                tokens.clear();
                state = tokenize_line(line, state, &mut tokens);
            }
            black_box(state)
        });
    });
}

fn bench_recompute(c: &mut Criterion) {
    let text = document(64);
    let lines: Vec<&str> = text.lines().collect();
    c.bench_function("highlight::recompute_states", |b| {
        b.iter(|| {
            let mut cache = HighlightState::new();
            cache.recompute_states(0, &|i| lines.get(i).copied());
            black_box(cache)
        });
    });
}

fn bench_compile(c: &mut Criterion) {
    let text = document(64);
    c.bench_function("compiler::compile_to_c", |b| {
        b.iter(|| compiler::compile_to_c(black_box(&text)));
    });
}

criterion_group!(benches, bench_tokenize, bench_recompute, bench_compile);
criterion_main!(benches);
