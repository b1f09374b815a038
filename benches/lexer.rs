//! Lexer benchmarks
//!
//! Run with: cargo bench --bench lexer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsparse::lexer::{Lexer, TokenKind};

/// Simple expression
const SIMPLE_EXPR: &str = "1 + 2 * 3 - 4 / 5";

/// Variable declarations
const VARIABLES: &str = r#"
let x = 1;
const y = 2;
var z = 3;
let a = x + y + z;
const b = a * 2;
"#;

/// String literals with escapes
const STRINGS: &str = r#"
const hello = "Hello, World!";
const escaped = "Line1\nLine2\tTabbed";
const unicode = "\u{1F600} emoji A";
const template = `Hello ${name}!`;
"#;

/// Operators stress test
const OPERATORS: &str = r#"
a + b - c * d / e % f ** g;
x === y !== z == w != v;
a && b || c;
a & b | c ^ d & ~e;
a << 2 >> 3 >>> 4;
a += b;
c **= d;
e &&= f;
g ??= h;
++i;
j--;
k?.l;
m ?? n;
"#;

/// Class definition
const CLASS_DEF: &str = r#"
class Counter extends Base {
    #count = 0;
    static instances = 0;
    constructor(name) {
        super(name);
        Counter.instances++;
    }
    get count() {
        return this.#count;
    }
    increment(by = 1) {
        this.#count += by;
        return this;
    }
    async *drain() {
        while (this.#count > 0) {
            yield await this.take();
        }
    }
}
"#;

fn lex_all(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => break,
            Ok(_) => count += 1,
            Err(_) => break,
        }
    }
    count
}

fn bench_snippets(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let cases = [
        ("simple_expr", SIMPLE_EXPR),
        ("variables", VARIABLES),
        ("strings", STRINGS),
        ("operators", OPERATORS),
        ("class_def", CLASS_DEF),
    ];
    for (name, source) in cases {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| lex_all(black_box(source)));
        });
    }
    group.finish();
}

fn bench_large_input(c: &mut Criterion) {
    let source = CLASS_DEF.repeat(100);
    let mut group = c.benchmark_group("lexer_large");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("class_def_x100", |b| {
        b.iter(|| lex_all(black_box(&source)));
    });
    group.finish();
}

criterion_group!(benches, bench_snippets, bench_large_input);
criterion_main!(benches);
