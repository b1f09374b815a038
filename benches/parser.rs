//! Parser benchmarks
//!
//! Run with: cargo bench --bench parser

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsparse::{parse, ParseOptions, SourceType};

/// Expression-heavy code
const EXPRESSIONS: &str = r#"
const a = 1 + 2 * 3 - 4 / 5;
const b = a ** 2 ** 3;
const c = a < b ? a ?? b : (a, b);
const d = obj?.path?.[key]?.(arg, ...rest);
const e = { x: 1, y, [computed]: 2, ...spread };
const f = [1, , 3, ...tail];
"#;

/// Statement-heavy code
const STATEMENTS: &str = r#"
outer: for (let i = 0; i < 100; i++) {
    if (i % 2 === 0) continue;
    switch (i % 3) {
        case 0:
            break outer;
        default:
            total += i;
    }
    try {
        risky(i);
    } catch (e) {
        log(e);
    } finally {
        cleanup();
    }
}
while (pending.length) {
    process(pending.pop());
}
"#;

/// Function and class declarations
const DECLARATIONS: &str = r#"
function add(a, b = 0, ...rest) {
    return rest.reduce((x, y) => x + y, a + b);
}
async function load(url) {
    const response = await fetch(url);
    return response.json();
}
function* range(from, to) {
    for (let i = from; i < to; i++) yield i;
}
class Point {
    #x = 0;
    #y = 0;
    constructor(x, y) {
        this.#x = x;
        this.#y = y;
    }
    get length() {
        return Math.sqrt(this.#x ** 2 + this.#y ** 2);
    }
    static origin() {
        return new Point(0, 0);
    }
}
"#;

/// Module with imports and exports
const MODULE: &str = r#"
import framework, { mount, unmount as detach } from "framework";
import * as helpers from "./helpers";
export const registry = new Map();
export function register(name, component) {
    registry.set(name, component);
}
export default class App {
    start(root) {
        mount(framework.create(this), root);
    }
}
export * from "./components";
"#;

fn bench_snippets(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let cases = [
        ("expressions", EXPRESSIONS, SourceType::Script),
        ("statements", STATEMENTS, SourceType::Script),
        ("declarations", DECLARATIONS, SourceType::Script),
        ("module", MODULE, SourceType::Module),
    ];
    for (name, source, source_type) in cases {
        let options = ParseOptions { source_type };
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| parse(black_box(source), options).unwrap());
        });
    }
    group.finish();
}

fn bench_large_input(c: &mut Criterion) {
    let source = DECLARATIONS.repeat(50);
    let options = ParseOptions {
        source_type: SourceType::Script,
    };
    let mut group = c.benchmark_group("parser_large");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("declarations_x50", |b| {
        b.iter(|| parse(black_box(&source), options).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_snippets, bench_large_input);
criterion_main!(benches);
