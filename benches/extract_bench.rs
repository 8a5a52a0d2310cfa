//! Benchmarks for the Symbol Scout extraction engine.
//!
//! Run with: `cargo bench`
//!
//! - Wide trees: many top-level declarations and imports
//! - Deep trees: long nesting chains walked by the work-list
//! - Parse + extract over generated JavaScript source

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use symbol_scout::infrastructure::TreeSitterSource;
use symbol_scout::ports::TreeSource;
use symbol_scout::{extract, ExtractConfig, FieldValue, SymbolExtractor, SyntaxTree, TreeBuilder};

// ═══════════════════════════════════════════════════════════════════════════
// Synthetic Data Generators
// ═══════════════════════════════════════════════════════════════════════════

/// A program with `count` functions, classes and single-specifier imports.
fn wide_tree(count: usize) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let root = b.add_node("Program");
    let mut body = Vec::with_capacity(count * 3);

    for i in 0..count {
        let func = b.add_node("FunctionDeclaration");
        let func_id = b.add_identifier(format!("func_{}", i));
        b.push_field(func, "id", FieldValue::Node(func_id));
        body.push(FieldValue::Node(func));

        let class = b.add_node("ClassDeclaration");
        let class_id = b.add_identifier(format!("Class{}", i % 100));
        b.push_field(class, "id", FieldValue::Node(class_id));
        body.push(FieldValue::Node(class));

        let import = b.add_node("ImportDeclaration");
        let spec = b.add_node("ImportSpecifier");
        let local = b.add_identifier(format!("dep_{}", i));
        b.push_field(spec, "local", FieldValue::Node(local));
        b.push_field(import, "specifiers", FieldValue::Sequence(vec![FieldValue::Node(spec)]));
        body.push(FieldValue::Node(import));
    }

    b.push_field(root, "body", FieldValue::Sequence(body));
    b.set_root(root);
    b.finish()
}

/// A single chain `depth` blocks deep with a function at the bottom.
fn deep_tree(depth: usize) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let root = b.add_node("Program");
    let mut parent = root;
    for _ in 0..depth {
        let block = b.add_node("BlockStatement");
        b.push_field(parent, "body", FieldValue::Node(block));
        parent = block;
    }
    let func = b.add_node("FunctionDeclaration");
    let ident = b.add_identifier("bottom");
    b.push_field(func, "id", FieldValue::Node(ident));
    b.push_field(parent, "body", FieldValue::Node(func));
    b.set_root(root);
    b.finish()
}

fn javascript_source(count: usize) -> String {
    let mut src = String::new();
    for i in 0..count {
        src.push_str(&format!("import {{ dep{i} as local{i} }} from './dep{i}';\n"));
        src.push_str(&format!(
            "export function handler{i}(req) {{ class Local{i} {{}} return new Local{i}(req); }}\n"
        ));
    }
    src
}

// ═══════════════════════════════════════════════════════════════════════════
// Benchmarks
// ═══════════════════════════════════════════════════════════════════════════

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_wide");
    for count in [100, 1_000, 10_000] {
        let tree = wide_tree(count);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &tree, |b, tree| {
            b.iter(|| extract(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let extractor = SymbolExtractor::new(ExtractConfig {
        max_depth: None,
        ..ExtractConfig::default()
    });
    let mut group = c.benchmark_group("extract_deep");
    for depth in [1_000, 100_000] {
        let tree = deep_tree(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| extractor.extract(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

fn bench_parse_and_extract(c: &mut Criterion) {
    let source = javascript_source(500);
    let parser = TreeSitterSource::javascript();
    let mut group = c.benchmark_group("parse_and_extract");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("javascript_500_modules", |b| {
        b.iter(|| {
            let tree = parser.parse(black_box(&source)).unwrap();
            extract(&tree).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_wide, bench_deep, bench_parse_and_extract);
criterion_main!(benches);
