//! Performance benchmarks for package compilation.
//!
//! Packages are generated in an arena up front; each iteration loads every
//! file, resolves the entry point and lowers the reachable call graph.
//!
//! - Call chains: `main -> f0 -> f1 -> ... -> fN`
//! - Fan-out: every function calls the next few, so most callees are
//!   referenced many times but lowered once
//! - Many files: declarations spread across files with their own imports
//! - Library: loading only, nothing is lowered
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use qlang::prelude::*;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

// ============================================================================
// Package generators
// ============================================================================

fn fn_name(i: usize) -> String {
    format!("f{i}")
}

/// `main` calls `f0`, each `fi` calls `f(i+1)`.
fn call_chain<'ast>(b: AstBuilder<'ast>, len: usize) -> Package<'ast> {
    let mut decls = vec![b.func("main", &[], &[b.call_stmt(&fn_name(0))])];
    for i in 0..len {
        let body: Vec<_> = if i + 1 < len {
            vec![b.call_stmt(&fn_name(i + 1))]
        } else {
            Vec::new()
        };
        decls.push(b.func(&fn_name(i), &[], &body));
    }
    b.package("main", &[b.file("chain.ql", &decls)])
}

/// Every function calls the next `width` functions.
fn fan_out<'ast>(b: AstBuilder<'ast>, len: usize, width: usize) -> Package<'ast> {
    let entry: Vec<_> = (0..width.min(len)).map(|i| b.call_stmt(&fn_name(i))).collect();
    let mut decls = vec![b.func("main", &[], &entry)];
    for i in 0..len {
        let body: Vec<_> = (i + 1..(i + 1 + width).min(len))
            .map(|j| b.call_stmt(&fn_name(j)))
            .collect();
        decls.push(b.func(&fn_name(i), &[], &body));
    }
    b.package("main", &[b.file("fan.ql", &decls)])
}

/// `files` files of `per_file` functions each. Every function calls into
/// the next file and an imported package.
fn many_files<'ast>(b: AstBuilder<'ast>, files: usize, per_file: usize) -> Package<'ast> {
    let total = files * per_file;
    let mut out = Vec::with_capacity(files + 1);
    for f in 0..files {
        let mut decls = vec![b.imports(&[b.import("strings")])];
        for k in 0..per_file {
            let i = f * per_file + k;
            let mut body = vec![b.expr_stmt(b.call(
                b.select(b.name("strings"), "ToUpper"),
                &[b.string("x")],
            ))];
            if i + per_file < total {
                body.push(b.call_stmt(&fn_name(i + per_file)));
            }
            decls.push(b.func(&fn_name(i), &[], &body));
        }
        out.push(b.file(&format!("file{f}.ql"), &decls));
    }
    let entry: Vec<_> = (0..per_file.min(total)).map(|i| b.call_stmt(&fn_name(i))).collect();
    out.push(b.file("main.ql", &[b.func("main", &[], &entry)]));
    b.package("main", &out)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn compile(package: &Package<'_>) -> usize {
    let compiled = qlang::compile(package, CompilerOptions::default()).unwrap();
    end_profiling_frame();
    compiled.code.len()
}

fn call_graph_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let mut group = c.benchmark_group("package/call_graph");
    for len in [10, 100, 1000] {
        let package = call_chain(b, len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(format!("chain_{len}"), |bench| {
            bench.iter(|| black_box(compile(black_box(&package))));
        });
    }

    for (len, width) in [(100, 8), (1000, 8), (1000, 32)] {
        let package = fan_out(b, len, width);
        group.throughput(Throughput::Elements((len * width) as u64));
        group.bench_function(format!("fan_out_{len}x{width}"), |bench| {
            bench.iter(|| black_box(compile(black_box(&package))));
        });
    }
    group.finish();
}

fn loading_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let mut group = c.benchmark_group("package/loading");
    for (files, per_file) in [(10, 10), (50, 20)] {
        let package = many_files(b, files, per_file);
        group.throughput(Throughput::Elements((files * per_file) as u64));
        group.bench_function(format!("files_{files}x{per_file}"), |bench| {
            bench.iter(|| black_box(compile(black_box(&package))));
        });
    }

    let library = {
        let chain = call_chain(b, 1000);
        b.package("lib", chain.files)
    };
    group.throughput(Throughput::Elements(1000));
    group.bench_function("library_1000", |bench| {
        bench.iter(|| {
            let pkg = PackageBuilder::new().build(black_box(&library)).unwrap();
            end_profiling_frame();
            black_box(pkg.funcs().len())
        });
    });
    group.finish();
}

criterion_group!(benches, call_graph_benchmarks, loading_benchmarks);
criterion_main!(benches);
