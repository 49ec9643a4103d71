//! Class generation benchmarks.

use classforge::{Compiler, MemorySink};
use classforge_bench::{compiled_size, nested_schema, wide_schema};
use classforge_codegen::{ArtifactEmitter, EmitterConfig};
use classforge_core::ClassFile;
use classforge_schema::{build_model, parse_document};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn benchmark_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_all");

    for fields in [8, 32, 128] {
        let schema = wide_schema(fields);
        let model = build_model(&parse_document(&schema.to_string()).unwrap()).unwrap();
        let emitter = ArtifactEmitter::new(EmitterConfig::default());

        group.throughput(Throughput::Bytes(compiled_size(&schema).unwrap() as u64));
        group.bench_with_input(BenchmarkId::new("wide", fields), &model, |b, model| {
            b.iter(|| emitter.emit_all(black_box(model)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_compile(c: &mut Criterion) {
    let text = nested_schema(8).to_string();
    let compiler = Compiler::builder()
        .package_name("com.example.bench")
        .build()
        .unwrap();

    c.bench_function("compile_str_nested_8", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new();
            compiler.compile_str(black_box(&text), &mut sink).unwrap();
            sink
        })
    });
}

fn benchmark_read_class(c: &mut Criterion) {
    let mut sink = MemorySink::new();
    Compiler::default()
        .compile_value(&wide_schema(32), &mut sink)
        .unwrap();
    let bytes = sink.into_artifacts().remove(0).bytes;

    c.bench_function("class_file_parse_wide_32", |b| {
        b.iter(|| ClassFile::parse(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, benchmark_emit, benchmark_compile, benchmark_read_class);
criterion_main!(benches);
