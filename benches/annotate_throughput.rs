//! Annotation throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prost::Message;
use std::ffi::CString;

use annotator_core::engine::{annotate, load_model};
use annotator_core::ffi::{
    annotator_annotate, annotator_free, annotator_free_bytebuffer, annotator_load, ExternError,
};
use annotator_core::scheduler::Parallelism;
use annotator_core::sentences::{proto, Sentence, Token};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/dutch-small/annotator.toml"
);

const TEMPLATES: &[&str] = &[
    "Dit is een test .",
    "De kat slaapt hier .",
    "Ik lees een boek in de tuin .",
    "De kat slaapt",
];

fn corpus(n: usize) -> Vec<Sentence> {
    (0..n)
        .map(|i| {
            TEMPLATES[i % TEMPLATES.len()]
                .split_whitespace()
                .map(Token::new)
                .collect()
        })
        .collect()
}

fn serialized(n: usize) -> Vec<u8> {
    let sentences = corpus(n);
    proto::Sentences {
        sentences: sentences.iter().map(proto::Sentence::from).collect(),
    }
    .encode_to_vec()
}

fn bench_engine(c: &mut Criterion) {
    let model = load_model(FIXTURE).expect("fixture model loads");
    let mut group = c.benchmark_group("engine_annotate");

    for (name, parallelism) in [
        ("sequential", Parallelism::sequential()),
        ("parallel", Parallelism { intra_op: 2, inter_op: 4 }),
    ] {
        for n in [64usize, 1024] {
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, &n| {
                b.iter_batched(
                    || corpus(n),
                    |sentences| annotate(model.as_ref(), black_box(sentences), 32, parallelism),
                    criterion::BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

fn bench_ffi(c: &mut Criterion) {
    let path = CString::new(FIXTURE).unwrap();
    let mut err = ExternError::default();
    let handle = unsafe { annotator_load(path.as_ptr(), &mut err) };
    assert!(err.is_success());

    let mut group = c.benchmark_group("ffi_annotate");
    for batch_size in [0usize, 8, 64] {
        let bytes = serialized(512);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("batch_size", batch_size), &bytes, |b, bytes| {
            b.iter(|| unsafe {
                let mut err = ExternError::default();
                let buffer = annotator_annotate(
                    handle,
                    bytes.as_ptr(),
                    bytes.len() as i32,
                    batch_size,
                    &mut err,
                );
                annotator_free_bytebuffer(black_box(buffer));
            })
        });
    }
    group.finish();

    unsafe { annotator_free(handle, &mut err) };
}

criterion_group!(benches, bench_engine, bench_ffi);
criterion_main!(benches);
