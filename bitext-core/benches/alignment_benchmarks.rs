//! Segmentation and alignment throughput
//!
//! Run with: cargo bench --bench alignment_benchmarks

use bitext_core::align::{align, AlignOptions};
use bitext_core::catalog::keys::normalized_key;
use bitext_core::segment::{LocaleRegistry, Segmenter};
use bitext_core::Language;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;

const AR_SENTENCE: &str = "ذهب الولد إلى المدرسة في الصباح الباكر. ";
const EN_SENTENCE: &str = "The boy went to school early in the morning. ";

fn paragraph(sentence: &str, count: usize) -> String {
    sentence.repeat(count)
}

fn segmenter() -> Segmenter {
    Segmenter::new(
        Arc::new(LocaleRegistry::embedded().expect("embedded locales load")),
        Language::En,
    )
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let segmenter = segmenter();

    for sentences in [1, 10, 100] {
        for (lang, sentence) in [(Language::Ar, AR_SENTENCE), (Language::En, EN_SENTENCE)] {
            let text = paragraph(sentence, sentences);
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(lang.code(), sentences),
                &text,
                |b, text| b.iter(|| segmenter.segment(black_box(text), Some(lang))),
            );
        }
    }

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");
    let segmenter = segmenter();
    let options = AlignOptions::default();

    for sentences in [10, 100, 1000] {
        let source = segmenter.segment(&paragraph(AR_SENTENCE, sentences), Some(Language::Ar));
        let target = segmenter.segment(&paragraph(EN_SENTENCE, sentences), Some(Language::En));

        group.throughput(Throughput::Elements(sentences as u64));
        group.bench_function(BenchmarkId::new("positional", sentences), |b| {
            b.iter(|| align(black_box(&source), black_box(&target), &options))
        });
    }

    group.finish();
}

fn bench_keys(c: &mut Criterion) {
    let names = [
        "Chapter_IV_AR",
        "Chapter 04 English",
        "book-2-part-xii-en",
        "introduction (arabic) final",
    ];
    c.bench_function("normalized_key", |b| {
        b.iter(|| {
            for name in &names {
                black_box(normalized_key(black_box(name)));
            }
        })
    });
}

criterion_group!(benches, bench_segmentation, bench_alignment, bench_keys);
criterion_main!(benches);
