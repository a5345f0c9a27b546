//! Benchmarks for tag merging and caption building.
//!
//! Run with: cargo bench -p framecap-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use framecap_core::tagging::{build_caption, merge, CaptionConfig};
use framecap_core::types::TagRecord;

const VOCAB: &[&str] = &[
    "Outdoor", "tree", "Blue Sky", "landscape", "grass", "nsfw", "cloud", "road", "car",
    "building", "person", "water", "mountain", "night", "city_lights",
];

/// `images` images, each tagged by three sources with overlapping tags.
fn fixture(images: usize) -> Vec<TagRecord> {
    let mut records = Vec::with_capacity(images * 3);
    for source in 0..3 {
        for i in 0..images {
            let tags = VOCAB
                .iter()
                .enumerate()
                .filter(|(t, _)| (t + i + source) % 3 != 0)
                .map(|(t, tag)| (tag.to_string(), ((t * 7 + i + source) % 100) as f64 / 100.0))
                .collect();
            records.push(TagRecord::new(format!("frames/v{}/frame_{i:06}.jpg", i % 10), tags));
        }
    }
    records
}

fn benchmark_merge(c: &mut Criterion) {
    let records = fixture(1_000);

    c.bench_function("merge_1000_images_3_sources", |b| {
        b.iter(|| merge(black_box(&records), 0.35))
    });
}

fn benchmark_caption(c: &mut Criterion) {
    let ranked: Vec<_> = merge(&fixture(1_000), 0.35)
        .iter()
        .map(|entry| entry.ranked())
        .collect();
    let config = CaptionConfig {
        prefix: "mykw".to_string(),
        max_tags: 8,
        ..CaptionConfig::default()
    };

    c.bench_function("build_caption_1000", |b| {
        b.iter(|| {
            for tags in &ranked {
                black_box(build_caption(black_box(tags), &config));
            }
        })
    });
}

criterion_group!(benches, benchmark_merge, benchmark_caption);
criterion_main!(benches);
