use criterion::{black_box, criterion_group, criterion_main, Criterion};
use playshelf::organizer::allocator::next_index_from;
use playshelf::organizer::names::{parse_segments, NameRules};
use playshelf::utils::{ParsePolicy, SegmentOrder};

fn benchmark_parse_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("Name Segments");
    let rules = NameRules {
        delimiter: "-",
        audio_ext: "mp3",
        order: SegmentOrder::Reversed,
        policy: ParsePolicy::Lenient,
    };

    group.bench_function("simple", |b| {
        b.iter(|| parse_segments(black_box("Title-Artist"), &rules))
    });

    group.bench_function("padded", |b| {
        b.iter(|| parse_segments(black_box("  Some Title (Live)  -  Some Artist .mp3 "), &rules))
    });

    let long_name = vec!["segment"; 64].join(" - ");
    group.bench_function("many segments", |b| {
        b.iter(|| parse_segments(black_box(&long_name), &rules))
    });

    group.finish();
}

fn benchmark_next_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("Index Allocation");

    for size in [10usize, 1_000, 10_000] {
        let names: Vec<String> = (0..size).map(|i| format!("{}.mp3", i * 2)).collect();
        group.bench_function(format!("{} files", size), |b| {
            b.iter(|| {
                next_index_from(
                    black_box(names.iter().map(String::as_str)),
                    ParsePolicy::Lenient,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse_segments, benchmark_next_index);
criterion_main!(benches);
