// Shaping throughput: HarfBuzz through its C API against harfrust.
//
// Every font in the store gets three runs over the corpus: native with one
// reused buffer, native with a fresh buffer per line, and pure Rust.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shapeperf_bench::{compare, font_store};
use shapeperf_core::{corpus, provider, ShapingParams};
use shapeperf_shape_hb::{shape, HarfBuzzShaper, NativeBuffer, NativeFont};
use shapeperf_shape_hr::{PureParams, PureShaper};

const FONT_SIZE: f32 = 12.0;

fn corpus_bytes() -> u64 {
    corpus::CORPUS.iter().map(|line| line.len() as u64).sum()
}

fn bench_engines(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let store = font_store();

    let mut group = c.benchmark_group("shape_corpus");
    group.throughput(Throughput::Bytes(corpus_bytes()));

    // the default alias would only repeat its target
    for name in store.names().into_iter().filter(|n| n != provider::DEFAULT_FONT) {
        let params = match PureParams::for_font(&store, &name, FONT_SIZE) {
            Ok(params) => params,
            Err(e) => {
                log::error!("skipping {name}: {e}");
                continue;
            }
        };
        let font = match NativeFont::from_resource(params.font(), FONT_SIZE) {
            Ok(font) => font,
            Err(e) => {
                log::error!("skipping {name}: {e}");
                continue;
            }
        };
        if let Ok(report) = compare::compare_lines(&params, corpus::CORPUS.iter().copied()) {
            log::info!("{name}: {}", compare::Summary::of(&report));
        }

        if let Ok(mut native) = HarfBuzzShaper::new() {
            group.bench_with_input(BenchmarkId::new("native_reused", &name), &font, |b, font| {
                b.iter(|| {
                    for line in corpus::CORPUS {
                        let glyphs = native.shape(black_box(line), Some(font), &[]);
                        black_box(glyphs.map(|seq| seq.glyph_count()).ok());
                    }
                })
            });
        }

        let shared = ShapingParams::default();
        group.bench_with_input(BenchmarkId::new("native_fresh", &name), &font, |b, font| {
            b.iter(|| {
                for line in corpus::CORPUS {
                    let Ok(mut buffer) = NativeBuffer::create() else {
                        continue;
                    };
                    let glyphs = shape(&mut buffer, black_box(line), Some(font), &shared);
                    black_box(glyphs.map(|seq| seq.glyph_count()).ok());
                }
            })
        });

        let mut pure = PureShaper::new();
        group.bench_with_input(BenchmarkId::new("pure", &name), &params, |b, params| {
            b.iter(|| {
                for line in corpus::CORPUS {
                    let glyphs = pure.shape(black_box(line), params);
                    black_box(glyphs.map(|run| run.glyph_count()).ok());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
