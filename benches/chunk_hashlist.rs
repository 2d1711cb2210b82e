/// Benchmark suite for the chunk hash list under streaming-style churn
use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_sandbox::engine_state::voxels::chunk::chunk_hashlist::ChunkHashList;

/// Slides a cube of side `2 * radius + 1` along +X for `steps` chunks, inserting the
/// leading face and removing the trailing one each step.
fn slide_cube(list: &mut ChunkHashList<u32>, radius: i32, steps: i32) {
    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                list.insert(Point3::new(x, y, z), 0);
            }
        }
    }
    for step in 1..=steps {
        for y in -radius..=radius {
            for z in -radius..=radius {
                list.remove(Point3::new(step - radius - 1, y, z));
                list.insert(Point3::new(step + radius, y, z), step as u32);
            }
        }
    }
}

fn bench_streaming_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashlist_streaming_churn");

    for &radius in &[2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| {
                let mut list = ChunkHashList::new();
                slide_cube(&mut list, radius, 64);
                black_box(list.len())
            });
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    c.bench_function("hashlist_lookup_after_churn", |b| {
        let mut list = ChunkHashList::new();
        slide_cube(&mut list, 4, 64);

        b.iter(|| {
            let mut hits = 0;
            for x in 56..=72 {
                for y in -4..=4 {
                    for z in -4..=4 {
                        if list.get_checked(Point3::new(x, y, z)).is_some() {
                            hits += 1;
                        }
                    }
                }
            }
            black_box(hits)
        });
    });
}

criterion_group!(benches, bench_streaming_churn, bench_lookup);
criterion_main!(benches);
