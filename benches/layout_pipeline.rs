use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use phylolayout::{Group, GroupConfig, GroupIndex, Groups, layout_newick, parse_newick, reorganize};
use std::hint::black_box;
use std::path::PathBuf;

const FAMILIES: [&str; 4] = ["mammals", "birds", "reptiles", "fish"];

/// Balanced binary tree with `2^depth` tips named `T0`, `T1`, ... and a
/// confidence on every internal node.
fn balanced_newick(depth: u32) -> String {
    let mut level: Vec<String> = (0..1usize << depth).map(|i| format!("T{i}")).collect();
    let mut round = 0usize;
    while level.len() > 1 {
        level = level
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("({},{}){:.2}", pair[0], pair[1], ((i + round) % 10) as f64 / 10.0))
            .collect();
        round += 1;
    }
    format!("{};", level.concat())
}

/// Tips are dealt round-robin into the families, so every clade is mixed.
fn group_config(depth: u32) -> GroupConfig {
    let tip_count = 1usize << depth;
    let groups: Groups = FAMILIES
        .iter()
        .enumerate()
        .map(|(rank, family)| {
            let order = (rank..tip_count).step_by(FAMILIES.len()).map(|i| format!("T{i}")).collect();
            (*family, Group { order: Some(order) })
        })
        .collect();
    GroupConfig { groups, ..GroupConfig::default() }
}

fn prepare_test_data() -> Vec<(String, String, GroupConfig)> {
    [6, 10, 14]
        .into_iter()
        .map(|depth| (format!("balanced_{}_tips", 1usize << depth), balanced_newick(depth), group_config(depth)))
        .collect()
}

fn bench_layout_pipeline(c: &mut Criterion) {
    let test_data = prepare_test_data();

    let mut group = c.benchmark_group("layout_pipeline");
    let _ = group.sample_size(30);

    for (name, newick_string, config) in &test_data {
        let _ = group.throughput(Throughput::Bytes(newick_string.len() as u64));

        let _ = group.bench_with_input(BenchmarkId::new("parse_newick", name), newick_string, |b, newick| {
            b.iter(|| {
                let _ = black_box(parse_newick(newick));
            });
        });

        let index = GroupIndex::build(config);
        let _ = group.bench_with_input(BenchmarkId::new("reorganize", name), newick_string, |b, newick| {
            b.iter_batched(
                || parse_newick(newick).ok(),
                |tree| tree.map(|tree| black_box(reorganize(tree, &index, index.group_order()))),
                criterion::BatchSize::LargeInput,
            );
        });

        let _ = group.bench_with_input(BenchmarkId::new("layout_newick", name), newick_string, |b, newick| {
            b.iter(|| {
                let _ = black_box(layout_newick(newick, config, None));
            });
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = {
        let mut criterion = Criterion::default();
        let benchmark_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("benchmark_results");
        criterion = criterion.output_directory(&benchmark_dir);
        criterion = criterion.warm_up_time(std::time::Duration::from_millis(500));
        criterion = criterion.measurement_time(std::time::Duration::from_secs(5));
        criterion
    };
    targets = bench_layout_pipeline
);
criterion_main!(benches);
