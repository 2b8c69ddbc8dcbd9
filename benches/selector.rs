use compaction_selector::{
    catalog,
    compaction::{BlockSelector, Choice, ObjectCountQueue, Simple, TimeWindow},
    BlockMeta,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use std::time::{Duration, SystemTime};

fn fixture_catalog(tenants: usize, blocks_per_tenant: usize) -> Vec<BlockMeta> {
    let mut rng = rand::rng();

    let mut catalog = (0..tenants)
        .flat_map(|_| {
            let tenant_id = nanoid::nanoid!();
            (0..blocks_per_tenant).map(move |i| (tenant_id.clone(), i))
        })
        .map(|(tenant_id, i)| {
            let start = SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64 * 300);
            let end = start + Duration::from_secs(rng.random_range(60..600));
            BlockMeta::new(tenant_id, start, end, rng.random_range(1..100_000))
        })
        .collect::<Vec<_>>();

    catalog::sort(&mut catalog);
    catalog
}

fn drain<'a>(selector: &mut impl BlockSelector<'a>) -> usize {
    let mut jobs = 0;

    while let Choice::DoCompact(input) = selector.choose() {
        jobs += input.blocks.len();
    }

    jobs
}

fn simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple selector");

    for tenants in [1, 10, 100] {
        let catalog = fixture_catalog(tenants, 1_000);
        group.throughput(criterion::Throughput::Elements(catalog.len() as u64));

        group.bench_function(format!("{} blocks ({tenants} tenants)", catalog.len()), |b| {
            b.iter(|| {
                let mut selector =
                    Simple::new(&catalog, 4, Duration::from_secs(3_600)).expect("should build");
                drain(&mut selector)
            });
        });
    }
}

fn time_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("time window selector");

    for tenants in [1, 10, 100] {
        let catalog = fixture_catalog(tenants, 1_000);
        group.throughput(criterion::Throughput::Elements(catalog.len() as u64));

        group.bench_function(format!("{} blocks ({tenants} tenants)", catalog.len()), |b| {
            b.iter(|| {
                let mut selector =
                    TimeWindow::new(&catalog, 4, Duration::from_secs(3_600)).expect("should build");
                drain(&mut selector)
            });
        });
    }
}

fn queue(c: &mut Criterion) {
    let catalog = fixture_catalog(1, 10_000);

    c.bench_function("queue keep 4 smallest of 10K", |b| {
        b.iter(|| {
            let mut queue = ObjectCountQueue::with_limit(4);
            for block in &catalog {
                queue.push(block);
            }
            queue.into_blocks()
        });
    });
}

criterion_group!(benches, simple, time_window, queue);
criterion_main!(benches);
