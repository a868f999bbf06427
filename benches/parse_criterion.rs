use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use repoinit_parser::RepoInitParserService;
use std::fmt::Write;
use std::hint::black_box;

/// A script with `users` service users, each with its own ACL block.
fn build_script(users: usize) -> String {
    let mut script = String::new();
    for i in 0..users {
        let _ = writeln!(script, "create service user user-{i} with path /home/system");
        let _ = writeln!(script, "set ACL for user-{i}");
        let _ = writeln!(
            script,
            "    allow jcr:read,jcr:write on /content/site-{i}, /var/site-{i}"
        );
        let _ = writeln!(script, "    deny jcr:all on /libs restriction(rep:glob,*secret*)");
        let _ = writeln!(script, "end");
    }
    script
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(40);

    let service = RepoInitParserService::new();
    for users in [1, 10, 100, 1000] {
        let script = build_script(users);
        group.throughput(Throughput::Bytes(script.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(users), &script, |b, s| {
            b.iter(|| {
                let operations = service
                    .parse_str(black_box(s))
                    .expect("benchmark scripts are valid");
                black_box(operations.len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse);
criterion_main!(benches);
