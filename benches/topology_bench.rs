//! Benchmarks for probe parsing, endpoint resolution and log path estimation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io;
use std::net::Ipv4Addr;

use diag_collector::collectors::estimate_log_path;
use diag_collector::models::{ClusterNode, ClusterTopology, DeploymentKind};
use diag_collector::topology::discovery::{MembershipReply, ShardMapReply};
use diag_collector::topology::{resolve_unique_endpoints, DnsResolver};

/// Every `dbN` host resolves to `10.0.0.(N % 8)`
struct ModuloDns;

impl DnsResolver for ModuloDns {
    fn lookup_ipv4(&self, hostname: &str) -> io::Result<Vec<Ipv4Addr>> {
        let n: u32 = hostname
            .trim_start_matches("db")
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "unknown host"))?;
        Ok(vec![Ipv4Addr::new(10, 0, 0, (n % 8) as u8)])
    }
}

fn shard_map(hosts: usize) -> String {
    let entries: Vec<String> = (0..hosts)
        .map(|i| format!("\"db{}:27018\": \"shard{}\"", i, i / 3))
        .collect();
    format!(
        "{{\"hosts\": {{{}}}, \"ok\": 1, \"operationTime\": Timestamp(1711095775, 1), \
         \"$clusterTime\": {{\"signature\": {{\"hash\": BinData(0, \"AAAA\"), \"keyId\": NumberLong(0)}}}}}}",
        entries.join(", ")
    )
}

fn bench_probe_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_parsing");

    for hosts in [3, 30, 300] {
        let raw = shard_map(hosts);
        group.bench_with_input(BenchmarkId::new("shard_map", hosts), &raw, |b, raw| {
            b.iter(|| ShardMapReply::parse(black_box(raw)).unwrap());
        });
    }

    let members = "[\"db1:27017\",\"db2:27017\",\"db3:27017\",\"db4:27017\",\"db5:27017\"]";
    group.bench_function("membership", |b| {
        b.iter(|| MembershipReply::parse(black_box(members)).unwrap());
    });

    group.finish();
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_unique_endpoints");

    for count in [10, 100, 1000] {
        let topology = ClusterTopology::new(
            DeploymentKind::Sharded,
            (0..count).map(|i| ClusterNode::new(format!("db{}", i), 27017)).collect(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(count), &topology, |b, t| {
            b.iter(|| resolve_unique_endpoints(black_box(t), &ModuloDns));
        });
    }

    group.finish();
}

fn bench_log_path(c: &mut Criterion) {
    c.bench_function("estimate_log_path", |b| {
        b.iter(|| {
            estimate_log_path(
                black_box("./db/logs/mongod.log"),
                black_box("/srv/mongodb/data/db/diagnostic.data/"),
            )
        });
    });
}

criterion_group!(benches, bench_probe_parsing, bench_resolver, bench_log_path);
criterion_main!(benches);
