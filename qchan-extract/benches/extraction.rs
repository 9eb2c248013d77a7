//! Benchmarks for identity-trick extraction
//!
//! Unitary probes grow as d², channel probes as d⁴ per mode.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qchan_core::{ModeId, StateKind, TensorState};
use qchan_extract::{
    apply_channel_representation, choi_and_liouville_from_kraus, ChannelExtractor,
    ChannelRepresentation, ExtractorConfig, RepresentationKind,
};
use qchan_fock::{loss_kraus, ops, FockSimulator};

fn extractor() -> ChannelExtractor<FockSimulator> {
    ChannelExtractor::with_config(FockSimulator::default(), ExtractorConfig::unchecked())
}

fn bench_unitary_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_unitary");
    let ex = extractor();
    let m0 = ModeId::new(0);

    for cutoff in [5usize, 10, 20].iter() {
        group.throughput(Throughput::Elements((cutoff * cutoff) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(cutoff), cutoff, |b, &cutoff| {
            let program = [ops::squeezing(0.5, 0.0, m0)];
            b.iter(|| {
                let u = ex
                    .extract_unitary(black_box(&program), cutoff, &[m0])
                    .unwrap();
                black_box(u);
            })
        });
    }

    group.finish();
}

fn bench_channel_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_channel");
    let ex = extractor();
    let m0 = ModeId::new(0);

    for cutoff in [4usize, 6, 8].iter() {
        group.throughput(Throughput::Elements(cutoff.pow(4) as u64));

        group.bench_with_input(BenchmarkId::new("choi", cutoff), cutoff, |b, &cutoff| {
            let program = [ops::loss(0.9, m0)];
            b.iter(|| {
                let choi = ex
                    .extract_channel(black_box(&program), cutoff, &[m0], RepresentationKind::Choi)
                    .unwrap();
                black_box(choi);
            })
        });

        group.bench_with_input(BenchmarkId::new("kraus", cutoff), cutoff, |b, &cutoff| {
            let kraus = loss_kraus(0.9, cutoff).unwrap();
            b.iter(|| {
                black_box(choi_and_liouville_from_kraus(black_box(&kraus)));
            })
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_representation");

    for cutoff in [4usize, 8, 12].iter() {
        let (choi, liouville) = choi_and_liouville_from_kraus(&loss_kraus(0.8, *cutoff).unwrap());
        let choi = ChannelRepresentation::from(choi);
        let liouville = ChannelRepresentation::from(liouville);
        let rho = TensorState::vacuum(StateKind::Mixed, 1, *cutoff).unwrap();

        group.bench_with_input(BenchmarkId::new("choi", cutoff), &rho, |b, rho| {
            b.iter(|| black_box(apply_channel_representation(rho, &choi).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("liouville", cutoff), &rho, |b, rho| {
            b.iter(|| black_box(apply_channel_representation(rho, &liouville).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_unitary_extraction,
    bench_channel_extraction,
    bench_apply,
);
criterion_main!(benches);
