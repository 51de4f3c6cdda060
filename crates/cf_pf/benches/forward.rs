use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use cf_energy::NucleotideVec;
use cf_energy::PartitionFunctionModel;
use cf_energy::UniformModel;

use cf_pf::HardConstraints;
use cf_pf::ScaleLadder;
use cf_pf::SequenceContext;
use cf_pf::forward_recursion;

pub fn forward_recursion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Forward");
    let seq = NucleotideVec::from_lossy("UCAGUCUUCGCUGCGCUGUAUCGAUUCGGUUUCAGUUUUUAUUGC");
    let model = UniformModel;

    group.bench_function("single strand, n=45", |b| {
        b.iter(|| {
            let ctx = SequenceContext::new(&seq, 0);
            let hc = HardConstraints::allow_all(ctx.n);
            let scale = ScaleLadder::new(ctx.n, model.pf_scale());
            let _ = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        });
    });

    group.bench_function("two strands, n=45, cut at 20", |b| {
        b.iter(|| {
            let ctx = SequenceContext::new(&seq, 20);
            let hc = HardConstraints::allow_all(ctx.n);
            let scale = ScaleLadder::new(ctx.n, model.pf_scale());
            let _ = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        });
    });
}

criterion_group!(benches, forward_recursion_benchmark);
criterion_main!(benches);
