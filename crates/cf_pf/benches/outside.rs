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
use cf_pf::outside_recursion;

pub fn outside_recursion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Outside");
    let seq = NucleotideVec::from_lossy("UCAGUCUUCGCUGCGCUGUAUCGAUUCGGUUUCAGUUUUUAUUGC");
    let model = UniformModel;
    let ctx = SequenceContext::new(&seq, 20);
    let hc = HardConstraints::allow_all(ctx.n);
    let scale = ScaleLadder::new(ctx.n, model.pf_scale());
    let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();

    group.bench_function("base pair probabilities, n=45, cut at 20", |b| {
        b.iter(|| {
            let _ = outside_recursion(&ctx, &model, &hc, &scale, &fwd).unwrap();
        });
    });
}

criterion_group!(benches, outside_recursion_benchmark);
criterion_main!(benches);
