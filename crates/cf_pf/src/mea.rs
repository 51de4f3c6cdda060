//! Maximum-expected-accuracy structure extraction from a base pair
//! probability table: the single most-likely-on-average dot-bracket
//! structure implied by `probs`, rather than the probabilities themselves.

use cf_structure::NAIDX;
use cf_structure::PairTable;

use crate::index::SequenceContext;

/// Relative reward of a correctly predicted base pair versus a correctly
/// predicted unpaired base. `gamma = 1` weighs both equally.
pub const DEFAULT_GAMMA: f64 = 1.0;

/// Classic Lu/Gloor/Mathews-style MEA recursion:
/// `M(i,j) = max(M(i+1,j) + gamma*q(i), max_k M(i+1,k-1) + M(k+1,j) + 2*gamma*p(i,k))`
/// where `q(i)` is the reliability that `i` stays unpaired.
pub fn mea_structure(ctx: &SequenceContext, probs: &[f64], gamma: f64) -> PairTable {
    let n = ctx.n;
    let mut unpaired = vec![1.0f64; n + 1];
    for j in 2..=n {
        for i in 1..j {
            let p = probs[ctx.pair_index(i, j)];
            unpaired[i] -= p;
            unpaired[j] -= p;
        }
    }

    let mut m = vec![vec![0.0f64; n + 1]; n + 1];
    let mut partner = vec![vec![0usize; n + 1]; n + 1];

    for span in 1..n {
        for i in 1..=(n - span) {
            let j = i + span;
            let mut best = m[i + 1][j] + gamma * unpaired[i].max(0.0);
            let mut best_k = 0;
            for k in (i + 1)..=j {
                let p = probs[ctx.pair_index(i, k)];
                if p <= 0.0 {
                    continue;
                }
                let left = if k > i + 1 { m[i + 1][k - 1] } else { 0.0 };
                let right = if k < j { m[k + 1][j] } else { 0.0 };
                let score = left + right + 2.0 * gamma * p;
                if score > best {
                    best = score;
                    best_k = k;
                }
            }
            m[i][j] = best;
            partner[i][j] = best_k;
        }
    }

    let mut pairs: Vec<Option<NAIDX>> = vec![None; n];
    traceback(1, n, &partner, &mut pairs);
    PairTable(pairs)
}

fn traceback(i: usize, j: usize, partner: &[Vec<usize>], pairs: &mut [Option<NAIDX>]) {
    if i >= j {
        return;
    }
    let k = partner[i][j];
    if k == 0 {
        traceback(i + 1, j, partner, pairs);
        return;
    }
    pairs[i - 1] = Some((k - 1) as NAIDX);
    pairs[k - 1] = Some((i - 1) as NAIDX);
    if k > i + 1 {
        traceback(i + 1, k - 1, partner, pairs);
    }
    if k < j {
        traceback(k + 1, j, partner, pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::HardConstraints;
    use crate::forward::forward_recursion;
    use crate::outside::outside_recursion;
    use crate::scale::ScaleLadder;
    use cf_energy::NucleotideVec;
    use cf_energy::UniformModel;

    fn probs_for(seq: &str) -> (SequenceContext, Vec<f64>) {
        let nv = NucleotideVec::try_from(seq).unwrap();
        let ctx = SequenceContext::new(&nv, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let out = outside_recursion(&ctx, &model, &hc, &scale, &fwd).unwrap();
        (ctx, out.probs)
    }

    #[test]
    fn test_mea_structure_has_consistent_pairs() {
        let (ctx, probs) = probs_for("GCGCAUAUGCGC");
        let pt = mea_structure(&ctx, &probs, DEFAULT_GAMMA);
        for (i, partner) in pt.iter().enumerate() {
            if let Some(j) = partner {
                assert_eq!(pt[*j as usize], Some(i as NAIDX));
                assert_ne!(*j as usize, i);
            }
        }
    }

    #[test]
    fn test_mea_structure_leaves_unpairable_sequence_fully_open() {
        let (ctx, probs) = probs_for("AAAA");
        let pt = mea_structure(&ctx, &probs, DEFAULT_GAMMA);
        assert!(pt.iter().all(|p| p.is_none()));
    }
}
