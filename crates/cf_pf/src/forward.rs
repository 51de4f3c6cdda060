//! Forward partition function recursion: fills the `Q`, `Q^B`, `Q^M` and
//! `Q^{M1}` tables McCaskill's algorithm is built on.

use log::warn;
use colored::*;

use cf_energy::PartitionFunctionModel;

use crate::constraints::HardConstraints;
use crate::constraints::{EXT_LOOP, HAIRPIN, INT_LOOP, MAXLOOP, MB_LOOP};
use crate::error::PfError;
use crate::index::SequenceContext;
use crate::scale::ScaleLadder;

/// Above this magnitude a cell is treated as a fatal overflow: the forward
/// recursion aborts rather than silently propagating `inf`.
const QMAX_FATAL: f64 = f64::MAX / 16.0;
/// Above this magnitude (but below fatal) a cell is merely suspicious: we
/// warn and keep going.
const QMAX_WARN: f64 = QMAX_FATAL / 1.0e4;

pub struct ForwardTables {
    pub qb: Vec<f64>,
    pub qm: Vec<f64>,
    pub qm1: Vec<f64>,
    pub q: Vec<f64>,
}

impl ForwardTables {
    /// `Q(i, j)`, with the convention `Q(i, j) = 1` for an empty interval
    /// (`j < i`).
    pub fn q(&self, ctx: &SequenceContext, i: usize, j: usize) -> f64 {
        if i > j {
            1.0
        } else {
            self.q[ctx.pair_index(i, j)]
        }
    }

    pub fn qb(&self, ctx: &SequenceContext, i: usize, j: usize) -> f64 {
        if i > j {
            0.0
        } else {
            self.qb[ctx.pair_index(i, j)]
        }
    }

    pub fn qm(&self, ctx: &SequenceContext, i: usize, j: usize) -> f64 {
        if i > j {
            0.0
        } else {
            self.qm[ctx.pair_index(i, j)]
        }
    }

    pub fn qm1(&self, ctx: &SequenceContext, i: usize, j: usize) -> f64 {
        if i > j {
            0.0
        } else {
            self.qm1[ctx.pair_index(i, j)]
        }
    }
}

fn check_cell(acc: f64, label: &str, i: usize, j: usize) -> Result<f64, PfError> {
    if !acc.is_finite() || acc > QMAX_FATAL {
        return Err(PfError::FatalOverflow(format!(
            "{} at ({}, {}) overflowed (value {})",
            label, i, j, acc
        )));
    }
    if acc > QMAX_WARN {
        let risk = PfError::ParameterOverflow(format!(
            "{}({}, {}) is approaching the overflow threshold ({:.3e})",
            label, i, j, acc
        ));
        warn!("{} {}", "WARNING:".yellow(), risk);
    }
    Ok(acc)
}

pub fn forward_recursion<M: PartitionFunctionModel>(
    ctx: &SequenceContext,
    model: &M,
    hc: &HardConstraints,
    scale: &ScaleLadder,
) -> Result<ForwardTables, PfError> {
    let n = ctx.n;
    if n == 0 {
        return Err(PfError::InvalidInput("empty sequence".into()));
    }
    let size = ctx.table_size();

    let mut qb = vec![0.0; size];
    let mut qm = vec![0.0; size];
    let mut qm1 = vec![0.0; size];
    let mut q = vec![0.0; size];

    for l in 1..=n.saturating_sub(1) {
        for i in 1..=(n - l) {
            let j = i + l;
            let idx = ctx.pair_index(i, j);

            // Q^B(i, j): i and j paired.
            let t_outer = ctx.ptype(i, j);
            let mut qb_acc = 0.0;
            if t_outer.can_pair() {
                if ctx.same_strand(i, j) && hc.allows(i, j, HAIRPIN) {
                    let u = j - i - 1;
                    qb_acc += model.exp_hairpin(
                        u,
                        t_outer.code(),
                        ctx.flank(i as i64 + 1),
                        ctx.flank(j as i64 - 1),
                        ctx.bases(),
                        i,
                    ) * scale.get(u + 2);
                }

                if hc.allows(i, j, INT_LOOP) && ctx.same_strand(i, j) {
                    let p_max = j.saturating_sub(2).min(i + 1 + MAXLOOP);
                    for p in (i + 1)..=p_max {
                        if !ctx.same_strand(i, p) {
                            continue;
                        }
                        let q_min = (p + 1).max(j.saturating_sub(1 + MAXLOOP));
                        for q_ in q_min..=(j - 1) {
                            if !ctx.same_strand(q_, j) {
                                continue;
                            }
                            let qbpq = qb[ctx.pair_index(p, q_)];
                            if qbpq == 0.0 {
                                continue;
                            }
                            let t_inner = ctx.ptype(p, q_);
                            if !t_inner.can_pair() {
                                continue;
                            }
                            let u1 = p - i - 1;
                            let u2 = j - q_ - 1;
                            let w = model.exp_int_loop(
                                u1,
                                u2,
                                t_outer.code(),
                                t_inner.rtype_code(),
                                ctx.flank(i as i64 + 1),
                                ctx.flank(j as i64 - 1),
                                ctx.flank(p as i64 - 1),
                                ctx.flank(q_ as i64 + 1),
                            );
                            qb_acc += qbpq * w * scale.get(u1 + u2 + 2);
                        }
                    }
                }

                if hc.allows(i, j, MB_LOOP) && j >= i + 4 && ctx.same_strand(i, j) {
                    let t_stem = t_outer.rtype_code();
                    let stem_w = model.exp_ml_closing()
                        * model.exp_ml_stem(t_stem, ctx.flank(i as i64 + 1), ctx.flank(j as i64 - 1));
                    let mut ml_sum = 0.0;
                    for k in (i + 2)..=(j - 2) {
                        let qm_left = qm[ctx.pair_index(i + 1, k)];
                        if qm_left == 0.0 {
                            continue;
                        }
                        let qm1_right = qm1[ctx.pair_index(k + 1, j - 1)];
                        ml_sum += qm_left * qm1_right;
                    }
                    qb_acc += stem_w * ml_sum * scale.get(2);
                }
            }
            qb[idx] = check_cell(qb_acc, "Q^B", i, j)?;

            // Q^{M1}(i, j): exactly one stem starting at i.
            let mut qm1_acc = 0.0;
            for k in i..=j {
                let t = ctx.ptype(i, k);
                if !t.can_pair() {
                    continue;
                }
                let qbik = qb[ctx.pair_index(i, k)];
                if qbik == 0.0 {
                    continue;
                }
                let w = model.exp_ml_stem(t.code(), ctx.flank(i as i64 - 1), ctx.flank(k as i64 + 1));
                qm1_acc += qbik * w * scale.get(j - k);
            }
            qm1[idx] = check_cell(qm1_acc, "Q^M1", i, j)?;

            // Q^M(i, j): one or more stems covering [i, j].
            let mut qm_acc = qm1[idx];
            for k in i..j {
                let left = qm[ctx.pair_index(i, k)];
                if left == 0.0 {
                    continue;
                }
                qm_acc += left * qm1[ctx.pair_index(k + 1, j)];
            }
            qm[idx] = check_cell(qm_acc, "Q^M", i, j)?;

            // Q(i, j): unconstrained exterior partition function.
            let mut q_acc = scale.get(j - i + 1);
            if hc.allows(i, j, EXT_LOOP) {
                for k in i..=j {
                    let t = ctx.ptype(i, k);
                    if !t.can_pair() {
                        continue;
                    }
                    let qbik = qb[ctx.pair_index(i, k)];
                    if qbik == 0.0 {
                        continue;
                    }
                    let w = model.exp_ext_loop(t.code(), ctx.flank(i as i64 - 1), ctx.flank(k as i64 + 1));
                    let tail = if k + 1 > j { 1.0 } else { q[ctx.pair_index(k + 1, j)] };
                    q_acc += qbik * w * tail;
                }
            }
            q[idx] = check_cell(q_acc, "Q", i, j)?;
        }
    }

    Ok(ForwardTables { qb, qm, qm1, q })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_energy::NucleotideVec;
    use cf_energy::UniformModel;

    #[test]
    fn test_single_base_has_no_pairs() {
        let seq = NucleotideVec::try_from("G").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let tables = forward_recursion(&ctx, &model, &hc, &scale);
        assert!(tables.is_ok());
    }

    #[test]
    fn test_unpaired_exterior_is_at_least_one() {
        // under UniformModel, Q(1, n) must be >= the fully-unpaired term.
        let seq = NucleotideVec::try_from("GCGC").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let tables = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        assert!(tables.q(&ctx, 1, ctx.n) >= 1.0);
    }

    #[test]
    fn test_qb_zero_for_non_pairing_bases() {
        let seq = NucleotideVec::try_from("AAAA").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let tables = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        for i in 1..=ctx.n {
            for j in i..=ctx.n {
                assert_eq!(tables.qb(&ctx, i, j), 0.0);
            }
        }
    }

    #[test]
    fn test_gcgc_can_close_full_length_pair() {
        let seq = NucleotideVec::try_from("GCGC").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let tables = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        assert!(tables.qb(&ctx, 1, 4) > 0.0);
    }
}
