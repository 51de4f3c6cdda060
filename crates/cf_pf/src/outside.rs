//! Backward (outside) base pair probability recursion.
//!
//! Works from the largest span down to the smallest, distributing each
//! pair's outside weight into the pairs and multiloop stems it encloses --
//! the mirror image of `forward::forward_recursion`. We keep three
//! accumulators per cell, named after their forward counterparts: `po`
//! (outside of `Q^B`), `pm` (outside of `Q^M`) and `pm1` (outside of
//! `Q^{M1}`).
//!
//! A two-strand input additionally needs the dimer-crossing correction at
//! the end of each `l` iteration: a pair `(k, l)` that straddles the cut
//! point can only have formed as an exterior-loop stem, so its outside
//! weight has to be routed through the two free-standing exterior
//! sub-intervals on either side of the cut rather than through the
//! interior-loop/multiloop machinery above. `qlout`/`qrout` carry that
//! routing.

use log::warn;
use colored::*;

use cf_energy::PartitionFunctionModel;

use crate::constraints::HardConstraints;
use crate::constraints::{EXT_LOOP, INT_LOOP, MAXLOOP, MB_LOOP};
use crate::error::PfError;
use crate::forward::ForwardTables;
use crate::index::SequenceContext;
use crate::scale::ScaleLadder;

pub struct OutsideTables {
    /// Base pair probability: `probs[pair_index(i, j)] == P(i paired with j)`.
    pub probs: Vec<f64>,
}

pub fn outside_recursion<M: PartitionFunctionModel>(
    ctx: &SequenceContext,
    model: &M,
    hc: &HardConstraints,
    scale: &ScaleLadder,
    fwd: &ForwardTables,
) -> Result<OutsideTables, PfError> {
    let n = ctx.n;
    let size = ctx.table_size();
    let qn = fwd.q(ctx, 1, n);
    if qn <= 0.0 || !qn.is_finite() {
        return Err(PfError::NumericInstability(format!(
            "Q(1, {}) is not a usable partition function value ({})",
            n, qn
        )));
    }

    let mut po = vec![0.0; size];
    let mut pm = vec![0.0; size];
    let mut pm1 = vec![0.0; size];
    let mut qlout = vec![0.0; n + 2];
    let cp = ctx.cut_point;

    // Exterior loop seed: every valid (i, j) pair picks up outside weight
    // from being the sole pair at the top level, flanked by Q(1, i-1) and
    // Q(j+1, n).
    if n >= 2 {
        for j in 2..=n {
            for i in 1..j {
                let t = ctx.ptype(i, j);
                if !t.can_pair() || !hc.allows(i, j, EXT_LOOP) {
                    continue;
                }
                if fwd.qb(ctx, i, j) == 0.0 {
                    continue;
                }
                let w = model.exp_ext_loop(t.code(), ctx.flank(i as i64 - 1), ctx.flank(j as i64 + 1));
                po[ctx.pair_index(i, j)] += fwd.q(ctx, 1, i - 1) * fwd.q(ctx, j + 1, n) * w;
            }
        }
    }

    for l in (1..=n.saturating_sub(1)).rev() {
        for i in 1..=(n - l) {
            let j = i + l;
            let idx = ctx.pair_index(i, j);

            // Step A: Q^M(i, j) outside weight flows into Q^{M1}(i, j) and
            // into smaller Q^M / Q^{M1} sub-cells, mirroring the forward
            // recursion `qm = qm1 + sum_k qm(i,k) * qm1(k+1,j)`.
            let pm_here = pm[idx];
            if pm_here > 0.0 {
                pm1[idx] += pm_here;
                for k in (i + 1)..=j {
                    let qm_left = fwd.qm(ctx, i, k - 1);
                    let qm1_right = fwd.qm1(ctx, k, j);
                    if qm_left > 0.0 {
                        pm1[ctx.pair_index(k, j)] += pm_here * qm_left;
                    }
                    if qm1_right > 0.0 {
                        pm[ctx.pair_index(i, k - 1)] += pm_here * qm1_right;
                    }
                }
            }

            // Step B: Q^{M1}(i, j) outside weight flows into every Q^B(i, m)
            // that could be the stem of this M1 block.
            let pm1_here = pm1[idx];
            if pm1_here > 0.0 {
                for m in i..=j {
                    let t = ctx.ptype(i, m);
                    if !t.can_pair() || fwd.qb(ctx, i, m) == 0.0 {
                        continue;
                    }
                    let w = model.exp_ml_stem(t.code(), ctx.flank(i as i64 - 1), ctx.flank(m as i64 + 1));
                    po[ctx.pair_index(i, m)] += pm1_here * w * scale.get(j - m);
                }
            }

            // Step C: Q^B(i, j) outside weight flows into the interior
            // loops and multiloops it closes.
            let po_here = po[idx];
            if po_here > 0.0 && fwd.qb(ctx, i, j) > 0.0 {
                let t_outer = ctx.ptype(i, j);

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
                            if fwd.qb(ctx, p, q_) == 0.0 {
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
                            po[ctx.pair_index(p, q_)] += po_here * w * scale.get(u1 + u2 + 2);
                        }
                    }
                }

                if hc.allows(i, j, MB_LOOP) && j >= i + 4 && ctx.same_strand(i, j) {
                    let t_stem = t_outer.rtype_code();
                    let stem_w = model.exp_ml_closing()
                        * model.exp_ml_stem(t_stem, ctx.flank(i as i64 + 1), ctx.flank(j as i64 - 1))
                        * scale.get(2);
                    for k in (i + 2)..=(j - 2) {
                        let qm_left = fwd.qm(ctx, i + 1, k);
                        let qm1_right = fwd.qm1(ctx, k + 1, j - 1);
                        if qm1_right > 0.0 {
                            pm[ctx.pair_index(i + 1, k)] += po_here * stem_w * qm1_right;
                        }
                        if qm_left > 0.0 {
                            pm1[ctx.pair_index(k + 1, j - 1)] += po_here * stem_w * qm_left;
                        }
                    }
                }
            }

            // Dimer-crossing correction: a pair (k, l) straddling the cut
            // point never closes a hairpin/interior/multiloop (enforced
            // above via `same_strand`), so its outside weight must instead
            // flow from the exterior-loop contexts on each side of the cut.
            if cp > 0 && j > 2 && j < n {
                if j > cp {
                    let mut qrout_l = 0.0;
                    for t in (j + 1)..=n {
                        for k in 1..cp {
                            let po_kt = po[ctx.pair_index(k, t)];
                            if po_kt == 0.0 {
                                continue;
                            }
                            let ty = ctx.ptype(k, t).rtype_code();
                            let samestrand = ctx.same_strand(k, k + 1);
                            let s3 = if samestrand { ctx.flank(k as i64 + 1) } else { -1 };
                            let mut temp = po_kt * model.exp_ext_loop(ty, ctx.flank(t as i64 - 1), s3) * scale.get(2);
                            if j + 1 < t {
                                temp *= fwd.q(ctx, j + 1, t - 1);
                            }
                            if samestrand {
                                temp *= fwd.q(ctx, k + 1, cp - 1);
                            }
                            qrout_l += temp;
                        }
                    }

                    for k in (cp..j).rev() {
                        if fwd.qb(ctx, k, j) == 0.0 {
                            continue;
                        }
                        let ty = ctx.ptype(k, j).code();
                        let s5 = if k > cp { ctx.flank(k as i64 - 1) } else { -1 };
                        let mut temp = qrout_l * model.exp_ext_loop(ty, s5, ctx.flank(j as i64 + 1));
                        if k > cp {
                            temp *= fwd.q(ctx, cp, k - 1);
                        }
                        po[ctx.pair_index(k, j)] += temp;
                    }
                } else if j == cp {
                    for t in 2..cp {
                        for s in 1..t {
                            for k in cp..=n {
                                if fwd.qb(ctx, s, k) == 0.0 {
                                    continue;
                                }
                                let samestrand = ctx.same_strand(k, k - 1);
                                let ty = ctx.ptype(s, k).rtype_code();
                                let s5 = if samestrand { ctx.flank(k as i64 - 1) } else { -1 };
                                let mut temp = po[ctx.pair_index(s, k)]
                                    * model.exp_ext_loop(ty, s5, ctx.flank(s as i64 + 1))
                                    * scale.get(2);
                                if s + 1 < t {
                                    temp *= fwd.q(ctx, s + 1, t - 1);
                                }
                                if samestrand {
                                    temp *= fwd.q(ctx, cp, k - 1);
                                }
                                qlout[t] += temp;
                            }
                        }
                    }
                } else {
                    for k in 1..j {
                        if fwd.qb(ctx, k, j) == 0.0 {
                            continue;
                        }
                        let ty = ctx.ptype(k, j).code();
                        let s5 = if k > 1 { ctx.flank(k as i64 - 1) } else { -1 };
                        let s3 = if j < cp - 1 { ctx.flank(j as i64 + 1) } else { -1 };
                        let mut temp = qlout[k] * model.exp_ext_loop(ty, s5, s3);
                        if j + 1 < cp {
                            temp *= fwd.q(ctx, j + 1, cp - 1);
                        }
                        po[ctx.pair_index(k, j)] += temp;
                    }
                }
            }
        }
    }

    let mut probs = vec![0.0; size];
    for j in 1..=n {
        for i in 1..=j {
            let idx = ctx.pair_index(i, j);
            let qbij = fwd.qb[idx];
            if qbij == 0.0 {
                continue;
            }
            let p = qbij * po[idx] / qn;
            if p > 1.0 + 1e-6 {
                warn!(
                    "{} base pair probability ({}, {}) = {:.6} exceeds 1",
                    "WARNING:".yellow(),
                    i,
                    j,
                    p
                );
            }
            probs[idx] = p.min(1.0).max(0.0);
        }
    }

    Ok(OutsideTables { probs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_energy::NucleotideVec;
    use cf_energy::UniformModel;
    use crate::forward::forward_recursion;

    #[test]
    fn test_probabilities_are_between_zero_and_one() {
        let seq = NucleotideVec::try_from("GCGCAUAUGCGC").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let out = outside_recursion(&ctx, &model, &hc, &scale, &fwd).unwrap();
        for &p in &out.probs {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_no_pairs_means_all_probabilities_zero() {
        let seq = NucleotideVec::try_from("AAAA").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let out = outside_recursion(&ctx, &model, &hc, &scale, &fwd).unwrap();
        assert!(out.probs.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_single_allowed_pair_gets_nonzero_probability() {
        // "GC" can either stay unpaired or close the (1, 2) pair -- under
        // the uniform model both weigh 1, so P(1, 2) should land at 0.5.
        let seq = NucleotideVec::try_from("GC").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let out = outside_recursion(&ctx, &model, &hc, &scale, &fwd).unwrap();
        let p = out.probs[ctx.pair_index(1, 2)];
        assert!((p - 0.5).abs() < 1e-9);
    }
}
