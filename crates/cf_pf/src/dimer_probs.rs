//! Rescaling dimer-mode base pair probabilities against the two monomer
//! ensembles, so that a pair probability reported for the heterodimer
//! reflects "given that A and B are bound, how likely is this pair" rather
//! than mixing in the unbound background.

use log::warn;
use colored::*;

use crate::error::PfError;
use crate::index::SequenceContext;

/// `pr_ab` is indexed over the full two-strand context `ctx`; `pr_a`/`pr_b`
/// are each indexed over their own single-strand context. Returns a new
/// probability table, same shape as `pr_ab`.
pub fn dimer_probs(
    ctx: &SequenceContext,
    pr_ab: &[f64],
    ctx_a: &SequenceContext,
    pr_a: &[f64],
    ctx_b: &SequenceContext,
    pr_b: &[f64],
    fab: f64,
    fa: f64,
    fb: f64,
    kt_kcal: f64,
) -> Result<Vec<f64>, PfError> {
    if ctx.cut_point == 0 {
        return Err(PfError::InvalidInput("dimer_probs requires a two-strand context".into()));
    }

    let p_ab = 1.0 - ((1.0 / kt_kcal) * (fab - fa - fb)).exp();
    let mut rescaled = pr_ab.to_vec();
    if p_ab <= 0.0 {
        return Ok(rescaled);
    }

    let a_len = ctx_a.n;
    for j in 2..=ctx.n {
        for i in 1..j {
            let idx = ctx.pair_index(i, j);
            let p = pr_ab[idx];
            if p == 0.0 {
                continue;
            }
            let background = if j <= a_len {
                pr_a[ctx_a.pair_index(i, j)]
            } else if i > a_len {
                pr_b[ctx_b.pair_index(i - a_len, j - a_len)]
            } else {
                0.0
            };

            let mut new_p = (p - (1.0 - p_ab) * background) / p_ab;
            if new_p < 0.0 {
                warn!("{} pair ({}, {}) rescaled below zero ({:.6}); clamping to 0", "WARNING:".yellow(), i, j, new_p);
                new_p = 0.0;
            }
            rescaled[idx] = new_p;
        }
    }

    Ok(rescaled)
}
