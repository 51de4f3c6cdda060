//! Free energies of the five equilibrium species: the two monomers (A, B),
//! the heterodimer (AB), and the "everything in one box" quantities that
//! feed `concentration::dimer_concentrations`.

use cf_energy::Base;

use crate::forward::ForwardTables;
use crate::index::SequenceContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimerFreeEnergies {
    /// Free energy of strand A alone.
    pub fa: f64,
    /// Free energy of strand B alone.
    pub fb: f64,
    /// Free energy of the two strands, partition function restricted to
    /// structures where they are actually bound to each other.
    pub fab: f64,
    /// Free energy of the two strands treated as one box, every structure
    /// included (bound or not).
    pub f0ab: f64,
    /// Free energy of the bound-only partition function `QAB` itself
    /// (`999.0` marks a numerically-zero bound partition function).
    pub fcab: f64,
}

/// `Q(1, n)` already has `pf_scale^-n` folded in; recovering the physical
/// free energy multiplies it back out in log space.
fn free_energy(q_scaled: f64, span: usize, pf_scale: f64, kt_kcal: f64) -> f64 {
    -kt_kcal * (q_scaled.ln() + span as f64 * pf_scale.ln())
}

/// Two strands are palindromic partners exactly when they are the same
/// length and identical base-for-base; `QAB` then double counts the
/// symmetric dimer and must be halved.
fn is_palindromic_pair(a: &[Base], b: &[Base]) -> bool {
    a == b
}

pub fn dimer_free_energies(
    ctx: &SequenceContext,
    fwd: &ForwardTables,
    kt_kcal: f64,
    pf_scale: f64,
    exp_duplex_init: f64,
) -> DimerFreeEnergies {
    let n = ctx.n;
    let qzero = fwd.q(ctx, 1, n);
    let f0ab_single = free_energy(qzero, n, pf_scale, kt_kcal);

    let cp = ctx.cut_point;
    if cp == 0 {
        return DimerFreeEnergies {
            fa: f0ab_single,
            fb: f0ab_single,
            fab: f0ab_single,
            f0ab: f0ab_single,
            fcab: 0.0,
        };
    }

    let qa = fwd.q(ctx, 1, cp - 1);
    let qb = fwd.q(ctx, cp, n);
    let mut qab = (qzero - qa * qb) * exp_duplex_init;

    if n == 2 * (cp - 1) && is_palindromic_pair(&ctx.bases()[1..cp], &ctx.bases()[cp..=n]) {
        qab /= 2.0;
    }

    let qtot = qa * qb + qab;

    DimerFreeEnergies {
        fa: free_energy(qa, cp - 1, pf_scale, kt_kcal),
        fb: free_energy(qb, n - cp + 1, pf_scale, kt_kcal),
        fab: free_energy(qtot, n, pf_scale, kt_kcal),
        f0ab: f0ab_single,
        fcab: if qab > 1e-17 { free_energy(qab, n, pf_scale, kt_kcal) } else { 999.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::HardConstraints;
    use crate::forward::forward_recursion;
    use crate::index::SequenceContext;
    use crate::scale::ScaleLadder;
    use cf_energy::NucleotideVec;
    use cf_energy::PartitionFunctionModel;
    use cf_energy::UniformModel;

    #[test]
    fn test_single_strand_collapses_all_five_energies() {
        let seq = NucleotideVec::try_from("GCGC").unwrap();
        let ctx = SequenceContext::new(&seq, 0);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let e = dimer_free_energies(&ctx, &fwd, model.kt(), model.pf_scale(), model.exp_duplex_init());
        assert_eq!(e.fa, e.fb);
        assert_eq!(e.fa, e.fab);
        assert_eq!(e.fa, e.f0ab);
        assert_eq!(e.fcab, 0.0);
    }

    #[test]
    fn test_two_strand_fab_is_at_most_f0ab() {
        let seq = NucleotideVec::try_from("GCGCGCGC").unwrap();
        let ctx = SequenceContext::new(&seq, 5);
        let hc = HardConstraints::allow_all(ctx.n);
        let scale = ScaleLadder::new(ctx.n, 1.0);
        let model = UniformModel;
        let fwd = forward_recursion(&ctx, &model, &hc, &scale).unwrap();
        let e = dimer_free_energies(&ctx, &fwd, model.kt(), model.pf_scale(), model.exp_duplex_init());
        // FAB restricts the ensemble to bound structures, which is a
        // smaller partition function than "everything in one box", so its
        // free energy cannot be lower.
        assert!(e.fab >= e.f0ab - 1e-9);
    }

    #[test]
    fn test_palindromic_strands_are_detected() {
        let a: Vec<Base> = vec![Base::G, Base::C];
        let b: Vec<Base> = vec![Base::G, Base::C];
        assert!(is_palindromic_pair(&a, &b));
        let c: Vec<Base> = vec![Base::A, Base::C];
        assert!(!is_palindromic_pair(&a, &c));
    }
}
