//! Chemical equilibrium concentrations of the five species (A, B, AA, BB,
//! AB) given their free energies and a list of total starting
//! concentrations, by damped Newton iteration on the two mass-action
//! equations for `cA` and `cB`.

use log::warn;
use colored::*;
use rayon::prelude::*;

use crate::error::PfError;

const TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Concentration {
    pub ac_start: f64,
    pub bc_start: f64,
    pub ab_c: f64,
    pub aa_c: f64,
    pub bb_c: f64,
    pub a_c: f64,
    pub b_c: f64,
    pub converged: bool,
}

struct EquilibriumConstants {
    kab: f64,
    kaa: f64,
    kbb: f64,
}

impl EquilibriumConstants {
    fn from_free_energies(fcab: f64, fcaa: f64, fcbb: f64, fea: f64, feb: f64, kt_kcal: f64) -> Self {
        EquilibriumConstants {
            kaa: ((2.0 * fea - fcaa) / kt_kcal).exp(),
            kbb: ((2.0 * feb - fcbb) / kt_kcal).exp(),
            kab: ((fea + feb - fcab) / kt_kcal).exp(),
        }
    }
}

fn newton_conc(k: &EquilibriumConstants, conc_a: f64, conc_b: f64) -> (f64, f64, bool) {
    let (kab, kaa, kbb) = (k.kab, k.kaa, k.kbb);
    let mut ca = conc_a;
    let mut cb = conc_b;
    let mut converged = false;

    for step in 0..MAX_ITERATIONS {
        let det = 1.0
            + 16.0 * kaa * kbb * ca * cb
            + kab * (ca + cb)
            + 4.0 * kaa * ca
            + 4.0 * kbb * cb
            + 4.0 * kab * (kbb * cb * cb + kaa * ca * ca);

        let xn = ((2.0 * kbb * cb * cb + cb - conc_b) * (kab * ca)
            - kab * ca * cb * (4.0 * kbb * cb + 1.0)
            - (2.0 * kaa * ca * ca + ca - conc_a) * (4.0 * kbb * cb + kab * ca + 1.0))
            / det;
        let yn = ((2.0 * kaa * ca * ca + ca - conc_a) * (kab * cb)
            - kab * ca * cb * (4.0 * kaa * ca + 1.0)
            - (2.0 * kbb * cb * cb + cb - conc_b) * (4.0 * kaa * ca + kab * cb + 1.0))
            / det;

        let eps = (xn / ca).abs() + (yn / cb).abs();
        ca += xn;
        cb += yn;

        if eps <= TOLERANCE {
            converged = true;
            break;
        }
        if step + 1 == MAX_ITERATIONS {
            let risk = PfError::NonConvergence(format!(
                "Newton iteration on (cA={:.3e}, cB={:.3e}) did not settle within {} steps (eps={:.3e})",
                conc_a, conc_b, MAX_ITERATIONS, eps
            ));
            warn!("{} {}", "WARNING:".yellow(), risk);
        }
    }

    (ca, cb, converged)
}

/// Equilibrium constants need the heterodimer run's `FcAB` plus both
/// homodimer runs' `FcAA`/`FcBB`, and both monomer free energies
/// `FEA`/`FEB` -- four separate cofold invocations upstream of this one
/// (A+B, A+A, B+B, and the monomer folds). `startconc` is a list of
/// `(concA, concB)` starting total concentrations.
pub fn dimer_concentrations_from_runs(
    fcab: f64,
    fcaa: f64,
    fcbb: f64,
    fea: f64,
    feb: f64,
    kt_kcal: f64,
    startconc: &[(f64, f64)],
) -> Vec<Concentration> {
    let k = EquilibriumConstants::from_free_energies(fcab, fcaa, fcbb, fea, feb, kt_kcal);
    startconc
        .par_iter()
        .map(|&(conc_a, conc_b)| {
            if conc_a == 0.0 && conc_b == 0.0 {
                return Concentration {
                    ac_start: 0.0,
                    bc_start: 0.0,
                    ab_c: 0.0,
                    aa_c: 0.0,
                    bb_c: 0.0,
                    a_c: 0.0,
                    b_c: 0.0,
                    converged: true,
                };
            }
            let (ca, cb, converged) = newton_conc(&k, conc_a.max(1e-12), conc_b.max(1e-12));
            Concentration {
                ac_start: conc_a,
                bc_start: conc_b,
                ab_c: ca * cb * k.kab,
                aa_c: ca * ca * k.kaa,
                bb_c: cb * cb * k.kbb,
                a_c: ca,
                b_c: cb,
                converged,
            }
        })
        .collect()
}
