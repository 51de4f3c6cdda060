//! The top-level entry point: fold one or two strands and return free
//! energies, optionally with base pair probabilities.

use log::info;

use cf_energy::NucleotideVec;
use cf_energy::PartitionFunctionModel;

use crate::constraints::HardConstraints;
use crate::ensemble::dimer_free_energies;
use crate::ensemble::DimerFreeEnergies;
use crate::error::PfError;
use crate::forward::forward_recursion;
use crate::index::SequenceContext;
use crate::outside::outside_recursion;
use crate::scale::ScaleLadder;

/// Above this length, cancellation error in the forward/outside recursions
/// becomes noticeable enough to call out to the caller.
const LONG_SEQUENCE_WARNING_THRESHOLD: usize = 1600;

#[derive(Debug, Clone, Copy, Default)]
pub struct CofoldOptions {
    /// Run the outside recursion and populate `CofoldResult::probs`.
    pub compute_bpp: bool,
}

pub struct CofoldResult {
    pub energies: DimerFreeEnergies,
    pub probs: Option<Vec<f64>>,
}

/// `cut_point` is the 1-indexed first position of strand B, or `0` to fold
/// `sequence` as a single strand.
pub fn cofold<M: PartitionFunctionModel>(
    sequence: &NucleotideVec,
    cut_point: usize,
    model: &M,
    options: CofoldOptions,
) -> Result<(SequenceContext, CofoldResult), PfError> {
    let n = sequence.len();
    if n == 0 {
        return Err(PfError::InvalidInput("sequence must not be empty".into()));
    }
    if cut_point != 0 && !(2..=n).contains(&cut_point) {
        return Err(PfError::InvalidInput(format!(
            "cut point {} out of range for a sequence of length {}",
            cut_point, n
        )));
    }

    if n > LONG_SEQUENCE_WARNING_THRESHOLD {
        info!("sequence length {} exceeds {}; partition function overflow is more likely", n, LONG_SEQUENCE_WARNING_THRESHOLD);
    }

    let ctx = SequenceContext::new(sequence, cut_point);
    let hc = HardConstraints::allow_all(n);
    let scale = ScaleLadder::new(n, model.pf_scale());

    let fwd = forward_recursion(&ctx, model, &hc, &scale)?;
    let energies = dimer_free_energies(&ctx, &fwd, model.kt(), model.pf_scale(), model.exp_duplex_init());

    let probs = if options.compute_bpp {
        Some(outside_recursion(&ctx, model, &hc, &scale, &fwd)?.probs)
    } else {
        None
    };

    Ok((ctx, CofoldResult { energies, probs }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_energy::UniformModel;

    #[test]
    fn test_rejects_empty_sequence() {
        let seq = NucleotideVec(vec![]);
        let model = UniformModel;
        let res = cofold(&seq, 0, &model, CofoldOptions::default());
        assert!(matches!(res, Err(PfError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_cut_point_out_of_range() {
        let seq = NucleotideVec::try_from("GCGC").unwrap();
        let model = UniformModel;
        let res = cofold(&seq, 1, &model, CofoldOptions::default());
        assert!(matches!(res, Err(PfError::InvalidInput(_))));
        let res = cofold(&seq, 5, &model, CofoldOptions::default());
        assert!(matches!(res, Err(PfError::InvalidInput(_))));
    }

    #[test]
    fn test_single_strand_fold_succeeds() {
        let seq = NucleotideVec::try_from("GCGCAUAUGCGC").unwrap();
        let model = UniformModel;
        let (_ctx, result) = cofold(&seq, 0, &model, CofoldOptions { compute_bpp: true }).unwrap();
        assert!(result.probs.is_some());
        assert_eq!(result.energies.fa, result.energies.fab);
    }

    #[test]
    fn test_two_strand_fold_without_bpp_leaves_probs_none() {
        let seq = NucleotideVec::try_from("GCGCGCGC").unwrap();
        let model = UniformModel;
        let (_ctx, result) = cofold(&seq, 5, &model, CofoldOptions::default()).unwrap();
        assert!(result.probs.is_none());
    }
}
