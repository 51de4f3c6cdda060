//! # cofold
//!
//! The main entry point for the cofold partition-function package, with
//! interfaces to the crates that are organized as a workspace. At this
//! level, you can also find argument parsers for the binaries shipped with
//! the cofold package.
//!
//! This crate re-exports the main functionality from its submodules.


/// Exposing cofold::structure. Sequence-free secondary structure
/// representations (dot-bracket notation, pair tables).
pub mod structure {
    pub use ::cf_structure::*;
}

/// Exposing cofold::energy. Nucleotide sequences, pair types and the
/// Boltzmann-weight energy models that drive the partition function engine.
pub mod energy {
    pub use ::cf_energy::*;
}

/// Exposing cofold::pf. The partition function engine: forward/outside
/// recursions, base pair probabilities, dimer ensembles and the
/// equilibrium concentration solver.
pub mod pf {
    pub use ::cf_pf::*;
}

/// Various flavors of handling sequence input, cofold-aware (splits on the
/// strand separator).
pub mod input_parsers;

/// Exposing the currently supported parameters of cofold's energy models.
pub mod energy_parsers;

/// Exposing the currently supported parameters of cofold's concentration
/// solver.
pub mod conc_parsers;
