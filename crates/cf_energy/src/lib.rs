/// Base, NucleotideVec, PairTypeRNA, ....
mod nucleotides;

/// The Boltzmann-weight energy oracle trait, plus the models this crate
/// ships.
mod energy_model;

pub use nucleotides::*;
pub use energy_model::*;
