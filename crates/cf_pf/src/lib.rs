mod constraints;
mod index;
mod scale;

mod forward;
mod outside;

mod ensemble;
mod concentration;
mod dimer_probs;

mod cofold;
mod mea;

mod error;

pub use constraints::*;
pub use index::*;
pub use scale::*;

pub use forward::*;
pub use outside::*;

pub use ensemble::*;
pub use concentration::*;
pub use dimer_probs::*;

pub use cofold::*;
pub use mea::*;

pub use error::*;
