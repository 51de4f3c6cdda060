//! Errors for cf_pf.

use std::fmt;

#[derive(Debug)]
pub enum PfError {
    InvalidInput(String),
    ParameterOverflow(String),
    FatalOverflow(String),
    NumericInstability(String),
    NonConvergence(String),
}

impl fmt::Display for PfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PfError::InvalidInput(s) => write!(f, "invalid input: {}", s),
            PfError::ParameterOverflow(s) => write!(f, "partition function overflow risk: {}", s),
            PfError::FatalOverflow(s) => write!(f, "partition function overflowed: {}", s),
            PfError::NumericInstability(s) => write!(f, "numeric instability: {}", s),
            PfError::NonConvergence(s) => write!(f, "did not converge: {}", s),
        }
    }
}

impl std::error::Error for PfError {}
