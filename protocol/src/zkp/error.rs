//! Error types for circuit evaluation.

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

use crate::crypto::CryptoError;

/// Why an instance could not be turned into a valid witness.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// An enforced constraint does not hold: no proof exists for this instance.
    #[error("constraint not satisfied: {constraint}")]
    Unsatisfied {
        /// Namespaced label of the first failing constraint.
        constraint: String,
    },

    /// A prover-side assertion failed. A verifier would not notice.
    #[error("witness sanity assertion failed: {assertion}")]
    WitnessSanity {
        /// Namespaced label of the first failing assertion.
        assertion: String,
    },

    /// A primitive failed for structural reasons (not a witness property).
    #[error("primitive failed: {0}")]
    Primitive(#[from] CryptoError),

    /// The constraint system itself refused an operation.
    #[error("constraint synthesis failed: {0}")]
    Synthesis(String),
}

impl From<SynthesisError> for CircuitError {
    fn from(err: SynthesisError) -> Self {
        Self::Synthesis(err.to_string())
    }
}
