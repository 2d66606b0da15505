//! # Fair-Exchange Circuit Module
//!
//! The statement a seller proves: "the ciphertext I am selling you decrypts,
//! under a key only you and I can derive, to a collision of H16, and every
//! value I am showing you is bound to the public commitment".
//!
//! ## Architecture
//!
//! ```text
//! constraints.rs    — check labels over the R1CS, allocation helpers
//! collision.rs      — H16(p0) = H16(p1), plus the distinctness assertion
//! key_agreement.rs  — db * Qa = Qs, db * G = Qb
//! encryption.rs     — Encrypt(key(Qs.x), nonce, p0 ‖ p1) = ew
//! binder.rs         — SHA-256 transcript binding to Hpub
//! circuit.rs        — FairExchangeCircuit, evaluate, verify, check_witness
//! witness.rs        — circom-style JSON witness files
//! ```
//!
//! ## Security Model
//!
//! - **Binding**: the 1248-byte transcript fixes `Qa`, `Qb`, `nonce` and
//!   `ew`; the buyer recomputes it from what it received.
//! - **Key agreement**: both points are checked limb by limb; a scalar or
//!   point the curve library rejects fails the instance.
//! - **Collision**: the preimages are NOT constrained to differ. A seller can
//!   satisfy the statement with `p0 = p1`. [`check_witness`] refuses such a
//!   witness, [`verify`] accepts it.

pub mod binder;
pub mod circuit;
pub mod collision;
pub mod constraints;
pub mod encryption;
pub mod error;
pub mod key_agreement;
pub mod witness;

pub use circuit::{
    check_witness, evaluate, verify, CheckReport, FairExchangeCircuit, NUM_CONSTRAINTS,
};
pub use constraints::{Check, CheckKind, CheckLog, Evaluation};
pub use error::CircuitError;
pub use witness::{parse_witness_json, WitnessError, WitnessFile};
