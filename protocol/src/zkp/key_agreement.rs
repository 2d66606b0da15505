//! # Key Agreement Verifier
//!
//! Two scalar-multiplication consistency checks on the same private scalar:
//!
//! ```text
//! db * Qa == Qs      the claimed shared point is the seller's ECDH output
//! db * G  == Qb      the claimed seller key belongs to db
//! ```
//!
//! Each equality is enforced coordinate by coordinate, limb by limb, as a
//! pair "difference = computed - claimed; difference == 0". Without the
//! second check a prover could pair an honest `Qs` with an arbitrary `Qb`.
//!
//! Secp256k1 arithmetic is an external gadget: the computed points enter as
//! witness hints. If the primitive fails closed (scalar out of range, point
//! off curve, result at infinity) the `defined` flag is unset and the limbs
//! are compared against an all-zero placeholder. Every point check lays down
//! `defined` plus eight limb differences regardless of the witness.

use ark_bn254::Fr;
use ark_r1cs_std::{alloc::AllocVar, boolean::Boolean, fields::fp::FpVar};
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::constraints::{alloc_limbs, alloc_point, CheckLog};
use crate::crypto::{CryptoError, Primitives};
use crate::types::{PointLimbs, Uint256};

/// Enforce `computed == claimed` via per-limb zero differences, plus the
/// primitive's success flag.
fn enforce_point_equal(
    cs: ConstraintSystemRef<Fr>,
    log: &CheckLog,
    name: &'static str,
    computed: &Result<PointLimbs, CryptoError>,
    claimed: &[Vec<FpVar<Fr>>; 2],
) -> Result<(), SynthesisError> {
    log.scope(name, || -> Result<(), SynthesisError> {
        let defined = Boolean::new_witness(ns!(cs, "defined"), || Ok(computed.is_ok()))?;
        log.enforce_true("defined", &defined)?;

        let point = match computed {
            Ok(point) => *point,
            Err(err) => {
                tracing::debug!(error = %err, check = name, "scalar multiplication failed closed");
                PointLimbs::default()
            }
        };
        let ours = alloc_point(ns!(cs, "computed").cs(), &point)?;

        for (axis, (ours, theirs)) in ["x", "y"].iter().zip(ours.iter().zip(claimed.iter())) {
            for (limb, (ours, theirs)) in ours.iter().zip(theirs.iter()).enumerate() {
                log.enforce_zero(&format!("{axis}/limb{limb}"), &(ours - theirs))?;
            }
        }
        Ok(())
    })
}

/// Checks `db * Qa == Qs` and `db * G == Qb`.
#[derive(Clone)]
pub struct KeyAgreementVerifier<'a> {
    pub db: &'a Uint256,
    pub qa: &'a PointLimbs,
    pub qb: &'a PointLimbs,
    pub qs: &'a PointLimbs,
    /// `db * Qa`.
    pub shared: Result<PointLimbs, CryptoError>,
    /// `db * G`.
    pub public: Result<PointLimbs, CryptoError>,
    pub log: &'a CheckLog,
}

impl<'a> KeyAgreementVerifier<'a> {
    pub fn new<P: Primitives>(
        primitives: &P,
        db: &'a Uint256,
        qa: &'a PointLimbs,
        qb: &'a PointLimbs,
        qs: &'a PointLimbs,
        log: &'a CheckLog,
    ) -> Self {
        Self {
            db,
            qa,
            qb,
            qs,
            shared: primitives.scalar_mul(db, qa),
            public: primitives.scalar_mul_base(db),
            log,
        }
    }
}

impl ConstraintSynthesizer<Fr> for KeyAgreementVerifier<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        alloc_limbs(ns!(cs, "db").cs(), self.db)?;
        alloc_point(ns!(cs, "qa").cs(), self.qa)?;
        let qb = alloc_point(ns!(cs, "qb").cs(), self.qb)?;
        let qs = alloc_point(ns!(cs, "qs").cs(), self.qs)?;

        enforce_point_equal(
            ns!(cs, "db_qa_minus_qs").cs(),
            self.log,
            "db_qa_minus_qs",
            &self.shared,
            &qs,
        )?;
        enforce_point_equal(
            ns!(cs, "db_g_minus_qb").cs(),
            self.log,
            "db_g_minus_qb",
            &self.public,
            &qb,
        )
    }
}
