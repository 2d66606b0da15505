//! # Fair-Exchange Circuit
//!
//! The complete statement, composed from the four checkers over shared
//! signals:
//!
//! ```text
//! "I know (preimage0, preimage1, db, Qs, Qa, Qb, nonce, ew) such that:
//!     1. H16(preimage0) = H16(preimage1)                      (collision)
//!     2. db * Qa = Qs  and  db * G = Qb                       (key agreement)
//!     3. Encrypt(key(Qs.x), nonce, preimage0 ‖ preimage1) = ew, ok = 1
//!     4. split(SHA-256(Qa ‖ Qb ‖ rev(nonce) ‖ ew)) = Hpub"    (binding)
//! ```
//!
//! plus one prover-side assertion, `preimage0 != preimage1`, which is not
//! part of the statement.
//!
//! ## Constraint breakdown
//!
//! The elliptic-curve arithmetic, Poseidon and SHA-256 run outside the
//! constraint system and enter as witness hints. What the R1CS enforces is
//! the agreement between those hints and the claimed witness:
//!
//! | component | labeled checks |
//! |-----------|----------------|
//! | collision | 1 |
//! | key agreement | 18 (2 points × (`defined` + 2 coordinates × 4 limbs)) |
//! | encryption | 35 (`ok` + 34 ciphertext elements) |
//! | binder | 2 |
//!
//! The topology does not depend on the witness: a primitive that fails
//! closed unsets a flag but leaves every comparison in place.
//!
//! ## Public inputs (in order)
//!
//! | index | value |
//! |-------|-------|
//! | 0 | `Hpub[0]`, digest bits `[0,128)` |
//! | 1 | `Hpub[1]`, digest bits `[128,256)` |

use ark_bn254::Fr;
use ark_relations::ns;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError,
};
use serde::Serialize;

use super::binder::PublicInputBinder;
use super::collision::CollisionChecker;
use super::constraints::{Check, CheckLog, Evaluation};
use super::encryption::EncryptionVerifier;
use super::key_agreement::KeyAgreementVerifier;
use super::CircuitError;
use crate::crypto::{CryptoError, Primitives};
use crate::types::{PublicInputs, Witness};

/// Labeled enforced checks in every evaluation.
pub const NUM_CONSTRAINTS: usize = 1 + 18 + 35 + 2;

/// Main circuit: the conjunction of all four checkers.
///
/// Construction runs the primitives over the witness; synthesis only
/// allocates and compares.
#[derive(Clone)]
pub struct FairExchangeCircuit<'a> {
    pub collision: CollisionChecker<'a>,
    pub key_agreement: KeyAgreementVerifier<'a>,
    pub encryption: EncryptionVerifier<'a>,
    pub binder: PublicInputBinder<'a>,
    pub log: &'a CheckLog,
}

impl<'a> FairExchangeCircuit<'a> {
    pub fn new<P: Primitives>(
        primitives: &P,
        witness: &'a Witness,
        public: &'a PublicInputs,
        log: &'a CheckLog,
    ) -> Result<Self, CryptoError> {
        let w = witness;
        Ok(Self {
            collision: CollisionChecker::new(primitives, &w.preimage0, &w.preimage1, log),
            key_agreement: KeyAgreementVerifier::new(primitives, &w.db, &w.qa, &w.qb, &w.qs, log),
            encryption: EncryptionVerifier::new(
                primitives,
                &w.qs,
                &w.nonce,
                &w.preimage0,
                &w.preimage1,
                &w.ew,
                log,
            ),
            binder: PublicInputBinder::new(primitives, &w.qa, &w.qb, w.nonce, &w.ew, public, log)?,
            log,
        })
    }
}

impl ConstraintSynthesizer<Fr> for FairExchangeCircuit<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let _span = tracing::debug_span!("fair_exchange").entered();
        let log = self.log;
        let cs = ns!(cs, "fair_exchange").cs();

        log.scope("fair_exchange", || -> Result<(), SynthesisError> {
            log.scope("collision", || {
                self.collision
                    .generate_constraints(ns!(cs, "collision").cs())
            })?;
            log.scope("key_agreement", || {
                self.key_agreement
                    .generate_constraints(ns!(cs, "key_agreement").cs())
            })?;
            log.scope("encryption", || {
                self.encryption
                    .generate_constraints(ns!(cs, "encryption").cs())
            })?;
            log.scope("binder", || {
                self.binder.generate_constraints(ns!(cs, "binder").cs())
            })
        })?;

        tracing::debug!(
            r1cs_constraints = cs.num_constraints(),
            witness_variables = cs.num_witness_variables(),
            "fair-exchange constraints generated"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Synthesize the circuit for one instance into a fresh constraint system.
pub fn evaluate<P: Primitives>(
    primitives: &P,
    witness: &Witness,
    public: &PublicInputs,
) -> Result<Evaluation, CircuitError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let log = CheckLog::new();
    FairExchangeCircuit::new(primitives, witness, public, &log)?
        .generate_constraints(cs.clone())?;
    Ok(Evaluation::new(cs, log)?)
}

/// The verifier's predicate: do all enforced constraints hold?
///
/// Witness-sanity assertions are ignored, exactly as a proof verifier would
/// ignore them.
pub fn verify<P: Primitives>(
    primitives: &P,
    witness: &Witness,
    public: &PublicInputs,
) -> Result<bool, CircuitError> {
    Ok(evaluate(primitives, witness, public)?.is_satisfied())
}

/// Witness construction: fails on the first witness-sanity assertion or
/// enforced constraint that does not hold.
pub fn check_witness<P: Primitives>(
    primitives: &P,
    witness: &Witness,
    public: &PublicInputs,
) -> Result<CheckReport, CircuitError> {
    let eval = evaluate(primitives, witness, public)?;

    if let Some(assertion) = eval.which_is_insane() {
        return Err(CircuitError::WitnessSanity {
            assertion: assertion.to_owned(),
        });
    }
    if let Some(constraint) = eval.which_is_unsatisfied() {
        return Err(CircuitError::Unsatisfied {
            constraint: constraint.to_owned(),
        });
    }
    Ok(CheckReport::from(&eval))
}

/// Summary of one evaluation, suitable for printing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// All enforced constraints hold.
    pub satisfied: bool,
    /// All witness-sanity assertions hold.
    pub witness_sane: bool,
    pub num_constraints: usize,
    pub num_r1cs_constraints: usize,
    pub num_witness_assertions: usize,
    /// Every failing check, in evaluation order.
    pub failures: Vec<Check>,
}

impl From<&Evaluation> for CheckReport {
    fn from(eval: &Evaluation) -> Self {
        Self {
            satisfied: eval.is_satisfied(),
            witness_sane: eval.is_witness_sane(),
            num_constraints: eval.num_constraints(),
            num_r1cs_constraints: eval.num_r1cs_constraints(),
            num_witness_assertions: eval.num_witness_assertions(),
            failures: eval
                .checks()
                .iter()
                .filter(|check| !check.satisfied)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::StandardPrimitives;
    use crate::exchange::{derive_public_key, prepare_offer};
    use crate::types::{Preimage, Uint256};
    use ark_bn254::Fr;
    use ark_ff::UniformRand;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    /// A self-collision offer: passes every enforced constraint with real Poseidon.
    fn self_collision() -> (StandardPrimitives, Witness, PublicInputs) {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = StandardPrimitives::new();
        let p: Preimage = std::array::from_fn(|_| Fr::rand(&mut rng));
        let buyer = derive_public_key(&Uint256::from_u64(0xB0B)).unwrap();

        let offer = prepare_offer(
            &primitives,
            &Uint256::from_u64(0xA11CE),
            &buyer,
            &p,
            &p,
            Fr::from(99u64),
        )
        .unwrap();
        (primitives, offer.witness, offer.public)
    }

    #[test]
    fn full_evaluation_records_every_constraint() {
        let (primitives, witness, public) = self_collision();
        let eval = evaluate(&primitives, &witness, &public).unwrap();

        assert_eq!(eval.num_constraints(), NUM_CONSTRAINTS);
        assert_eq!(eval.num_witness_assertions(), 1);
        assert!(eval.constraint_system().is_satisfied().unwrap());
        assert!(eval
            .checks()
            .iter()
            .all(|check| check.label.starts_with("fair_exchange/")));
    }

    #[test]
    fn topology_does_not_depend_on_the_witness() {
        let (primitives, witness, public) = self_collision();
        let honest = evaluate(&primitives, &witness, &public).unwrap();

        let mut zero_scalar = witness.clone();
        zero_scalar.db = Uint256::default();
        let mut off_curve = witness.clone();
        off_curve.qs.y.0[0] ^= 1;
        off_curve.qa.x.0[0] ^= 1;
        let mut wide_nonce = witness;
        wide_nonce.nonce = -Fr::from(1u64);

        for broken in [zero_scalar, off_curve, wide_nonce] {
            let eval = evaluate(&primitives, &broken, &public).unwrap();
            assert!(!eval.is_satisfied());
            assert_eq!(eval.num_constraints(), NUM_CONSTRAINTS);
            assert_eq!(eval.num_r1cs_constraints(), honest.num_r1cs_constraints());
            assert_eq!(
                eval.constraint_system().num_witness_variables(),
                honest.constraint_system().num_witness_variables()
            );
        }
    }

    #[test]
    fn hpub_occupies_the_instance_in_order() {
        let (primitives, witness, public) = self_collision();
        let eval = evaluate(&primitives, &witness, &public).unwrap();

        let cs = eval.constraint_system();
        assert_eq!(cs.num_instance_variables(), 1 + public.to_vec().len());
        let instance = cs.borrow().unwrap().instance_assignment.clone();
        assert_eq!(&instance[1..], public.to_vec().as_slice());
    }

    #[test]
    fn check_witness_reports_sanity_before_constraints() {
        let (primitives, witness, public) = self_collision();
        assert_eq!(
            check_witness(&primitives, &witness, &public),
            Err(CircuitError::WitnessSanity {
                assertion: "fair_exchange/collision/preimages_distinct".into()
            })
        );
        assert!(verify(&primitives, &witness, &public).unwrap());
    }

    #[test]
    fn report_lists_failures() {
        let (primitives, witness, mut public) = self_collision();
        public.hpub[1] += Fr::from(1u64);

        let eval = evaluate(&primitives, &witness, &public).unwrap();
        assert!(!eval.constraint_system().is_satisfied().unwrap());
        let report = CheckReport::from(&eval);

        assert!(!report.satisfied);
        assert!(!report.witness_sane);
        assert_eq!(report.num_r1cs_constraints, eval.num_r1cs_constraints());
        let labels: Vec<_> = report.failures.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "fair_exchange/collision/preimages_distinct",
                "fair_exchange/binder/hpub1"
            ]
        );
    }
}
