//! # Collision Checker
//!
//! ```text
//! prover only:  OR_i (p0[i] XOR p1[i]) != 0        (the two preimages differ)
//! enforced:     H16(p0) == H16(p1)                 (they collide)
//! ```
//!
//! `H16` is an external gadget: the preimages are allocated as private
//! witnesses and the two digests enter the constraint system as hints.
//!
//! The distinctness assertion is recorded as a witness-sanity check and adds
//! nothing to the R1CS. Nothing in the enforced set forbids `p0 == p1`, so a
//! prover can present a preimage "colliding" with itself and still satisfy
//! every constraint. That behavior is kept as-is.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar};
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::constraints::{alloc_elements, CheckLog};
use crate::crypto::Primitives;
use crate::types::Preimage;

/// Accumulated bitwise XOR of the canonical representations of each pair,
/// OR-ed together. Non-zero iff the preimages differ somewhere.
pub fn accumulated_difference(preimage0: &Preimage, preimage1: &Preimage) -> [u64; 4] {
    preimage0
        .iter()
        .zip(preimage1.iter())
        .fold([0u64; 4], |mut acc, (a, b)| {
            let a = a.into_bigint();
            let b = b.into_bigint();
            for (limb, (x, y)) in acc.iter_mut().zip(a.0.iter().zip(b.0.iter())) {
                *limb |= x ^ y;
            }
            acc
        })
}

/// Checks that two preimages collide under `H16`.
#[derive(Clone, Copy)]
pub struct CollisionChecker<'a> {
    pub preimage0: &'a Preimage,
    pub preimage1: &'a Preimage,
    /// `H16(preimage0)`.
    pub hash0: Fr,
    /// `H16(preimage1)`.
    pub hash1: Fr,
    pub log: &'a CheckLog,
}

impl<'a> CollisionChecker<'a> {
    pub fn new<P: Primitives>(
        primitives: &P,
        preimage0: &'a Preimage,
        preimage1: &'a Preimage,
        log: &'a CheckLog,
    ) -> Self {
        Self {
            preimage0,
            preimage1,
            hash0: primitives.hash16(preimage0),
            hash1: primitives.hash16(preimage1),
            log,
        }
    }
}

impl ConstraintSynthesizer<Fr> for CollisionChecker<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let difference = accumulated_difference(self.preimage0, self.preimage1);
        let differs = difference.iter().any(|limb| *limb != 0);
        self.log.assert_witness("preimages_distinct", differs);

        alloc_elements(ns!(cs, "preimage0").cs(), self.preimage0)?;
        alloc_elements(ns!(cs, "preimage1").cs(), self.preimage1)?;

        let h0 = FpVar::<Fr>::new_witness(ns!(cs, "hash0"), || Ok(self.hash0))?;
        let h1 = FpVar::<Fr>::new_witness(ns!(cs, "hash1"), || Ok(self.hash1))?;
        self.log.enforce_equal("hash_equal", &h0, &h1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::StandardPrimitives;
    use crate::zkp::constraints::Evaluation;
    use ark_ff::UniformRand;
    use ark_relations::r1cs::ConstraintSystem;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn run(primitives: &StandardPrimitives, p0: &Preimage, p1: &Preimage) -> Evaluation {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let log = CheckLog::new();
        CollisionChecker::new(primitives, p0, p1, &log)
            .generate_constraints(cs.clone())
            .unwrap();
        Evaluation::new(cs, log).unwrap()
    }

    #[test]
    fn difference_is_zero_only_for_equal_preimages() {
        let mut rng = StdRng::seed_from_u64(42);
        let p0: Preimage = std::array::from_fn(|_| Fr::rand(&mut rng));
        let mut p1 = p0;

        assert_eq!(accumulated_difference(&p0, &p1), [0; 4]);
        p1[9] += Fr::from(1u64);
        assert_ne!(accumulated_difference(&p0, &p1), [0; 4]);
    }

    #[test]
    fn distinct_non_colliding_preimages_unsatisfied() {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = StandardPrimitives::new();
        let p0: Preimage = std::array::from_fn(|_| Fr::rand(&mut rng));
        let p1: Preimage = std::array::from_fn(|_| Fr::rand(&mut rng));

        let eval = run(&primitives, &p0, &p1);
        assert!(eval.is_witness_sane());
        assert!(!eval.constraint_system().is_satisfied().unwrap());
        assert_eq!(eval.which_is_unsatisfied(), Some("hash_equal"));
    }

    #[test]
    fn identical_preimages_pass_enforced_checks() {
        let mut rng = StdRng::seed_from_u64(42);
        let primitives = StandardPrimitives::new();
        let p0: Preimage = std::array::from_fn(|_| Fr::rand(&mut rng));

        let eval = run(&primitives, &p0, &p0);
        assert!(
            eval.constraint_system().is_satisfied().unwrap(),
            "self-collision is not excluded by any constraint"
        );
        assert_eq!(eval.which_is_insane(), Some("preimages_distinct"));
    }

    #[test]
    fn preimages_and_digests_are_private() {
        let primitives = StandardPrimitives::new();
        let p: Preimage = std::array::from_fn(|i| Fr::from(i as u64));

        let eval = run(&primitives, &p, &p);
        let cs = eval.constraint_system();
        assert_eq!(cs.num_instance_variables(), 1, "only the constant one");
        assert_eq!(cs.num_witness_variables(), 2 * 16 + 2);
        assert_eq!(eval.num_constraints(), 1);
    }
}
