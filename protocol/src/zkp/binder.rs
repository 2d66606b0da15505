//! # Public Input Binder
//!
//! Binds every quasi-public value to the single public commitment `Hpub`:
//!
//! ```text
//! bits     | field | encoding
//! ---------+-------+-------------------------------------------------
//! [0,512)      Qa    x then y, 256 bits each, big-endian
//! [512,1024)   Qb    same
//! [1024,1280)  nonce 256 bits, bit-REVERSED (position 1024+i = BE bit 255-i)
//! [1280,9984)  ew    34 elements x 256 bits, big-endian, in order
//!
//! digest = SHA-256(bits)
//! Hpub[0] = digest[0,128)   Hpub[1] = digest[128,256)   (big-endian)
//! ```
//!
//! Only the nonce is reversed. That is a fixed property of the transcript
//! format, so each field has its own serializer instead of one shared rule.
//!
//! SHA-256 runs outside the constraint system. `Hpub` is the only public
//! input of the circuit; the two digest halves enter as witness hints.

use ark_bn254::Fr;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar};
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::constraints::CheckLog;
use crate::config::{COMMITMENT_HALF_BITS, DIGEST_BITS, ELEMENT_BITS, TRANSCRIPT_BITS};
use crate::crypto::bits::{from_bits, point_to_bits, to_bits};
use crate::crypto::{CryptoError, Primitives};
use crate::types::{Ciphertext, PointLimbs, PublicInputs};

/// Serializer for `Qa` and `Qb`.
pub fn key_bits(point: &PointLimbs) -> Vec<bool> {
    point_to_bits(point)
}

/// Serializer for the nonce: the 256-bit big-endian decomposition, reversed.
pub fn nonce_bits(nonce: Fr) -> Result<Vec<bool>, CryptoError> {
    let mut bits = to_bits(nonce, ELEMENT_BITS)?;
    bits.reverse();
    Ok(bits)
}

/// Serializer for the ciphertext: each element 256 bits big-endian.
pub fn ciphertext_bits(ew: &Ciphertext) -> Result<Vec<bool>, CryptoError> {
    let mut bits = Vec::with_capacity(ew.len() * ELEMENT_BITS);
    for element in ew {
        bits.extend(to_bits(*element, ELEMENT_BITS)?);
    }
    Ok(bits)
}

/// The full 9984-bit transcript `Qa ‖ Qb ‖ rev(nonce) ‖ ew`.
pub fn transcript_bits(
    qa: &PointLimbs,
    qb: &PointLimbs,
    nonce: Fr,
    ew: &Ciphertext,
) -> Result<Vec<bool>, CryptoError> {
    let mut bits = Vec::with_capacity(TRANSCRIPT_BITS);
    bits.extend(key_bits(qa));
    bits.extend(key_bits(qb));
    bits.extend(nonce_bits(nonce)?);
    bits.extend(ciphertext_bits(ew)?);
    debug_assert_eq!(bits.len(), TRANSCRIPT_BITS);
    Ok(bits)
}

/// Split a 256-bit digest into the two public field elements.
pub fn split_digest(digest: &[bool]) -> Result<[Fr; 2], CryptoError> {
    if digest.len() != DIGEST_BITS {
        return Err(CryptoError::UnexpectedLength {
            expected: DIGEST_BITS,
            got: digest.len(),
        });
    }
    let (high, low) = digest.split_at(COMMITMENT_HALF_BITS);
    Ok([from_bits(high), from_bits(low)])
}

/// Hash the transcript, returning the raw 256-bit digest.
pub fn transcript_digest<P: Primitives>(
    primitives: &P,
    qa: &PointLimbs,
    qb: &PointLimbs,
    nonce: Fr,
    ew: &Ciphertext,
) -> Result<Vec<bool>, CryptoError> {
    let bits = transcript_bits(qa, qb, nonce, ew)?;
    primitives.hash_stream(&bits)
}

/// Compute the public commitment a verifier should expect.
pub fn compute_commitment<P: Primitives>(
    primitives: &P,
    qa: &PointLimbs,
    qb: &PointLimbs,
    nonce: Fr,
    ew: &Ciphertext,
) -> Result<PublicInputs, CryptoError> {
    let digest = transcript_digest(primitives, qa, qb, nonce, ew)?;
    Ok(PublicInputs::new(split_digest(&digest)?))
}

/// Checks `split(SHA-256(transcript)) == Hpub`.
#[derive(Clone, Copy)]
pub struct PublicInputBinder<'a> {
    pub public: &'a PublicInputs,
    /// The transcript digest, split like `Hpub`.
    pub halves: [Fr; 2],
    pub log: &'a CheckLog,
}

impl<'a> PublicInputBinder<'a> {
    pub fn new<P: Primitives>(
        primitives: &P,
        qa: &PointLimbs,
        qb: &PointLimbs,
        nonce: Fr,
        ew: &Ciphertext,
        public: &'a PublicInputs,
        log: &'a CheckLog,
    ) -> Result<Self, CryptoError> {
        let digest = transcript_digest(primitives, qa, qb, nonce, ew)?;
        Ok(Self {
            public,
            halves: split_digest(&digest)?,
            log,
        })
    }
}

impl ConstraintSynthesizer<Fr> for PublicInputBinder<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let inputs = ns!(cs, "hpub").cs();
        let hpub = self
            .public
            .to_vec()
            .into_iter()
            .map(|half| FpVar::<Fr>::new_input(inputs.clone(), || Ok(half)))
            .collect::<Result<Vec<_>, _>>()?;

        let halves = ns!(cs, "digest").cs();
        let digest = self
            .halves
            .iter()
            .map(|half| FpVar::<Fr>::new_witness(halves.clone(), || Ok(*half)))
            .collect::<Result<Vec<_>, _>>()?;

        self.log.enforce_equal("hpub0", &digest[0], &hpub[0])?;
        self.log.enforce_equal("hpub1", &digest[1], &hpub[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CIPHERTEXT_LEN, TRANSCRIPT_EW_OFFSET, TRANSCRIPT_NONCE_OFFSET, TRANSCRIPT_QB_OFFSET,
    };
    use crate::crypto::bits::pack_bits;
    use crate::crypto::hash::sha256;
    use crate::crypto::{ecc, StandardPrimitives};
    use crate::types::Uint256;
    use crate::zkp::constraints::Evaluation;
    use ark_ff::{One, UniformRand};
    use ark_relations::r1cs::ConstraintSystem;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    struct Fixture {
        qa: PointLimbs,
        qb: PointLimbs,
        nonce: Fr,
        ew: Ciphertext,
    }

    fn fixture() -> Fixture {
        let mut rng = StdRng::seed_from_u64(42);
        Fixture {
            qa: ecc::scalar_mul_base(&Uint256::from_u64(11)).unwrap(),
            qb: ecc::scalar_mul_base(&Uint256::from_u64(13)).unwrap(),
            nonce: Fr::from(0x0123_4567_89ab_cdefu64),
            ew: std::array::from_fn(|_| Fr::rand(&mut rng)),
        }
    }

    fn run(primitives: &StandardPrimitives, f: &Fixture, public: &PublicInputs) -> Evaluation {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let log = CheckLog::new();
        PublicInputBinder::new(primitives, &f.qa, &f.qb, f.nonce, &f.ew, public, &log)
            .unwrap()
            .generate_constraints(cs.clone())
            .unwrap();
        Evaluation::new(cs, log).unwrap()
    }

    #[test]
    fn transcript_layout() {
        let f = fixture();
        let bits = transcript_bits(&f.qa, &f.qb, Fr::from(1u64), &f.ew).unwrap();

        assert_eq!(bits.len(), 9984);
        assert_eq!(&bits[..TRANSCRIPT_QB_OFFSET], key_bits(&f.qa).as_slice());
        assert_eq!(
            &bits[TRANSCRIPT_QB_OFFSET..TRANSCRIPT_NONCE_OFFSET],
            key_bits(&f.qb).as_slice()
        );
        // nonce = 1: its least significant bit lands first.
        assert!(bits[TRANSCRIPT_NONCE_OFFSET]);
        assert!(bits[TRANSCRIPT_NONCE_OFFSET + 1..TRANSCRIPT_EW_OFFSET]
            .iter()
            .all(|b| !*b));
        assert_eq!(
            &bits[TRANSCRIPT_EW_OFFSET..TRANSCRIPT_EW_OFFSET + ELEMENT_BITS],
            to_bits(f.ew[0], ELEMENT_BITS).unwrap().as_slice()
        );
        assert_eq!(CIPHERTEXT_LEN * ELEMENT_BITS, 9984 - TRANSCRIPT_EW_OFFSET);
    }

    #[test]
    fn commitment_is_plain_sha256_of_the_packed_transcript() {
        let f = fixture();
        let primitives = StandardPrimitives::new();
        let bytes = pack_bits(&transcript_bits(&f.qa, &f.qb, f.nonce, &f.ew).unwrap()).unwrap();
        assert_eq!(bytes.len(), 1248);

        let digest = sha256(&bytes);
        let hi = u128::from_be_bytes(digest[..16].try_into().unwrap());
        let lo = u128::from_be_bytes(digest[16..].try_into().unwrap());

        let public = compute_commitment(&primitives, &f.qa, &f.qb, f.nonce, &f.ew).unwrap();
        assert_eq!(public.hpub, [Fr::from(hi), Fr::from(lo)]);
    }

    #[test]
    fn honest_commitment_satisfies() {
        let f = fixture();
        let primitives = StandardPrimitives::new();
        let public = compute_commitment(&primitives, &f.qa, &f.qb, f.nonce, &f.ew).unwrap();

        let eval = run(&primitives, &f, &public);
        assert!(eval.constraint_system().is_satisfied().unwrap());
        assert_eq!(eval.num_constraints(), 2);
    }

    #[test]
    fn hpub_is_the_only_public_input() {
        let f = fixture();
        let primitives = StandardPrimitives::new();
        let public = compute_commitment(&primitives, &f.qa, &f.qb, f.nonce, &f.ew).unwrap();

        let eval = run(&primitives, &f, &public);
        let cs = eval.constraint_system().borrow().unwrap();
        assert_eq!(
            cs.instance_assignment,
            vec![Fr::one(), public.hpub[0], public.hpub[1]]
        );
    }

    #[test]
    fn short_digest_is_rejected() {
        assert_eq!(
            split_digest(&[true; 100]),
            Err(CryptoError::UnexpectedLength {
                expected: 256,
                got: 100
            })
        );
        assert!(split_digest(&[false; 300]).is_err());
        assert_eq!(split_digest(&[false; 256]).unwrap(), [Fr::from(0u64); 2]);
    }

    #[test]
    fn forgetting_the_nonce_reversal_breaks_the_binding() {
        let f = fixture();
        let primitives = StandardPrimitives::new();

        let mut naive = Vec::new();
        naive.extend(key_bits(&f.qa));
        naive.extend(key_bits(&f.qb));
        naive.extend(to_bits(f.nonce, ELEMENT_BITS).unwrap());
        naive.extend(ciphertext_bits(&f.ew).unwrap());
        let naive_hpub = split_digest(&primitives.hash_stream(&naive).unwrap()).unwrap();

        let eval = run(&primitives, &f, &PublicInputs::new(naive_hpub));
        assert!(!eval.is_satisfied());
        assert_eq!(eval.which_is_unsatisfied(), Some("hpub0"));
    }

    #[test]
    fn any_bound_field_change_breaks_the_binding() {
        let mut f = fixture();
        let primitives = StandardPrimitives::new();
        let public = compute_commitment(&primitives, &f.qa, &f.qb, f.nonce, &f.ew).unwrap();

        f.ew[33] += Fr::from(1u64);
        assert!(!run(&primitives, &f, &public).is_satisfied());
        f.ew[33] -= Fr::from(1u64);

        f.nonce += Fr::from(1u64);
        assert!(!run(&primitives, &f, &public).is_satisfied());
        f.nonce -= Fr::from(1u64);

        std::mem::swap(&mut f.qa, &mut f.qb);
        assert!(!run(&primitives, &f, &public).is_satisfied());
    }
}
