//! # Encryption Verifier
//!
//! Enforces that `ew` is the authenticated encryption of `preimage0 ‖ preimage1`
//! under a key both parties can derive from the shared point, and that the
//! primitive reported success.
//!
//! ## Key derivation
//!
//! The x-coordinate of `Qs` has four 64-bit limbs; the primitive takes two
//! key words. Limbs are packed pairwise into 128-bit words:
//!
//! ```text
//! key[0] = x0 + x1 * 2^64
//! key[1] = x2 + x3 * 2^64
//! ```
//!
//! The cipher runs outside the constraint system. Its output and `ok` flag
//! enter as hints. A cipher that returns the wrong number of elements clears
//! `ok`, and its output is padded or cut to 34 elements, so the same 35
//! checks are laid down for every witness.

use ark_bn254::Fr;
use ark_ff::{Field, Zero};
use ark_r1cs_std::{alloc::AllocVar, boolean::Boolean, fields::fp::FpVar};
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::constraints::{alloc_elements, CheckLog};
use crate::config::{CIPHERTEXT_LEN, LIMB_BITS, MESSAGE_LEN};
use crate::crypto::{Encrypted, Primitives};
use crate::types::{Ciphertext, PointLimbs, Preimage, SymmetricKey, Uint256};

/// Derive the symmetric key from the shared point's x-coordinate.
pub fn derive_key(x: &Uint256) -> SymmetricKey {
    let shift = Fr::from(2u64).pow([LIMB_BITS as u64]);
    let limbs = x.to_field_limbs();
    [limbs[0] + limbs[1] * shift, limbs[2] + limbs[3] * shift]
}

/// The plaintext: both preimages, `preimage0` first.
pub fn message(preimage0: &Preimage, preimage1: &Preimage) -> Vec<Fr> {
    let mut message = Vec::with_capacity(MESSAGE_LEN);
    message.extend_from_slice(preimage0);
    message.extend_from_slice(preimage1);
    message
}

/// Checks `Encrypt(key(Qs.x), nonce, p0 ‖ p1) == ew` and `ok == 1`.
#[derive(Clone)]
pub struct EncryptionVerifier<'a> {
    pub nonce: &'a Fr,
    pub ew: &'a Ciphertext,
    /// The cipher's output for the witness.
    pub sealed: Encrypted,
    pub log: &'a CheckLog,
}

impl<'a> EncryptionVerifier<'a> {
    pub fn new<P: Primitives>(
        primitives: &P,
        qs: &PointLimbs,
        nonce: &'a Fr,
        preimage0: &Preimage,
        preimage1: &Preimage,
        ew: &'a Ciphertext,
        log: &'a CheckLog,
    ) -> Self {
        let key = derive_key(&qs.x);
        Self {
            nonce,
            ew,
            sealed: primitives.encrypt(&key, *nonce, &message(preimage0, preimage1)),
            log,
        }
    }
}

impl ConstraintSynthesizer<Fr> for EncryptionVerifier<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let well_formed = self.sealed.ciphertext.len() == CIPHERTEXT_LEN;
        if !well_formed {
            tracing::debug!(
                got = self.sealed.ciphertext.len(),
                expected = CIPHERTEXT_LEN,
                "cipher returned a malformed ciphertext"
            );
        }
        let mut computed = self.sealed.ciphertext;
        computed.resize(CIPHERTEXT_LEN, Fr::zero());

        FpVar::<Fr>::new_witness(ns!(cs, "nonce"), || Ok(*self.nonce))?;

        let ok = Boolean::new_witness(ns!(cs, "ok"), || Ok(self.sealed.ok && well_formed))?;
        self.log.enforce_true("ok", &ok)?;

        let computed = alloc_elements(ns!(cs, "computed").cs(), &computed)?;
        let claimed = alloc_elements(ns!(cs, "ew").cs(), self.ew)?;
        for (i, (computed, claimed)) in computed.iter().zip(claimed.iter()).enumerate() {
            self.log.enforce_equal(&format!("ew{i}"), computed, claimed)?;
        }

        Ok(())
    }
}
