//! # Fair Exchange Flow
//!
//! The off-circuit side of the protocol. The circuit proves a statement
//! about an offer; this module produces offers and consumes them.
//!
//! ```text
//! buyer:   da, Qa = da * G  ──────────────────────────────► seller
//! seller:  db, Qb = db * G, Qs = db * Qa
//!          ew   = Encrypt(key(Qs.x), nonce, p0 ‖ p1)
//!          Hpub = split(SHA-256(Qa ‖ Qb ‖ rev(nonce) ‖ ew))
//!          proof over the witness, Hpub public   ─────────────► buyer
//! buyer:   checks Hpub against (Qa, Qb, nonce, ew)
//!          Qs = da * Qb  (= db * Qa), decrypts ew ─► p0, p1
//! ```

use ark_bn254::Fr;
use ark_ff::{PrimeField, UniformRand};
use rand::{CryptoRng, Rng};
use thiserror::Error;

use crate::config::{CIPHERTEXT_LEN, MESSAGE_LEN, PREIMAGE_LEN};
use crate::crypto::{CryptoError, Primitives};
use crate::types::{Ciphertext, PointLimbs, Preimage, PublicInputs, Uint256, Witness};
use crate::zkp::binder::compute_commitment;
use crate::zkp::encryption::{derive_key, message};

/// Errors on the buyer's side of the exchange.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The offered values do not hash to the public commitment.
    #[error("offer does not match the public commitment")]
    CommitmentMismatch,

    /// The seller's ciphertext has the wrong length.
    #[error("ciphertext has {got} elements, expected {expected}")]
    MalformedCiphertext {
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// A complete offer: the seller's witness and the public commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    pub witness: Witness,
    pub public: PublicInputs,
}

/// Sample a fresh secp256k1 private scalar in `[1, n)`.
pub fn generate_secret<R: Rng + CryptoRng>(rng: &mut R) -> Uint256 {
    loop {
        let scalar = ark_secp256k1::Fr::rand(rng);
        let secret = Uint256::from(scalar.into_bigint());
        if !secret.is_zero() {
            return secret;
        }
    }
}

/// Sample a nonce below `2^128`.
pub fn generate_nonce<R: Rng + CryptoRng>(rng: &mut R) -> Fr {
    Fr::from(rng.gen::<u128>())
}

/// `secret * G`.
pub fn derive_public_key(secret: &Uint256) -> Result<PointLimbs, CryptoError> {
    crate::crypto::ecc::scalar_mul_base(secret)
}

/// Seller side: encrypt the solution for the buyer and commit to the transcript.
pub fn prepare_offer<P: Primitives>(
    primitives: &P,
    seller_secret: &Uint256,
    buyer_public: &PointLimbs,
    preimage0: &Preimage,
    preimage1: &Preimage,
    nonce: Fr,
) -> Result<Offer, CryptoError> {
    let qb = primitives.scalar_mul_base(seller_secret)?;
    let qs = primitives.scalar_mul(seller_secret, buyer_public)?;

    let sealed = primitives.encrypt(&derive_key(&qs.x), nonce, &message(preimage0, preimage1));
    if !sealed.ok {
        return Err(CryptoError::NonceOutOfRange);
    }
    let got = sealed.ciphertext.len();
    let ew: Ciphertext = sealed
        .ciphertext
        .try_into()
        .map_err(|_| CryptoError::UnexpectedLength {
            expected: CIPHERTEXT_LEN,
            got,
        })?;

    let public = compute_commitment(primitives, buyer_public, &qb, nonce, &ew)?;
    tracing::debug!(hpub0 = %public.hpub[0], hpub1 = %public.hpub[1], "offer prepared");

    Ok(Offer {
        witness: Witness {
            preimage0: *preimage0,
            preimage1: *preimage1,
            db: *seller_secret,
            qs,
            qa: *buyer_public,
            qb,
            nonce,
            ew,
        },
        public,
    })
}

/// Buyer side: check the commitment, then recover both preimages.
pub fn open_offer<P: Primitives>(
    primitives: &P,
    buyer_secret: &Uint256,
    seller_public: &PointLimbs,
    nonce: Fr,
    ew: &[Fr],
    public: &PublicInputs,
) -> Result<(Preimage, Preimage), ExchangeError> {
    let ew: &Ciphertext = ew
        .try_into()
        .map_err(|_| ExchangeError::MalformedCiphertext {
            expected: CIPHERTEXT_LEN,
            got: ew.len(),
        })?;

    let buyer_public = primitives.scalar_mul_base(buyer_secret)?;
    let expected = compute_commitment(primitives, &buyer_public, seller_public, nonce, ew)?;
    if expected != *public {
        return Err(ExchangeError::CommitmentMismatch);
    }

    let qs = primitives.scalar_mul(buyer_secret, seller_public)?;
    let plain = primitives.decrypt(&derive_key(&qs.x), nonce, ew, MESSAGE_LEN)?;

    let mut preimage0 = [Fr::from(0u64); PREIMAGE_LEN];
    let mut preimage1 = [Fr::from(0u64); PREIMAGE_LEN];
    preimage0.copy_from_slice(&plain[..PREIMAGE_LEN]);
    preimage1.copy_from_slice(&plain[PREIMAGE_LEN..]);
    Ok((preimage0, preimage1))
}
