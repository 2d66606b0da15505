//! # Cryptographic Primitives
//!
//! The building blocks the circuit treats as audited black boxes:
//!
//! - **bits** — fixed-width big-endian bit decompositions.
//! - **hash** — SHA-256 over bit strings (transcript binding).
//! - **poseidon** — the Poseidon permutation and the 16-input collision hash.
//! - **encryption** — Poseidon duplex-sponge authenticated encryption.
//! - **ecc** — secp256k1 scalar multiplication over limb encodings.
//!
//! The circuit never calls these modules directly. It goes through the
//! [`Primitives`] trait, so an instance can be evaluated against a different
//! set of building blocks (tests inject a collision-admitting hash).
//!
//! Nothing in here is novel, and that is the point. If you are tempted to
//! add a home-grown primitive to this list, write the attack first.

pub mod bits;
pub mod ecc;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod poseidon;

pub use encryption::{Encrypted, PoseidonCipher};
pub use error::CryptoError;
pub use poseidon::{CollisionHash, PoseidonHash16, PoseidonPermutation};

use ark_bn254::Fr;

use crate::types::{PointLimbs, Preimage, SymmetricKey, Uint256};

/// Narrow interface to the external gadgets.
pub trait Primitives {
    /// Fixed-arity collision-resistant hash `H16`.
    fn hash16(&self, input: &Preimage) -> Fr;

    /// Streaming hash over a bit string, producing 256 bits.
    fn hash_stream(&self, bits: &[bool]) -> Result<Vec<bool>, CryptoError>;

    /// `scalar * point` on secp256k1; fails closed on invalid inputs.
    fn scalar_mul(&self, scalar: &Uint256, point: &PointLimbs) -> Result<PointLimbs, CryptoError>;

    /// `scalar * G` on secp256k1; fails closed on invalid inputs.
    fn scalar_mul_base(&self, scalar: &Uint256) -> Result<PointLimbs, CryptoError>;

    /// Authenticated encryption; `ok` reports whether the inputs were valid.
    fn encrypt(&self, key: &SymmetricKey, nonce: Fr, message: &[Fr]) -> Encrypted;

    /// Inverse of [`Primitives::encrypt`] for a `length`-element message.
    fn decrypt(
        &self,
        key: &SymmetricKey,
        nonce: Fr,
        ciphertext: &[Fr],
        length: usize,
    ) -> Result<Vec<Fr>, CryptoError>;
}

/// The production primitive set: Poseidon, SHA-256 and secp256k1.
///
/// Building one generates the Poseidon round constants, so construct it once
/// and share it by reference. The collision hash is a type parameter only so
/// that it can be replaced wholesale; everything else is fixed.
#[derive(Clone, Debug)]
pub struct StandardPrimitives<H = PoseidonHash16> {
    collision_hash: H,
    cipher: PoseidonCipher,
}

impl StandardPrimitives {
    pub fn new() -> Self {
        Self::with_collision_hash(PoseidonHash16::new())
    }
}

impl Default for StandardPrimitives {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CollisionHash> StandardPrimitives<H> {
    /// Standard primitives with a different `H16`.
    pub fn with_collision_hash(collision_hash: H) -> Self {
        Self {
            collision_hash,
            cipher: PoseidonCipher::new(),
        }
    }
}

impl<H: CollisionHash> Primitives for StandardPrimitives<H> {
    fn hash16(&self, input: &Preimage) -> Fr {
        self.collision_hash.hash16(input)
    }

    fn hash_stream(&self, bits: &[bool]) -> Result<Vec<bool>, CryptoError> {
        hash::sha256_bits(bits)
    }

    fn scalar_mul(&self, scalar: &Uint256, point: &PointLimbs) -> Result<PointLimbs, CryptoError> {
        ecc::scalar_mul(scalar, point)
    }

    fn scalar_mul_base(&self, scalar: &Uint256) -> Result<PointLimbs, CryptoError> {
        ecc::scalar_mul_base(scalar)
    }

    fn encrypt(&self, key: &SymmetricKey, nonce: Fr, message: &[Fr]) -> Encrypted {
        self.cipher.encrypt(key, nonce, message)
    }

    fn decrypt(
        &self,
        key: &SymmetricKey,
        nonce: Fr,
        ciphertext: &[Fr],
        length: usize,
    ) -> Result<Vec<Fr>, CryptoError> {
        self.cipher.decrypt(key, nonce, ciphertext, length)
    }
}
