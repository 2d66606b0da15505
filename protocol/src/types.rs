//! # Witness Value Types
//!
//! Shapes of the values that flow through the circuit. 256-bit integers are
//! kept as four independent little-endian 64-bit limbs: this layer never
//! carries between limbs, all modular arithmetic is left to the curve library.

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger};

use crate::config::{CIPHERTEXT_LEN, KEY_WORDS, NUM_LIMBS, PREIMAGE_LEN};

/// One candidate input block of the collision hash.
pub type Preimage = [Fr; PREIMAGE_LEN];

/// Authenticated ciphertext of both preimages (33 sponge outputs + tag).
pub type Ciphertext = [Fr; CIPHERTEXT_LEN];

/// Key material consumed by the encryption primitive.
pub type SymmetricKey = [Fr; KEY_WORDS];

// ---------------------------------------------------------------------------
// Uint256
// ---------------------------------------------------------------------------

/// A 256-bit unsigned integer as little-endian 64-bit limbs (`limbs[0]` is
/// the least significant).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uint256(pub [u64; NUM_LIMBS]);

impl Uint256 {
    /// Wrap raw limbs.
    pub const fn from_limbs(limbs: [u64; NUM_LIMBS]) -> Self {
        Self(limbs)
    }

    /// Small integer in the lowest limb.
    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    pub fn limbs(&self) -> &[u64; NUM_LIMBS] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|limb| *limb == 0)
    }

    /// View as an arkworks big integer (same limb order).
    pub fn to_bigint(&self) -> BigInt<NUM_LIMBS> {
        BigInt::new(self.0)
    }

    /// Each limb lifted into the circuit field.
    pub fn to_field_limbs(&self) -> [Fr; NUM_LIMBS] {
        self.0.map(Fr::from)
    }

    /// Big-endian bit decomposition (position 0 is the most significant bit).
    pub fn to_bits_be(&self) -> Vec<bool> {
        self.to_bigint().to_bits_be()
    }
}

impl From<BigInt<NUM_LIMBS>> for Uint256 {
    fn from(value: BigInt<NUM_LIMBS>) -> Self {
        Self(value.0)
    }
}

// ---------------------------------------------------------------------------
// PointLimbs
// ---------------------------------------------------------------------------

/// Affine secp256k1 point with limb-encoded coordinates.
///
/// Nothing about this type guarantees the point is on the curve; that is
/// checked when a point enters the scalar-multiplication primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointLimbs {
    pub x: Uint256,
    pub y: Uint256,
}

impl PointLimbs {
    pub const fn new(x: Uint256, y: Uint256) -> Self {
        Self { x, y }
    }

    /// Coordinates in serialization order.
    pub fn coordinates(&self) -> [&Uint256; 2] {
        [&self.x, &self.y]
    }
}

// ---------------------------------------------------------------------------
// Witness / public inputs
// ---------------------------------------------------------------------------

/// Every private signal a seller holds for one exchange.
///
/// `qa`, `qb`, `nonce` and `ew` are private to the proof but bound to the
/// public commitment through the transcript hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    pub preimage0: Preimage,
    pub preimage1: Preimage,
    /// Seller private scalar.
    pub db: Uint256,
    /// Shared secret point `db * Qa`.
    pub qs: PointLimbs,
    /// Buyer public key.
    pub qa: PointLimbs,
    /// Seller public key `db * G`.
    pub qb: PointLimbs,
    pub nonce: Fr,
    pub ew: Ciphertext,
}

/// The 256-bit transcript digest split into two 128-bit field elements.
///
/// `hpub[0]` holds digest bits `[0, 128)`, `hpub[1]` holds bits `[128, 256)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicInputs {
    pub hpub: [Fr; 2],
}

impl PublicInputs {
    pub const fn new(hpub: [Fr; 2]) -> Self {
        Self { hpub }
    }

    /// Flattened public input vector, in allocation order.
    pub fn to_vec(&self) -> Vec<Fr> {
        self.hpub.to_vec()
    }
}
