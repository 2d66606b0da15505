//! Error types for the cryptographic primitives.

use thiserror::Error;

/// Errors raised by the primitives behind [`super::Primitives`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The scalar is zero or not below the secp256k1 group order.
    #[error("invalid scalar: must be in [1, n)")]
    InvalidScalar,

    /// A coordinate is not below the secp256k1 base field modulus.
    #[error("non-canonical coordinate: must be below p")]
    NonCanonicalCoordinate,

    /// The coordinates do not satisfy the curve equation.
    #[error("point is not on secp256k1")]
    PointNotOnCurve,

    /// The result is the point at infinity, which has no affine encoding.
    #[error("point at infinity has no affine limb encoding")]
    PointAtInfinity,

    /// A bit string handed to a byte-oriented hash is not byte aligned.
    #[error("bit length {0} is not a multiple of 8")]
    UnalignedBitLength(usize),

    /// A value does not fit in the requested bit width.
    #[error("value does not fit in {width} bits")]
    ValueTooWide {
        /// Requested width.
        width: usize,
    },

    /// Nonces must be strictly below `2^128`.
    #[error("nonce out of range: must be below 2^128")]
    NonceOutOfRange,

    /// A primitive produced or received a sequence of the wrong length.
    #[error("unexpected length: expected {expected}, got {got}")]
    UnexpectedLength {
        /// Required number of elements.
        expected: usize,
        /// Number of elements present.
        got: usize,
    },

    /// Authentication failed or the ciphertext is malformed.
    #[error("decryption failed -- wrong key, nonce or corrupted ciphertext")]
    DecryptionFailed,
}
