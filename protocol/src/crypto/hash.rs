//! # Hashing over Bit Strings
//!
//! The transcript hash is boring, plain SHA-256, and we intend to keep it
//! that way. Poseidon would be cheaper inside a circuit, but the commitment
//! is checked by buyers and escrow contracts that have SHA-256 in their
//! standard library and nothing else. Nobody should need our crate to
//! recompute two field elements.
//!
//! ## Bit order
//!
//! The binder thinks in bits; SHA-256 thinks in bytes. Bits are packed
//! most-significant-bit first, so a byte-aligned bit string hashes to exactly
//! `SHA-256(bytes)`. A string whose length is not a multiple of 8 is rejected
//! rather than silently padded, because "silently padded" is how two parties
//! end up committing to different transcripts.

use sha2::{Digest, Sha256};

use super::bits::{pack_bits, unpack_bytes};
use super::error::CryptoError;

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 over a byte-aligned bit string, returned as 256 bits
/// (most significant bit of the first digest byte first).
pub fn sha256_bits(bits: &[bool]) -> Result<Vec<bool>, CryptoError> {
    let bytes = pack_bits(bits)?;
    Ok(unpack_bytes(&sha256(&bytes)))
}
