//! # Bit Codec
//!
//! Fixed-width, big-endian bit decompositions. Bit 0 is the most significant.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};

use super::error::CryptoError;
use crate::config::POINT_BITS;
use crate::types::{PointLimbs, Uint256};

/// Decompose `value` into exactly `width` bits, most significant first.
///
/// Fails if the canonical integer representation of `value` needs more than
/// `width` bits. Widths beyond the field size are zero-padded on the left.
pub fn to_bits(value: Fr, width: usize) -> Result<Vec<bool>, CryptoError> {
    let full = value.into_bigint().to_bits_be();

    if width >= full.len() {
        let mut out = vec![false; width - full.len()];
        out.extend(full);
        return Ok(out);
    }

    let cut = full.len() - width;
    if full[..cut].iter().any(|bit| *bit) {
        return Err(CryptoError::ValueTooWide { width });
    }
    Ok(full[cut..].to_vec())
}

/// Recompose a big-endian bit sequence into a field element.
///
/// Inverse of [`to_bits`] for every width below the modulus size; wider
/// inputs are reduced modulo the field order.
pub fn from_bits(bits: &[bool]) -> Fr {
    bits.iter().fold(Fr::zero(), |acc, bit| {
        let doubled = acc.double();
        if *bit {
            doubled + Fr::one()
        } else {
            doubled
        }
    })
}

/// 256-bit big-endian decomposition of a limb integer.
pub fn uint_to_bits(value: &Uint256) -> Vec<bool> {
    value.to_bits_be()
}

/// 512-bit encoding of a point: `x` then `y`, each 256 bits big-endian.
pub fn point_to_bits(point: &PointLimbs) -> Vec<bool> {
    let mut bits = Vec::with_capacity(POINT_BITS);
    for coordinate in point.coordinates() {
        bits.extend(uint_to_bits(coordinate));
    }
    bits
}

/// Pack bits into bytes, most significant bit first within each byte.
pub fn pack_bits(bits: &[bool]) -> Result<Vec<u8>, CryptoError> {
    if bits.len() % 8 != 0 {
        return Err(CryptoError::UnalignedBitLength(bits.len()));
    }
    Ok(bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, bit| (byte << 1) | u8::from(*bit)))
        .collect())
}

/// Unpack bytes into bits, most significant bit first within each byte.
pub fn unpack_bytes(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}
