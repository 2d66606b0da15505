//! # secp256k1 Scalar Multiplication over Limb Encodings
//!
//! Yes, it is the Bitcoin curve, and no, we don't get to pick a friendlier
//! one: the seller's key already lives on secp256k1 and the buyer's wallet
//! speaks nothing else. So the circuit carries 256-bit values around as four
//! 64-bit limbs and this module does the group law with `ark-secp256k1`.
//!
//! ## Fail closed, always
//!
//! Every conversion refuses anything it cannot represent exactly:
//!
//! - scalars must lie in `[1, n)`. Zero is not a key.
//! - coordinates must be below `p`. No second encodings of the same point.
//! - points must be on the curve. Twist attacks are a real thing.
//! - results must be affine. The point at infinity has no limbs.
//!
//! The circuit turns each of these errors into an unsatisfied `defined`
//! check, so a bad witness never gets the benefit of the doubt.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_secp256k1::{Affine, Fq, Fr as Scalar};

use super::error::CryptoError;
use crate::types::{PointLimbs, Uint256};

/// Parse limbs as a non-zero secp256k1 scalar.
pub fn scalar_from_limbs(value: &Uint256) -> Result<Scalar, CryptoError> {
    Scalar::from_bigint(value.to_bigint())
        .filter(|scalar| !scalar.is_zero())
        .ok_or(CryptoError::InvalidScalar)
}

fn coordinate_from_limbs(value: &Uint256) -> Result<Fq, CryptoError> {
    Fq::from_bigint(value.to_bigint()).ok_or(CryptoError::NonCanonicalCoordinate)
}

/// Parse limb coordinates as an affine point on the curve.
pub fn point_from_limbs(point: &PointLimbs) -> Result<Affine, CryptoError> {
    let x = coordinate_from_limbs(&point.x)?;
    let y = coordinate_from_limbs(&point.y)?;

    let affine = Affine::new_unchecked(x, y);
    // secp256k1 has cofactor 1, so being on the curve is enough.
    if !affine.is_on_curve() {
        return Err(CryptoError::PointNotOnCurve);
    }
    Ok(affine)
}

/// Encode an affine point as limbs.
pub fn point_to_limbs(point: &Affine) -> Result<PointLimbs, CryptoError> {
    let (x, y) = point.xy().ok_or(CryptoError::PointAtInfinity)?;
    Ok(PointLimbs::new(
        Uint256::from(x.into_bigint()),
        Uint256::from(y.into_bigint()),
    ))
}

/// `scalar * point`.
pub fn scalar_mul(scalar: &Uint256, point: &PointLimbs) -> Result<PointLimbs, CryptoError> {
    let k = scalar_from_limbs(scalar)?;
    let base = point_from_limbs(point)?;
    point_to_limbs(&(base * k).into_affine())
}

/// `scalar * G`.
pub fn scalar_mul_base(scalar: &Uint256) -> Result<PointLimbs, CryptoError> {
    let k = scalar_from_limbs(scalar)?;
    point_to_limbs(&(Affine::generator() * k).into_affine())
}
