//! # Witness File Format
//!
//! circom-style `input.json`: every value is a decimal string, points are
//! `[[x0, x1, x2, x3], [y0, y1, y2, y3]]` with little-endian limbs.
//!
//! ```json
//! {
//!   "preimage0": ["…" x16], "preimage1": ["…" x16],
//!   "db": ["…" x4],
//!   "Qs": [[…], […]], "Qa": [[…], […]], "Qb": [[…], […]],
//!   "nonce": "…",
//!   "ew": ["…" x34],
//!   "Hpub": ["…", "…"]
//! }
//! ```
//!
//! Parsing is strict. A value that is not a canonical decimal below the
//! field modulus, a limb of 2^64 or more, or an array of the wrong length is
//! rejected with the name of the offending field.

use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{CIPHERTEXT_LEN, NUM_LIMBS, PREIMAGE_LEN};
use crate::types::{PointLimbs, PublicInputs, Uint256, Witness};

/// Errors raised while reading a witness file.
#[derive(Debug, Error)]
pub enum WitnessError {
    #[error("invalid witness JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}: expected {expected} values, got {got}")]
    WrongLength {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("{field}: {value:?} is not a field element")]
    InvalidFieldElement { field: String, value: String },

    #[error("{field}: {value:?} is not a 64-bit limb")]
    InvalidLimb { field: String, value: String },
}

/// On-disk shape of a witness, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessFile {
    pub preimage0: Vec<String>,
    pub preimage1: Vec<String>,
    pub db: Vec<String>,
    #[serde(rename = "Qs")]
    pub qs: Vec<Vec<String>>,
    #[serde(rename = "Qa")]
    pub qa: Vec<Vec<String>>,
    #[serde(rename = "Qb")]
    pub qb: Vec<Vec<String>>,
    pub nonce: String,
    pub ew: Vec<String>,
    #[serde(rename = "Hpub")]
    pub hpub: Vec<String>,
}

// ---------------------------------------------------------------------------
// Scalar parsing
// ---------------------------------------------------------------------------

fn parse_field(field: &str, value: &str) -> Result<Fr, WitnessError> {
    let invalid = || WitnessError::InvalidFieldElement {
        field: field.to_owned(),
        value: value.to_owned(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let parsed = BigUint::from_str(value).map_err(|_| invalid())?;
    let modulus: BigUint = Fr::MODULUS.into();
    if parsed >= modulus {
        return Err(invalid());
    }
    Ok(Fr::from(parsed))
}

fn parse_limb(field: &str, value: &str) -> Result<u64, WitnessError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WitnessError::InvalidLimb {
            field: field.to_owned(),
            value: value.to_owned(),
        });
    }
    value.parse::<u64>().map_err(|_| WitnessError::InvalidLimb {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}

fn expect_len<T>(field: &str, values: &[T], expected: usize) -> Result<(), WitnessError> {
    if values.len() != expected {
        return Err(WitnessError::WrongLength {
            field: field.to_owned(),
            expected,
            got: values.len(),
        });
    }
    Ok(())
}

fn parse_fields<const N: usize>(field: &str, values: &[String]) -> Result<[Fr; N], WitnessError> {
    expect_len(field, values, N)?;
    let mut out = [Fr::from(0u64); N];
    for (i, (slot, value)) in out.iter_mut().zip(values).enumerate() {
        *slot = parse_field(&format!("{field}[{i}]"), value)?;
    }
    Ok(out)
}

fn parse_uint(field: &str, values: &[String]) -> Result<Uint256, WitnessError> {
    expect_len(field, values, NUM_LIMBS)?;
    let mut limbs = [0u64; NUM_LIMBS];
    for (i, (slot, value)) in limbs.iter_mut().zip(values).enumerate() {
        *slot = parse_limb(&format!("{field}[{i}]"), value)?;
    }
    Ok(Uint256::from_limbs(limbs))
}

fn parse_point(field: &str, values: &[Vec<String>]) -> Result<PointLimbs, WitnessError> {
    expect_len(field, values, 2)?;
    Ok(PointLimbs::new(
        parse_uint(&format!("{field}[0]"), &values[0])?,
        parse_uint(&format!("{field}[1]"), &values[1])?,
    ))
}

/// Canonical decimal string of a field element.
pub fn field_to_decimal(value: &Fr) -> String {
    BigUint::from(value.into_bigint()).to_string()
}

fn uint_to_strings(value: &Uint256) -> Vec<String> {
    value.limbs().iter().map(u64::to_string).collect()
}

fn point_to_strings(point: &PointLimbs) -> Vec<Vec<String>> {
    vec![uint_to_strings(&point.x), uint_to_strings(&point.y)]
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl WitnessFile {
    pub fn from_json(json: &str) -> Result<Self, WitnessError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, WitnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into typed values.
    pub fn parse(&self) -> Result<(Witness, PublicInputs), WitnessError> {
        let witness = Witness {
            preimage0: parse_fields::<PREIMAGE_LEN>("preimage0", &self.preimage0)?,
            preimage1: parse_fields::<PREIMAGE_LEN>("preimage1", &self.preimage1)?,
            db: parse_uint("db", &self.db)?,
            qs: parse_point("Qs", &self.qs)?,
            qa: parse_point("Qa", &self.qa)?,
            qb: parse_point("Qb", &self.qb)?,
            nonce: parse_field("nonce", &self.nonce)?,
            ew: parse_fields::<CIPHERTEXT_LEN>("ew", &self.ew)?,
        };
        let public = PublicInputs::new(parse_fields::<2>("Hpub", &self.hpub)?);
        Ok((witness, public))
    }

    /// Serialize typed values back into the file shape.
    pub fn from_instance(witness: &Witness, public: &PublicInputs) -> Self {
        let decimals = |values: &[Fr]| values.iter().map(field_to_decimal).collect::<Vec<_>>();
        Self {
            preimage0: decimals(&witness.preimage0),
            preimage1: decimals(&witness.preimage1),
            db: uint_to_strings(&witness.db),
            qs: point_to_strings(&witness.qs),
            qa: point_to_strings(&witness.qa),
            qb: point_to_strings(&witness.qb),
            nonce: field_to_decimal(&witness.nonce),
            ew: decimals(&witness.ew),
            hpub: decimals(&public.hpub),
        }
    }
}

/// Read and validate a witness from JSON text.
pub fn parse_witness_json(json: &str) -> Result<(Witness, PublicInputs), WitnessError> {
    WitnessFile::from_json(json)?.parse()
}
