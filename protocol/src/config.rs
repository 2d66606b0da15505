//! # Protocol Configuration & Constants
//!
//! Every width, length and round count the circuit depends on lives here.
//! If you find yourself typing `34` or `9984` anywhere else in the crate,
//! stop and import it from this file instead.
//!
//! None of these are tuning knobs. They are part of the provable statement:
//! a verifier built with different numbers accepts a different language, and
//! a buyer holding a commitment from the old layout will get a very confusing
//! "unsatisfied" from the new one. Change one, bump [`PROTOCOL_VERSION`].
//!
//! ## Why 64-bit limbs
//!
//! secp256k1 values are 256 bits wide and BN254 holds a little under 254, so
//! a scalar or coordinate never fits in one field element. Four 64-bit limbs
//! do, with room to spare, and they line up with how arkworks stores its
//! `BigInt<4>`. The conversion is a copy, not an arithmetic exercise.

/// Version tag of the statement. Bumped whenever any constant below changes.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Limb layout
// ---------------------------------------------------------------------------

/// Bits per limb of a 256-bit integer.
pub const LIMB_BITS: usize = 64;

/// Limbs per 256-bit integer (scalars and curve coordinates).
pub const NUM_LIMBS: usize = 4;

/// Width of one canonical integer encoding.
pub const WORD_BITS: usize = LIMB_BITS * NUM_LIMBS;

/// A curve point serializes as `x` then `y`.
pub const POINT_BITS: usize = 2 * WORD_BITS;

// ---------------------------------------------------------------------------
// Puzzle and ciphertext shapes
// ---------------------------------------------------------------------------

/// Elements per collision preimage (arity of the collision hash).
pub const PREIMAGE_LEN: usize = 16;

/// Plaintext length: both preimages, concatenated.
pub const MESSAGE_LEN: usize = 2 * PREIMAGE_LEN;

/// Rate of the encryption sponge. The message is padded to a multiple of it.
pub const CIPHER_RATE: usize = 3;

/// Ciphertext length: padded message plus one authentication tag.
pub const CIPHERTEXT_LEN: usize = MESSAGE_LEN.div_ceil(CIPHER_RATE) * CIPHER_RATE + 1;

/// Symmetric key words derived from the shared point.
pub const KEY_WORDS: usize = 2;

/// Nonces must be strictly below `2^NONCE_BITS`; the length is packed above them.
pub const NONCE_BITS: u32 = 128;

// ---------------------------------------------------------------------------
// Transcript binding
// ---------------------------------------------------------------------------

/// Bits each ciphertext element and the nonce occupy in the transcript.
pub const ELEMENT_BITS: usize = WORD_BITS;

/// Offset of the buyer key `Qa` in the transcript.
pub const TRANSCRIPT_QA_OFFSET: usize = 0;

/// Offset of the seller key `Qb` in the transcript.
pub const TRANSCRIPT_QB_OFFSET: usize = TRANSCRIPT_QA_OFFSET + POINT_BITS;

/// Offset of the (bit-reversed) nonce in the transcript.
pub const TRANSCRIPT_NONCE_OFFSET: usize = TRANSCRIPT_QB_OFFSET + POINT_BITS;

/// Offset of the ciphertext in the transcript.
pub const TRANSCRIPT_EW_OFFSET: usize = TRANSCRIPT_NONCE_OFFSET + ELEMENT_BITS;

/// Full transcript width: 1024 + 256 + 34 * 256 = 9984 bits.
pub const TRANSCRIPT_BITS: usize = TRANSCRIPT_EW_OFFSET + CIPHERTEXT_LEN * ELEMENT_BITS;

/// Width of the transcript digest.
pub const DIGEST_BITS: usize = 256;

/// The digest is published as two field elements of this many bits each.
pub const COMMITMENT_HALF_BITS: usize = DIGEST_BITS / 2;

// ---------------------------------------------------------------------------
// Poseidon parameters (BN254 scalar field, x^5 S-box)
// ---------------------------------------------------------------------------

/// S-box exponent.
pub const POSEIDON_ALPHA: u64 = 5;

/// Full rounds, split evenly before and after the partial rounds.
pub const POSEIDON_FULL_ROUNDS: usize = 8;

/// Partial rounds for the 16-input collision hash (state width 17).
pub const POSEIDON_PARTIAL_ROUNDS_T17: usize = 68;

/// Partial rounds for the encryption sponge (state width 4).
pub const POSEIDON_PARTIAL_ROUNDS_T4: usize = 56;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_layout_matches_protocol() {
        assert_eq!(TRANSCRIPT_QB_OFFSET, 512);
        assert_eq!(TRANSCRIPT_NONCE_OFFSET, 1024);
        assert_eq!(TRANSCRIPT_EW_OFFSET, 1280);
        assert_eq!(TRANSCRIPT_BITS, 9984);
        assert_eq!(TRANSCRIPT_BITS % 8, 0, "transcript must be byte aligned");
    }

    #[test]
    fn ciphertext_holds_padded_message_and_tag() {
        assert_eq!(CIPHERTEXT_LEN, 34);
    }
}
