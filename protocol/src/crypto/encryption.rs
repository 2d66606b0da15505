//! # Poseidon Authenticated Encryption
//!
//! A duplex sponge over the width-4 Poseidon permutation (rate 3,
//! capacity 1). Key and nonce are absorbed into the initial state, the
//! message is added into the rate portion one block at a time, and a final
//! permutation squeezes the authentication tag.
//!
//! ```text
//! state = [0, k0, k1, nonce + len * 2^128]
//! for each 3-element block (zero padded):
//!     state = P(state)
//!     state[1..4] += block;  emit state[1..4]
//! state = P(state);  emit state[1]            (tag)
//! ```
//!
//! For a 32-element message this yields 33 + 1 = 34 ciphertext elements.
//!
//! ## Nonce bound
//!
//! The message length is packed above bit 128 of the last state element, so
//! nonces must stay below `2^128`. Encryption does not refuse a wide nonce;
//! it reports it through the `ok` flag, which the circuit pins to 1.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField, Zero};

use super::error::CryptoError;
use super::poseidon::PoseidonPermutation;
use crate::config::{CIPHER_RATE, NONCE_BITS};
use crate::types::SymmetricKey;

/// Output of [`PoseidonCipher::encrypt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encrypted {
    /// Sponge outputs followed by the tag.
    pub ciphertext: Vec<Fr>,
    /// Whether the inputs were inside the primitive's domain.
    pub ok: bool,
}

/// Ciphertext length for a message of `length` elements.
pub fn ciphertext_len(length: usize) -> usize {
    length.div_ceil(CIPHER_RATE) * CIPHER_RATE + 1
}

/// Whether `nonce` is a valid encryption nonce (`nonce < 2^128`).
pub fn nonce_in_range(nonce: Fr) -> bool {
    nonce.into_bigint().num_bits() <= NONCE_BITS
}

/// Poseidon duplex-sponge cipher.
#[derive(Clone, Debug)]
pub struct PoseidonCipher {
    permutation: PoseidonPermutation,
}

impl Default for PoseidonCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseidonCipher {
    pub fn new() -> Self {
        Self {
            permutation: PoseidonPermutation::width4(),
        }
    }

    fn initial_state(key: &SymmetricKey, nonce: Fr, length: usize) -> Vec<Fr> {
        let two_pow_128 = Fr::from(2u64).pow([u64::from(NONCE_BITS)]);
        let domain = nonce + Fr::from(length as u64) * two_pow_128;
        vec![Fr::zero(), key[0], key[1], domain]
    }

    /// Encrypt `message` under `key` and `nonce`.
    pub fn encrypt(&self, key: &SymmetricKey, nonce: Fr, message: &[Fr]) -> Encrypted {
        let mut state = Self::initial_state(key, nonce, message.len());
        let mut ciphertext = Vec::with_capacity(ciphertext_len(message.len()));

        for block in message.chunks(CIPHER_RATE) {
            self.permutation.permute(&mut state);
            for j in 0..CIPHER_RATE {
                state[j + 1] += block.get(j).copied().unwrap_or_else(Fr::zero);
                ciphertext.push(state[j + 1]);
            }
        }

        self.permutation.permute(&mut state);
        ciphertext.push(state[1]);

        Encrypted {
            ciphertext,
            ok: nonce_in_range(nonce),
        }
    }

    /// Decrypt a ciphertext of a `length`-element message.
    ///
    /// Fails on a wide nonce, a ciphertext of the wrong size, non-zero
    /// padding or a tag mismatch. The error does not say which.
    pub fn decrypt(
        &self,
        key: &SymmetricKey,
        nonce: Fr,
        ciphertext: &[Fr],
        length: usize,
    ) -> Result<Vec<Fr>, CryptoError> {
        if !nonce_in_range(nonce) || ciphertext.len() != ciphertext_len(length) {
            return Err(CryptoError::DecryptionFailed);
        }

        let mut state = Self::initial_state(key, nonce, length);
        let body = &ciphertext[..ciphertext.len() - 1];
        let mut message = Vec::with_capacity(body.len());

        for block in body.chunks(CIPHER_RATE) {
            self.permutation.permute(&mut state);
            for (j, c) in block.iter().enumerate() {
                message.push(*c - state[j + 1]);
                state[j + 1] = *c;
            }
        }

        if message[length..].iter().any(|pad| !pad.is_zero()) {
            return Err(CryptoError::DecryptionFailed);
        }
        message.truncate(length);

        self.permutation.permute(&mut state);
        if ciphertext[ciphertext.len() - 1] != state[1] {
            return Err(CryptoError::DecryptionFailed);
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CIPHERTEXT_LEN, MESSAGE_LEN};
    use ark_ff::UniformRand;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn fixture(rng: &mut StdRng) -> (SymmetricKey, Fr, Vec<Fr>) {
        let key = [Fr::rand(rng), Fr::rand(rng)];
        let nonce = Fr::from(u128::MAX - 7);
        let message = (0..MESSAGE_LEN).map(|_| Fr::rand(rng)).collect();
        (key, nonce, message)
    }

    #[test]
    fn encrypt_then_decrypt() {
        let mut rng = StdRng::seed_from_u64(42);
        let cipher = PoseidonCipher::new();
        let (key, nonce, message) = fixture(&mut rng);

        let sealed = cipher.encrypt(&key, nonce, &message);
        assert!(sealed.ok);
        assert_eq!(sealed.ciphertext.len(), CIPHERTEXT_LEN);

        let opened = cipher
            .decrypt(&key, nonce, &sealed.ciphertext, MESSAGE_LEN)
            .expect("valid ciphertext must decrypt");
        assert_eq!(opened, message);
    }

    #[test]
    fn forged_tag_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let cipher = PoseidonCipher::new();
        let (key, nonce, message) = fixture(&mut rng);

        let mut sealed = cipher.encrypt(&key, nonce, &message);
        sealed.ciphertext[5] += Fr::from(1u64);

        assert_eq!(
            cipher.decrypt(&key, nonce, &sealed.ciphertext, MESSAGE_LEN),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn wrong_key_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let cipher = PoseidonCipher::new();
        let (key, nonce, message) = fixture(&mut rng);
        let sealed = cipher.encrypt(&key, nonce, &message);

        let other = [key[1], key[0]];
        assert!(cipher
            .decrypt(&other, nonce, &sealed.ciphertext, MESSAGE_LEN)
            .is_err());
    }

    #[test]
    fn wide_nonce_reports_not_ok() {
        let mut rng = StdRng::seed_from_u64(42);
        let cipher = PoseidonCipher::new();
        let (key, _, message) = fixture(&mut rng);

        let wide = Fr::from(2u64).pow([128u64]);
        let sealed = cipher.encrypt(&key, wide, &message);
        assert!(!sealed.ok);
        assert!(cipher
            .decrypt(&key, wide, &sealed.ciphertext, MESSAGE_LEN)
            .is_err());
    }

    #[test]
    fn nonce_bound_is_exclusive() {
        assert!(nonce_in_range(Fr::from(u128::MAX)));
        assert!(!nonce_in_range(Fr::from(2u64).pow([128u64])));
    }

    #[test]
    fn short_messages_are_padded() {
        let cipher = PoseidonCipher::new();
        let key = [Fr::from(1u64), Fr::from(2u64)];
        let message = vec![Fr::from(9u64); 4];

        let sealed = cipher.encrypt(&key, Fr::from(3u64), &message);
        assert_eq!(sealed.ciphertext.len(), 7);
        assert_eq!(
            cipher
                .decrypt(&key, Fr::from(3u64), &sealed.ciphertext, 4)
                .unwrap(),
            message
        );
    }
}
