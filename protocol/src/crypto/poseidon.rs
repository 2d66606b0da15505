//! # Poseidon Permutation and the 16-input Collision Hash
//!
//! Poseidon over the BN254 scalar field with the `x^5` S-box. Round
//! constants and MDS matrices come from the Grain LFSR generator shipped in
//! `ark-crypto-primitives`, so parameters are reproducible from
//! `(field size, width, rounds)` alone.
//!
//! Two instances are used by the circuit:
//!
//! ```text
//! width 17, RF = 8, RP = 68   H16: state = [0, x0..x15], output state[0]
//! width  4, RF = 8, RP = 56   duplex sponge of the encryption primitive
//! ```
//!
//! The permutation is written out by hand because the arkworks sponge only
//! exposes absorb and squeeze, and H16 needs the raw state (`state[0]`, which
//! a sponge never squeezes). The tests pin it to `PoseidonSponge` over the
//! same config, so the two cannot quietly drift apart.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ff::{Field, PrimeField, Zero};

use crate::config::{
    POSEIDON_ALPHA, POSEIDON_FULL_ROUNDS, POSEIDON_PARTIAL_ROUNDS_T17,
    POSEIDON_PARTIAL_ROUNDS_T4, PREIMAGE_LEN,
};
use crate::types::Preimage;

/// A fixed-arity, collision-resistant hash over one preimage.
///
/// The circuit only relies on this contract; tests swap in deliberately
/// weak instances to exhibit collisions.
pub trait CollisionHash {
    fn hash16(&self, input: &Preimage) -> Fr;
}

// ---------------------------------------------------------------------------
// Permutation
// ---------------------------------------------------------------------------

/// The Poseidon permutation for one state width.
#[derive(Clone, Debug)]
pub struct PoseidonPermutation {
    config: PoseidonConfig<Fr>,
}

impl PoseidonPermutation {
    /// Generate parameters for a state of `width` elements (capacity 1).
    pub fn new(width: usize, partial_rounds: usize) -> Self {
        let rate = width - 1;
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            Fr::MODULUS_BIT_SIZE as u64,
            rate,
            POSEIDON_FULL_ROUNDS as u64,
            partial_rounds as u64,
            0,
        );
        let config = PoseidonConfig::new(
            POSEIDON_FULL_ROUNDS,
            partial_rounds,
            POSEIDON_ALPHA,
            mds,
            ark,
            rate,
            1,
        );
        Self { config }
    }

    /// Width 4, the encryption sponge.
    pub fn width4() -> Self {
        Self::new(4, POSEIDON_PARTIAL_ROUNDS_T4)
    }

    /// Width 17, the collision hash.
    pub fn width17() -> Self {
        Self::new(PREIMAGE_LEN + 1, POSEIDON_PARTIAL_ROUNDS_T17)
    }

    pub fn width(&self) -> usize {
        self.config.rate + self.config.capacity
    }

    /// Permute `state` in place. The caller guarantees `state.len() == width()`.
    pub fn permute(&self, state: &mut [Fr]) {
        debug_assert_eq!(state.len(), self.width());

        let half_full = self.config.full_rounds / 2;
        let partial = self.config.partial_rounds;

        for round in 0..half_full {
            self.round(state, round, true);
        }
        for round in half_full..half_full + partial {
            self.round(state, round, false);
        }
        for round in half_full + partial..self.config.full_rounds + partial {
            self.round(state, round, true);
        }
    }

    fn round(&self, state: &mut [Fr], round: usize, full: bool) {
        for (elem, constant) in state.iter_mut().zip(&self.config.ark[round]) {
            *elem += constant;
        }

        if full {
            for elem in state.iter_mut() {
                *elem = elem.pow([self.config.alpha]);
            }
        } else {
            state[0] = state[0].pow([self.config.alpha]);
        }

        let mixed: Vec<Fr> = self
            .config
            .mds
            .iter()
            .map(|row| {
                row.iter()
                    .zip(state.iter())
                    .fold(Fr::zero(), |acc, (m, s)| acc + *m * s)
            })
            .collect();
        state.copy_from_slice(&mixed);
    }
}

// ---------------------------------------------------------------------------
// H16
// ---------------------------------------------------------------------------

/// Poseidon with 16 inputs: one width-17 permutation, first state element out.
#[derive(Clone, Debug)]
pub struct PoseidonHash16 {
    permutation: PoseidonPermutation,
}

impl PoseidonHash16 {
    pub fn new() -> Self {
        Self {
            permutation: PoseidonPermutation::width17(),
        }
    }
}

impl Default for PoseidonHash16 {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionHash for PoseidonHash16 {
    fn hash16(&self, input: &Preimage) -> Fr {
        let mut state = Vec::with_capacity(PREIMAGE_LEN + 1);
        state.push(Fr::zero());
        state.extend_from_slice(input);
        self.permutation.permute(&mut state);
        state[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
    use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
    use ark_ff::UniformRand;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    /// Permute `[0, inputs..]` and return the rate part of the state.
    fn permuted_rate(permutation: &PoseidonPermutation, inputs: &[Fr]) -> Vec<Fr> {
        let mut state = vec![Fr::zero()];
        state.extend_from_slice(inputs);
        permutation.permute(&mut state);
        state[1..].to_vec()
    }

    /// A fresh arkworks sponge over the same parameters: absorb a full rate,
    /// squeeze a full rate. That is exactly one permutation.
    fn sponge_rate(permutation: &PoseidonPermutation, inputs: &[Fr]) -> Vec<Fr> {
        let mut sponge = PoseidonSponge::new(&permutation.config);
        sponge.absorb(&inputs.to_vec());
        sponge.squeeze_native_field_elements(inputs.len())
    }

    fn random_preimage(rng: &mut StdRng) -> Preimage {
        std::array::from_fn(|_| Fr::rand(rng))
    }

    #[test]
    fn hash16_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let hasher = PoseidonHash16::new();
        let input = random_preimage(&mut rng);

        assert_eq!(hasher.hash16(&input), hasher.hash16(&input));
        assert_eq!(
            hasher.hash16(&input),
            PoseidonHash16::new().hash16(&input),
            "parameter generation must be reproducible"
        );
    }

    #[test]
    fn hash16_separates_single_element_changes() {
        let mut rng = StdRng::seed_from_u64(42);
        let hasher = PoseidonHash16::new();
        let input = random_preimage(&mut rng);

        for i in 0..PREIMAGE_LEN {
            let mut changed = input;
            changed[i] += Fr::from(1u64);
            assert_ne!(hasher.hash16(&input), hasher.hash16(&changed), "index {i}");
        }
    }

    #[test]
    fn hash16_is_order_sensitive() {
        let hasher = PoseidonHash16::new();
        let mut input = [Fr::zero(); PREIMAGE_LEN];
        input[0] = Fr::from(1u64);
        let mut swapped = input;
        swapped.swap(0, 1);

        assert_ne!(hasher.hash16(&input), hasher.hash16(&swapped));
    }

    #[test]
    fn width4_agrees_with_the_arkworks_sponge() {
        let permutation = PoseidonPermutation::width4();
        let inputs = [Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];

        assert_eq!(
            permuted_rate(&permutation, &inputs),
            sponge_rate(&permutation, &inputs)
        );
    }

    #[test]
    fn width17_agrees_with_the_arkworks_sponge() {
        let mut rng = StdRng::seed_from_u64(7);
        let permutation = PoseidonPermutation::width17();
        let inputs = random_preimage(&mut rng);

        assert_eq!(
            permuted_rate(&permutation, &inputs),
            sponge_rate(&permutation, &inputs)
        );
    }

    #[test]
    fn permutation_widths() {
        assert_eq!(PoseidonPermutation::width4().width(), 4);
        assert_eq!(PoseidonPermutation::width17().width(), 17);
    }

    #[test]
    fn permutation_moves_the_zero_state() {
        let permutation = PoseidonPermutation::width4();
        let mut state = vec![Fr::zero(); 4];
        permutation.permute(&mut state);
        assert!(state.iter().any(|x| !x.is_zero()));
    }
}
