// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # FairX Protocol — Core Library
//!
//! Zero-knowledge fair exchange of a hash collision. A seller who knows two
//! inputs that collide under a 16-input Poseidon hash encrypts them for a
//! buyer, and proves, without revealing them, that the ciphertext really
//! holds such a collision under a key the buyer can derive.
//!
//! ## Architecture
//!
//! - **config** — Shape constants: limb widths, lengths, transcript layout.
//! - **types** — Limb-encoded integers and points, witness and public inputs.
//! - **crypto** — Poseidon, SHA-256, secp256k1 and the duplex-sponge cipher.
//! - **zkp** — R1CS synthesis and checking of the fair-exchange circuit.
//! - **exchange** — Seller and buyer helpers around the circuit.
//!
//! ## Design Philosophy
//!
//! 1. Every relation is a labeled check; a failing witness names what failed.
//! 2. Primitives are black boxes behind one trait, swappable in tests.
//! 3. Invalid curve inputs fail the instance, never the process.

pub mod config;
pub mod crypto;
pub mod exchange;
pub mod types;
pub mod zkp;
