//! Cryptographic primitives for password hashing.
//!
//! Provides salt generation, Argon2id key derivation, and constant-time key
//! comparison.

pub mod compare;
pub mod kdf;
pub mod salt;

pub use compare::keys_match;
pub use kdf::{HashParams, derive_key};
pub use salt::generate_salt;

/// Minimum salt length accepted by Argon2 (8 bytes).
pub const MIN_SALT_LEN: usize = 8;
/// Minimum derived key length accepted by Argon2 (4 bytes).
pub const MIN_KEY_LEN: usize = 4;
/// Maximum number of Argon2 lanes (2^24 - 1).
pub const MAX_PARALLELISM: u32 = 0x00FF_FFFF;
