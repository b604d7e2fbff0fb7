//! Argon2id password hashing with a self-describing encoded format.
//!
//! A [`Hasher`] owns one immutable [`HashParams`] used for every new hash.
//! Verification always uses the parameters embedded in the stored hash, so
//! hashes created under older defaults stay verifiable after the defaults
//! change.
//!
//! ```no_run
//! use passhash::{HashParams, Hasher};
//!
//! let hasher = Hasher::new(HashParams::default())?;
//! let stored = hasher.hash("correct horse battery staple")?;
//! assert!(hasher.verify("correct horse battery staple", &stored)?);
//! # Ok::<(), passhash::HashError>(())
//! ```

mod crypto;
mod error;
pub mod format;

pub use crate::crypto::{HashParams, generate_salt};
pub use crate::error::{HashError, Result};
pub use crate::format::EncodedHash;
use tracing::debug;

/// The two operations an authentication layer needs from a password hasher.
pub trait PasswordHashing: Send + Sync {
    /// Hashes `password` into a fresh encoded hash string.
    fn hash(&self, password: &str) -> Result<String>;

    /// Checks `password` against a stored encoded hash.
    ///
    /// `Ok(false)` means the password is wrong. A stored hash that cannot be
    /// read is an `Err`, never `Ok(false)`.
    fn verify(&self, password: &str, encoded: &str) -> Result<bool>;
}

/// Argon2id hashing service configured with default parameters.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    params: HashParams,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            params: HashParams::default(),
        }
    }
}

impl Hasher {
    /// Builds a hasher, rejecting parameters Argon2 could not hash with.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidParameter`] if `params` fails
    /// [`HashParams::validate`].
    pub fn new(params: HashParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters used for new hashes.
    pub fn params(&self) -> &HashParams {
        &self.params
    }

    /// Hashes `password` with this hasher's parameters.
    pub fn hash(&self, password: &str) -> Result<String> {
        hash_password(password, &self.params)
    }

    /// Hashes `password` with explicit per-call parameters.
    pub fn hash_with(&self, password: &str, params: &HashParams) -> Result<String> {
        hash_password(password, params)
    }

    /// Verifies `password` against `encoded` using the parameters it embeds.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        verify_password(password, encoded)
    }

    /// Whether `encoded` was produced with parameters other than this
    /// hasher's, and should be replaced on the next successful login.
    pub fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        let stored = EncodedHash::decode(encoded)?;
        Ok(self.is_outdated(&stored))
    }

    /// [`Hasher::needs_rehash`] for a hash that is already decoded.
    pub fn is_outdated(&self, stored: &EncodedHash) -> bool {
        *stored.params() != self.params
    }
}

impl PasswordHashing for Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        Hasher::hash(self, password)
    }

    fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        Hasher::verify(self, password, encoded)
    }
}

/// Generates a salt, derives an Argon2id key and encodes the result.
///
/// # Errors
///
/// - [`HashError::InvalidParameter`] if `params` fails validation
/// - [`HashError::EntropySource`] if no salt could be generated
/// - [`HashError::KeyDerivation`] if Argon2 rejects the inputs
pub fn hash_password(password: &str, params: &HashParams) -> Result<String> {
    params.validate()?;
    debug!(
        m_cost = params.mem_cost_kib(),
        t_cost = params.time_cost(),
        p_cost = params.parallelism(),
        "hashing password"
    );

    let salt = crypto::generate_salt(params.salt_len())?;
    let key = crypto::derive_key(password.as_bytes(), &salt, params)?;

    Ok(EncodedHash::new(*params, salt, key)?.encode())
}

/// Verifies `password` against a stored encoded hash.
///
/// The key is re-derived with the parameters and salt recovered from
/// `encoded` and compared in constant time.
///
/// # Errors
///
/// - [`HashError::Malformed`] or [`HashError::IncompatibleVersion`] if
///   `encoded` cannot be read
/// - [`HashError::KeyDerivation`] if Argon2 rejects the embedded parameters
pub fn verify_password(password: &str, encoded: &str) -> Result<bool> {
    let stored = EncodedHash::decode(encoded)?;
    let candidate = crypto::derive_key(password.as_bytes(), stored.salt(), stored.params())?;

    let matched = crypto::keys_match(&candidate, stored.key());
    debug!(
        m_cost = stored.params().mem_cost_kib(),
        t_cost = stored.params().time_cost(),
        p_cost = stored.params().parallelism(),
        matched,
        "verified password"
    );
    Ok(matched)
}
