use thiserror::Error;

/// Errors returned by hashing, verification and the encoded-hash codec.
///
/// A malformed or incompatible stored hash is never reported as a failed
/// match: callers get a distinct variant so data corruption and version drift
/// can be told apart from a wrong password.
#[derive(Debug, Error)]
pub enum HashError {
    /// The OS random generator could not supply salt bytes.
    #[error("OS random generator unavailable")]
    EntropySource(#[source] getrandom::Error),

    /// The encoded hash does not follow the expected layout.
    #[error("the encoded hash is not in the correct format: {0}")]
    Malformed(&'static str),

    /// The encoded hash was produced by a different Argon2 version.
    #[error("incompatible version of argon2: found v={found}, expected v={expected}")]
    IncompatibleVersion { found: u64, expected: u32 },

    /// A parameter set, salt or key was rejected before use.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The Argon2 primitive refused the inputs.
    #[error("argon2 key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Result type alias using [`HashError`].
pub type Result<T> = std::result::Result<T, HashError>;
