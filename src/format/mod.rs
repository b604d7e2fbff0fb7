//! Encoded hash format.
//!
//! Provides version-aware parsing and serialization of the self-describing
//! hash string:
//!
//! ```text
//! $argon2id$v=<version>$m=<memory>,t=<iterations>,p=<parallelism>$<salt>$<key>
//! ```
//!
//! Salt and key are unpadded standard base64. Their decoded lengths fill in
//! the salt and key lengths of the recovered [`HashParams`].

use std::fmt;
use std::str::FromStr;

use argon2::Version;
use zeroize::Zeroizing;

use crate::HashParams;
use crate::error::{HashError, Result};

mod fields;

/// Algorithm identifier written in the second field.
pub const ALGORITHM: &str = "argon2id";
/// Field delimiter.
pub const DELIMITER: char = '$';
/// The only Argon2 version this crate reads or writes (0x13).
pub const VERSION: u32 = Version::V0x13 as u32;
/// Number of fields after splitting on [`DELIMITER`], including the empty leading one.
const FIELD_COUNT: usize = 6;

/// A parsed hash: the parameters, salt and derived key it carries.
pub struct EncodedHash {
    params: HashParams,
    salt: Vec<u8>,
    key: Zeroizing<Vec<u8>>,
}

impl EncodedHash {
    /// Bundles a parameter set with its salt and derived key.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidParameter`] if the salt or key is empty or
    /// if its length differs from the one recorded in `params`.
    pub fn new(params: HashParams, salt: Vec<u8>, key: Zeroizing<Vec<u8>>) -> Result<Self> {
        if salt.is_empty() {
            return Err(HashError::InvalidParameter("salt cannot be empty".into()));
        }
        if key.is_empty() {
            return Err(HashError::InvalidParameter("key cannot be empty".into()));
        }
        if salt.len() != params.salt_len() as usize {
            return Err(HashError::InvalidParameter(format!(
                "salt is {} bytes, parameters expect {}",
                salt.len(),
                params.salt_len()
            )));
        }
        if key.len() != params.key_len() as usize {
            return Err(HashError::InvalidParameter(format!(
                "key is {} bytes, parameters expect {}",
                key.len(),
                params.key_len()
            )));
        }
        Ok(Self { params, salt, key })
    }

    /// Parses an encoded hash string.
    ///
    /// Checks run in order: field count and algorithm, version, cost
    /// parameters, salt, key. Semantically unusual but well-formed values
    /// (a very large memory cost, say) are accepted.
    ///
    /// # Errors
    ///
    /// - [`HashError::Malformed`] for any structural or encoding problem
    /// - [`HashError::IncompatibleVersion`] if the version is not [`VERSION`]
    pub fn decode(encoded: &str) -> Result<Self> {
        let parts: Vec<&str> = encoded.split(DELIMITER).collect();
        if parts.len() != FIELD_COUNT {
            return Err(HashError::Malformed("wrong number of fields"));
        }
        if !parts[0].is_empty() || parts[1] != ALGORITHM {
            return Err(HashError::Malformed("unsupported algorithm identifier"));
        }

        match fields::parse_version(parts[2])? {
            v if v == u64::from(VERSION) => decode_v19(&parts[3..]),
            found => Err(HashError::IncompatibleVersion {
                found,
                expected: VERSION,
            }),
        }
    }

    /// Renders the canonical string form.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

/// Decodes the cost, salt and key fields of a v=19 hash.
fn decode_v19(parts: &[&str]) -> Result<EncodedHash> {
    let (memory, iterations, parallelism) = fields::parse_costs(parts[0])?;
    let salt = fields::decode_bytes(parts[1], "invalid salt encoding")?;
    let key = Zeroizing::new(fields::decode_bytes(parts[2], "invalid key encoding")?);

    let salt_len =
        u32::try_from(salt.len()).map_err(|_| HashError::Malformed("salt too long"))?;
    let key_len = u32::try_from(key.len()).map_err(|_| HashError::Malformed("key too long"))?;

    let params = HashParams::from_encoded(memory, iterations, parallelism, salt_len, key_len)
        .map_err(|_| HashError::Malformed("parameters must be positive"))?;

    Ok(EncodedHash { params, salt, key })
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{d}{ALGORITHM}{d}v={VERSION}{d}m={},t={},p={}{d}{}{d}{}",
            self.params.mem_cost_kib(),
            self.params.time_cost(),
            self.params.parallelism(),
            fields::encode_bytes(&self.salt),
            fields::encode_bytes(&self.key),
            d = DELIMITER,
        )
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("params", &self.params)
            .field("salt_len", &self.salt.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl FromStr for EncodedHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

/// Encodes a parameter set, salt and derived key into the canonical string.
///
/// # Errors
///
/// Returns [`HashError::InvalidParameter`] under the same conditions as
/// [`EncodedHash::new`].
pub fn encode(params: HashParams, salt: &[u8], key: &[u8]) -> Result<String> {
    let hash = EncodedHash::new(params, salt.to_vec(), Zeroizing::new(key.to_vec()))?;
    Ok(hash.encode())
}

/// Parses an encoded hash string. See [`EncodedHash::decode`].
pub fn decode(encoded: &str) -> Result<EncodedHash> {
    EncodedHash::decode(encoded)
}
