use argon2::{Algorithm, Argon2, Params, Version};
use serde::Serialize;
use zeroize::Zeroizing;

use super::{MAX_PARALLELISM, MIN_KEY_LEN, MIN_SALT_LEN};
use crate::error::{HashError, Result};

/// Argon2id cost parameters together with the salt and key lengths.
///
/// A `HashParams` built through [`HashParams::new`] satisfies Argon2's own
/// limits. Parameters recovered from an encoded hash only carry the weaker
/// guarantee that every field is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HashParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
    salt_len: u32,
    key_len: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            // 19 MiB baseline
            mem_cost_kib: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
            salt_len: 16,
            key_len: 32,
        }
    }
}

impl HashParams {
    pub fn new(
        mem_cost_kib: u32,
        time_cost: u32,
        parallelism: u32,
        salt_len: u32,
        key_len: u32,
    ) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
            salt_len,
            key_len,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameters read back from an encoded hash.
    ///
    /// Only positivity is checked here; policy belongs to the caller and
    /// Argon2 itself rejects unusable values at derivation time.
    pub(crate) fn from_encoded(
        mem_cost_kib: u32,
        time_cost: u32,
        parallelism: u32,
        salt_len: u32,
        key_len: u32,
    ) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
            salt_len,
            key_len,
        };
        params.check_positive()?;
        Ok(params)
    }

    /// These parameters with one lane per available core.
    pub fn with_host_parallelism(self) -> Result<Self> {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let parallelism = u32::try_from(cores).unwrap_or(MAX_PARALLELISM);
        // keep m >= 8 * p when scaling lanes up
        let mem_cost_kib = self.mem_cost_kib.max(parallelism.saturating_mul(8));
        Self::new(
            mem_cost_kib,
            self.time_cost,
            parallelism,
            self.salt_len,
            self.key_len,
        )
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn salt_len(&self) -> u32 {
        self.salt_len
    }

    pub fn key_len(&self) -> u32 {
        self.key_len
    }

    pub fn validate(&self) -> Result<()> {
        self.check_positive()?;
        if self.parallelism > MAX_PARALLELISM {
            return Err(invalid(format!(
                "argon2 parallelism must be <= {MAX_PARALLELISM}"
            )));
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return Err(invalid("argon2 memory cost must be at least 8 * parallelism"));
        }
        if (self.salt_len as usize) < MIN_SALT_LEN {
            return Err(invalid(format!(
                "salt length must be at least {MIN_SALT_LEN} bytes"
            )));
        }
        if (self.key_len as usize) < MIN_KEY_LEN {
            return Err(invalid(format!(
                "key length must be at least {MIN_KEY_LEN} bytes"
            )));
        }
        Ok(())
    }

    fn check_positive(&self) -> Result<()> {
        if self.mem_cost_kib < 1 {
            return Err(invalid("argon2 memory cost must be >= 1"));
        }
        if self.time_cost < 1 {
            return Err(invalid("argon2 time cost must be >= 1"));
        }
        if self.parallelism < 1 {
            return Err(invalid("argon2 parallelism must be >= 1"));
        }
        if self.salt_len < 1 {
            return Err(invalid("salt length must be >= 1"));
        }
        if self.key_len < 1 {
            return Err(invalid("key length must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> HashError {
    HashError::InvalidParameter(msg.into())
}

/// Derives `params.key_len()` bytes from `password` and `salt` with Argon2id v0x13.
pub fn derive_key(password: &[u8], salt: &[u8], params: &HashParams) -> Result<Zeroizing<Vec<u8>>> {
    let argon_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(params.key_len as usize),
    )
    .map_err(|e| HashError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = Zeroizing::new(vec![0u8; params.key_len as usize]);
    argon2
        .hash_password_into(password, salt, key.as_mut_slice())
        .map_err(|e| HashError::KeyDerivation(e.to_string()))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> HashParams {
        HashParams::new(64, 1, 1, 16, 32).unwrap()
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key(b"password", &salt, &cheap()).unwrap();
        let k2 = derive_key(b"password", &salt, &cheap()).unwrap();

        assert_eq!(*k1, *k2);
        assert_eq!(k1.len(), 32);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let p1 = HashParams::new(64, 1, 1, 16, 32).unwrap();
        let p2 = HashParams::new(128, 1, 1, 16, 32).unwrap();
        let p3 = HashParams::new(64, 2, 1, 16, 32).unwrap();

        let k1 = derive_key(b"pw", &salt, &p1).unwrap();
        let k2 = derive_key(b"pw", &salt, &p2).unwrap();
        let k3 = derive_key(b"pw", &salt, &p3).unwrap();

        assert_ne!(*k1, *k2);
        assert_ne!(*k1, *k3);
    }

    #[test]
    fn key_len_controls_output_size() {
        let params = HashParams::new(64, 1, 1, 16, 64).unwrap();
        let key = derive_key(b"pw", &[1u8; 16], &params).unwrap();
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn invalid_params_fail_gracefully() {
        assert!(matches!(
            HashParams::new(0, 0, 0, 0, 0),
            Err(HashError::InvalidParameter(_))
        ));
        // m < 8 * p
        assert!(HashParams::new(8, 1, 2, 16, 32).is_err());
        assert!(HashParams::new(64, 1, 1, 4, 32).is_err());
        assert!(HashParams::new(64, 1, 1, 16, 2).is_err());
        assert!(HashParams::new(u32::MAX, 1, MAX_PARALLELISM + 1, 16, 32).is_err());
    }

    #[test]
    fn default_meets_baseline() {
        let params = HashParams::default();
        params.validate().unwrap();
        assert!(params.mem_cost_kib() >= 19 * 1024);
        assert!(params.time_cost() >= 2);
    }

    #[test]
    fn host_parallelism_stays_valid() {
        let params = HashParams::default().with_host_parallelism().unwrap();
        assert!(params.parallelism() >= 1);
        assert!(params.mem_cost_kib() >= 8 * params.parallelism());
    }

    #[test]
    fn short_salt_is_a_derivation_error() {
        let params = HashParams::from_encoded(64, 1, 1, 4, 32).unwrap();
        assert!(matches!(
            derive_key(b"pw", b"salt", &params),
            Err(HashError::KeyDerivation(_))
        ));
    }
}
