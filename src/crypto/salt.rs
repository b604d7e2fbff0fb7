use getrandom::fill;
use tracing::warn;

use crate::error::{HashError, Result};

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|e| {
        warn!(error = %e, "OS random generator failed");
        HashError::EntropySource(e)
    })
}

/// Generate a fresh salt of `len` bytes
pub fn generate_salt(len: u32) -> Result<Vec<u8>> {
    if len == 0 {
        return Err(HashError::InvalidParameter(
            "salt length must be >= 1".to_string(),
        ));
    }
    let mut salt = vec![0u8; len as usize];
    secure_random(&mut salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn salt_has_requested_length() {
        assert_eq!(generate_salt(16).unwrap().len(), 16);
        assert_eq!(generate_salt(1).unwrap().len(), 1);
    }

    #[test]
    fn zero_length_salt_is_rejected() {
        assert!(matches!(
            generate_salt(0),
            Err(HashError::InvalidParameter(_))
        ));
    }

    #[test]
    fn salts_do_not_repeat() {
        let salts: HashSet<Vec<u8>> = (0..10_000).map(|_| generate_salt(16).unwrap()).collect();
        assert_eq!(salts.len(), 10_000);
    }
}
