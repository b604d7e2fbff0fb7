use subtle::{Choice, ConstantTimeEq};

/// Compares two keys in constant time.
///
/// Differing lengths compare unequal. Every byte position up to the longer
/// length is visited, so the running time does not depend on where the keys
/// first differ.
pub fn keys_match(a: &[u8], b: &[u8]) -> bool {
    let same_len = (a.len() as u64).ct_eq(&(b.len() as u64));

    let mut equal = Choice::from(1u8);
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        equal &= x.ct_eq(&y);
    }

    (same_len & equal).into()
}
