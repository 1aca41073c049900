//! Template file obfuscation.
//!
//! Shipped template files are lightly scrambled: byte `i` is exclusive-ored
//! with a running key that starts at 0 and grows by 43 (mod 256) per byte.
//! Applying the routine twice restores the input.

/// Per-byte key increment.
pub const KEY_STEP: u8 = 43;

/// Obfuscates or deobfuscates `data`.
#[must_use]
pub fn obfuscate(data: &[u8]) -> Vec<u8> {
    let mut key = 0u8;
    data.iter()
        .map(|&byte| {
            let out = byte ^ key;
            key = key.wrapping_add(KEY_STEP);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_key_sequence() {
        let out = obfuscate(&[0u8; 8]);
        assert_eq!(out, vec![0, 43, 86, 129, 172, 215, 2, 45]);
    }

    #[test]
    fn test_first_byte_unchanged() {
        assert_eq!(obfuscate(b"{")[0], b'{');
        assert!(obfuscate(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_obfuscation_is_involution(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(obfuscate(&obfuscate(&data)), data);
        }
    }
}
