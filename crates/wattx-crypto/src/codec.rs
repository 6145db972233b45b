//! URL-safe binary ↔ text codec
//!
//! Standard base64 with `+`→`-` and `/`→`_`. Padding is stripped on encode so
//! the output can be dropped into a URL fragment as-is; decode restores it.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use wattx_core::{WattxError, WattxResult};

/// Encode bytes as unpadded base64url.
pub fn encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode unpadded (or padded) base64url text.
pub fn decode(text: &str) -> WattxResult<Vec<u8>> {
    let padded = restore_padding(text);
    URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| WattxError::Encoding(format!("base64url decode: {e}")))
}

/// Right-pad with `=` until the length is a multiple of 4.
fn restore_padding(text: &str) -> String {
    let missing = (4 - text.len() % 4) % 4;
    let mut padded = String::with_capacity(text.len() + missing);
    padded.push_str(text);
    padded.extend(std::iter::repeat('=').take(missing));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_url_safe_alphabet() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet
        let text = encode(&[0xfb, 0xff]);
        assert_eq!(text, "-_8");
        assert!(!text.contains('+'));
        assert!(!text.contains('/'));
        assert!(!text.contains('='));
    }

    #[test]
    fn test_padding_restored() {
        assert_eq!(decode("aGk").unwrap(), b"hi");
        assert_eq!(decode("aA").unwrap(), b"h");
        assert_eq!(decode("aGVsbG8").unwrap(), b"hello");
    }

    #[test]
    fn test_already_padded_input() {
        assert_eq!(decode("aA==").unwrap(), b"h");
    }

    #[test]
    fn test_invalid_characters() {
        assert!(matches!(decode("ab!d"), Err(WattxError::Encoding(_))));
        assert!(matches!(decode("ab+/"), Err(WattxError::Encoding(_))));
    }

    #[test]
    fn test_invalid_length() {
        // a single trailing symbol can never carry a whole byte
        assert!(matches!(decode("abcde"), Err(WattxError::Encoding(_))));
        assert!(matches!(decode("a"), Err(WattxError::Encoding(_))));
    }

    proptest! {
        #[test]
        fn roundtrip(data in proptest::collection::vec(any::<u8>(), 0..=512)) {
            let text = encode(&data);
            prop_assert!(!text.contains('='));
            prop_assert_eq!(decode(&text).unwrap(), data);
        }
    }
}
