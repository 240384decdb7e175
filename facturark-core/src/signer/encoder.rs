//! Base64 helpers.
use base64ct::{Base64, Encoding};

pub fn encode(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

/// Decodes standard base64, ignoring any line breaks or spaces inside the value.
pub fn decode(value: &str) -> Result<Vec<u8>, base64ct::Error> {
    let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Base64::decode_vec(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ignores_wrapped_lines() {
        let wrapped = "Zm9v\nYmFy IGJh\r\neg==";
        assert_eq!(decode(wrapped).expect("decode"), b"foobar baz");
    }

    #[test]
    fn decode_rejects_invalid_alphabet() {
        assert!(decode("not*base64").is_err());
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let bytes = [0u8, 1, 2, 250, 251, 252];
        assert_eq!(decode(&encode(&bytes)).expect("decode"), bytes);
    }
}
