//! URL path decoding module
//!
//! Percent-decoding for request paths. Decoding is lenient: malformed
//! escapes are passed through literally instead of failing the request.

/// Decode `%XX` escapes in a URL path.
///
/// Invalid or truncated escapes are kept as-is, and byte sequences that do
/// not form valid UTF-8 are decoded lossily.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(high * 16 + low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Value of a single hex digit, if it is one
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_untouched() {
        assert_eq!(percent_decode("/math/ch1/lec1.html"), "/math/ch1/lec1.html");
        assert_eq!(percent_decode(""), "");
    }

    #[test]
    fn test_space_and_ascii_escapes() {
        assert_eq!(percent_decode("/a%20b"), "/a b");
        assert_eq!(percent_decode("%2Fdeep"), "/deep");
    }

    #[test]
    fn test_multibyte_utf8() {
        // 数学 percent-encoded
        assert_eq!(percent_decode("/%E6%95%B0%E5%AD%A6"), "/数学");
    }

    #[test]
    fn test_invalid_escape_passthrough() {
        assert_eq!(percent_decode("/a%ZZb"), "/a%ZZb");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/50%2"), "/50%2");
    }

    #[test]
    fn test_case_insensitive_hex() {
        assert_eq!(percent_decode("%2f%2F"), "//");
    }
}
