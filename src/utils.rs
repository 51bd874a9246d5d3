//! Common utility functions shared across the codebase.

/// Checks if the text contains at least one "word" character (letter or digit).
///
/// Returns false for empty strings, pure whitespace, or pure symbols.
///
/// # Examples
///
/// ```
/// use transcheck::utils::contains_word_chars;
///
/// assert!(contains_word_chars("Hello"));
/// assert!(contains_word_chars("你好"));
/// assert!(contains_word_chars("123"));
/// assert!(!contains_word_chars("---"));
/// assert!(!contains_word_chars(":?%$#@_~"));
/// assert!(!contains_word_chars(""));
/// ```
pub fn contains_word_chars(text: &str) -> bool {
    text.chars().any(|c| c.is_alphanumeric())
}

/// Whitespace as understood by the leading/trailing checks: Unicode white
/// space plus every space separator (e.g. NBSP).
pub fn is_white_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{FEFF}')
}

/// Number of chars in a string.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Converts a byte offset into a char offset.
///
/// The byte offset must lie on a char boundary (regex match offsets do).
pub fn char_index(text: &str, byte_index: usize) -> usize {
    text.get(..byte_index).map_or(0, |prefix| prefix.chars().count())
}

/// Converts a char offset into a byte offset, clamping to the end of the text.
pub fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(i, _)| i)
}

/// Returns the chars in `[start, end)` as a new string.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// Escapes line breaks and tabs so they stay visible inside a message.
pub fn escape_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits a `;`-separated list, dropping empty entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Converts a document name into a file URI.
///
/// Names that already carry a URI scheme are returned unchanged. Path bytes
/// outside the RFC 3986 `pchar` set are percent-encoded, so `a b#1.json`
/// becomes `a%20b%231.json`.
pub fn to_file_uri(name: &str) -> String {
    if has_uri_scheme(name) {
        return name.to_string();
    }
    let path = percent_encode_path(&name.replace('\\', "/"));
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

/// Converts a file URI back into a path string.
pub fn uri_to_path(uri: &str) -> String {
    match uri.strip_prefix("file://") {
        Some(rest) => {
            // file:///C:/dir -> C:/dir
            let bytes = rest.as_bytes();
            if bytes.len() > 2 && bytes[0] == b'/' && bytes[2] == b':' {
                percent_decode(&rest[1..])
            } else {
                percent_decode(rest)
            }
        }
        None => uri.to_string(),
    }
}

fn percent_encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'-' | b'.' | b'_' | b'~' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+'
                    | b',' | b';' | b'=' | b':' | b'@' | b'/'
            );
        if keep {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Decodes `%XX` escapes. Malformed escapes are kept as written.
fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = text.get(i + 1..i + 3)
            && let Ok(byte) = u8::from_str_radix(hex, 16)
        {
            decoded.push(byte);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn has_uri_scheme(name: &str) -> bool {
    match name.find(':') {
        // A single letter before ':' is a Windows drive, not a scheme.
        Some(pos) if pos > 1 => name[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_contains_word_chars() {
        assert!(contains_word_chars("Hello"));
        assert!(contains_word_chars("你好"));
        assert!(contains_word_chars("123 abc"));
        assert!(contains_word_chars("  abc  "));

        assert!(!contains_word_chars(":?%$#@#_~`()[]{}=+-"));
        assert!(!contains_word_chars("   "));
        assert!(!contains_word_chars(""));
    }

    #[test]
    fn test_char_offsets() {
        let text = "été et";
        assert_eq!(char_index(text, 2), 1);
        assert_eq!(byte_index(text, 1), 2);
        assert_eq!(byte_index(text, 99), text.len());
        assert_eq!(char_slice(text, 0, 3), "été");
        assert_eq!(char_len(text), 6);
    }

    #[test]
    fn test_escape_controls() {
        assert_eq!(escape_controls("a\nb\r\n\tc"), "a\\nb\\r\\n\\tc");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("mrk;x-df-s;"), vec!["mrk", "x-df-s"]);
        assert!(split_list(";;").is_empty());
    }

    #[test]
    fn test_file_uri_round_trip() {
        assert_eq!(to_file_uri("/tmp/doc.json"), "file:///tmp/doc.json");
        assert_eq!(to_file_uri("C:\\docs\\a.tsv"), "file:///C:/docs/a.tsv");
        assert_eq!(to_file_uri("file:///x.json"), "file:///x.json");
        assert_eq!(uri_to_path("file:///tmp/doc.json"), "/tmp/doc.json");
        assert_eq!(uri_to_path("file:///C:/docs/a.tsv"), "C:/docs/a.tsv");
    }

    #[test]
    fn test_file_uri_escapes_reserved_characters() {
        let uri = to_file_uri("/work/my docs/a#1?.json");
        assert_eq!(uri, "file:///work/my%20docs/a%231%3F.json");
        assert_eq!(uri_to_path(&uri), "/work/my docs/a#1?.json");

        let uri = to_file_uri("C:\\Users\\Zoë\\50%.tsv");
        assert_eq!(uri, "file:///C:/Users/Zo%C3%AB/50%25.tsv");
        assert_eq!(uri_to_path(&uri), "C:/Users/Zoë/50%.tsv");

        assert_eq!(uri_to_path("file:///a%2.json"), "/a%2.json");
    }

    #[test]
    fn test_white_space() {
        assert!(is_white_space(' '));
        assert!(is_white_space('\u{00A0}'));
        assert!(is_white_space('\t'));
        assert!(!is_white_space('a'));
    }
}
