use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::trace;

/// Decoders tried in order when counting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

/// Latin-1 maps every byte, so with this order the later entries only
/// matter to callers of [`decode_with`] that leave Latin-1 out.
pub const ENCODING_FALLBACK_ORDER: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

// 0x80..=0x9F in Windows-1252; None marks the five undefined bytes.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

impl TextEncoding {
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            TextEncoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
            TextEncoding::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect::<Option<String>>()
                .map(Cow::Owned),
        }
    }
}

/// Decodes with the first encoding of `order` that accepts the bytes, falling
/// back to a lossy UTF-8 decode.
pub fn decode_with<'a>(
    bytes: &'a [u8],
    order: &[TextEncoding],
) -> (Cow<'a, str>, Option<TextEncoding>) {
    for encoding in order {
        if let Some(text) = encoding.decode(bytes) {
            return (text, Some(*encoding));
        }
    }
    (String::from_utf8_lossy(bytes), None)
}

pub fn decode_best_effort(bytes: &[u8]) -> (Cow<'_, str>, Option<TextEncoding>) {
    decode_with(bytes, &ENCODING_FALLBACK_ORDER)
}

/// Counts lines as a text-mode line iterator yields them: `\n`, `\r\n` and a
/// lone `\r` each end a line, and unterminated trailing text is one more line.
pub fn count_text_lines(text: &str) -> u64 {
    let mut lines = 0u64;
    let mut pending = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                lines += 1;
                pending = false;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines += 1;
                pending = false;
            }
            _ => pending = true,
        }
    }
    if pending {
        lines += 1;
    }
    lines
}

/// Line count of a file. Unreadable files count as zero lines.
pub fn count_lines(path: &Path) -> u64 {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            trace!("Could not read {} for line count: {}", path.display(), e);
            return 0;
        }
    };
    let (text, encoding) = decode_best_effort(&bytes);
    trace!("Counting lines of {} as {:?}", path.display(), encoding);
    count_text_lines(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_line_terminators() {
        assert_eq!(count_text_lines(""), 0);
        assert_eq!(count_text_lines("print(1)\n"), 1);
        assert_eq!(count_text_lines("a\nb"), 2);
        assert_eq!(count_text_lines("a\r\nb\r\n"), 2);
        assert_eq!(count_text_lines("a\rb\rc"), 3);
        assert_eq!(count_text_lines("\n\n\n"), 3);
    }

    #[test]
    fn test_utf8_is_tried_first() {
        let (text, encoding) = decode_best_effort("café\n".as_bytes());
        assert_eq!(encoding, Some(TextEncoding::Utf8));
        assert_eq!(text, "café\n");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        // 0xE9 alone is not valid UTF-8
        let (text, encoding) = decode_best_effort(b"caf\xe9\nx\n");
        assert_eq!(encoding, Some(TextEncoding::Latin1));
        assert_eq!(text, "café\nx\n");
    }

    #[test]
    fn test_windows_1252_rejects_undefined_bytes() {
        assert!(TextEncoding::Windows1252.decode(b"\x81").is_none());
        assert_eq!(
            TextEncoding::Windows1252.decode(b"\x80").as_deref(),
            Some("\u{20AC}")
        );
    }

    #[test]
    fn test_order_without_latin1_reaches_windows_1252() {
        let order = [TextEncoding::Utf8, TextEncoding::Windows1252];
        let (text, encoding) = decode_with(b"\x93quoted\x94\n", &order);
        assert_eq!(encoding, Some(TextEncoding::Windows1252));
        assert_eq!(text, "\u{201C}quoted\u{201D}\n");
    }

    #[test]
    fn test_lossy_when_no_encoding_accepts() {
        let order = [TextEncoding::Utf8, TextEncoding::Windows1252];
        let (text, encoding) = decode_with(b"a\x81\nb\n", &order);
        assert_eq!(encoding, None);
        assert_eq!(text, "a\u{FFFD}\nb\n");
        assert_eq!(count_text_lines(&text), 2);

        let (_, encoding) = decode_with(b"a\x81\n", &[]);
        assert_eq!(encoding, None);
    }

    #[test]
    fn test_count_lines_of_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("mixed.py");
        std::fs::write(&path, b"# caf\xe9\nprint(1)\nprint(2)").unwrap();
        assert_eq!(count_lines(&path), 3);
    }

    #[test]
    fn test_unreadable_file_counts_zero() {
        let tmp = tempdir().unwrap();
        assert_eq!(count_lines(&tmp.path().join("missing.py")), 0);
    }
}
