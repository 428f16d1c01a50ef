//! MIME type detection from a byte prefix

/// Number of leading bytes considered when sniffing
pub const SNIFF_LEN: usize = 512;

/// Fallback for content that cannot be classified
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Fallback for printable UTF-8 content
pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Classify content from its first bytes
///
/// Only the first [`SNIFF_LEN`] bytes are inspected. Magic numbers are
/// matched first; otherwise printable UTF-8 is reported as plain text and
/// anything else as `application/octet-stream`. Never fails.
pub fn sniff_mime(head: &[u8]) -> &'static str {
    let head = &head[..head.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }

    if looks_like_text(head) {
        PLAIN_TEXT
    } else {
        OCTET_STREAM
    }
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.is_empty() {
        return false;
    }

    // The prefix may cut a multi-byte character in half
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(err) if err.error_len().is_none() => {
            match std::str::from_utf8(&head[..err.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0c' | '\x1b'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        assert_eq!(sniff_mime(&png), "image/png");
    }

    #[test]
    fn test_pdf_magic() {
        assert_eq!(sniff_mime(b"%PDF-1.7\n..."), "application/pdf");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sniff_mime(b"0123456789"), PLAIN_TEXT);
        assert_eq!(sniff_mime("héllo wörld\n".as_bytes()), PLAIN_TEXT);
    }

    #[test]
    fn test_truncated_utf8_is_still_text() {
        let mut text = "a".repeat(SNIFF_LEN - 1).into_bytes();
        text.extend_from_slice("é".as_bytes());
        assert_eq!(text.len(), SNIFF_LEN + 1);

        // The cut lands in the middle of 'é'
        assert_eq!(sniff_mime(&text), PLAIN_TEXT);
    }

    #[test]
    fn test_binary_and_empty() {
        assert_eq!(sniff_mime(&[0x00, 0x01, 0x02, 0xff]), OCTET_STREAM);
        assert_eq!(sniff_mime(&[]), OCTET_STREAM);
    }
}
