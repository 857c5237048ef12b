// Direct-read extractors: plain text, JSON, and the legacy word-processor placeholder

/// Decode bytes as UTF-8, replacing invalid sequences
pub fn read_plain(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Re-serialize JSON with 2-space indentation; fall back to the raw text if it doesn't parse
pub fn read_json_pretty(bytes: &[u8]) -> String {
    let raw = read_plain(bytes);
    serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or(raw)
}

/// Placeholder for .doc/.docx: names the file and its size, extracts nothing
pub fn legacy_placeholder(filename: &str, size_bytes: u64) -> String {
    let kb = size_bytes as f64 / 1024.0;
    format!(
        "[Word document: {}]\nSize: {:.2} KB\n\n\
         Full text extraction is not available for Word documents; \
         convert the file to PDF for a complete analysis.\n\n\
         This document contains {} KB of content.",
        filename,
        kb,
        kb.ceil() as u64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_plain_lossy() {
        assert_eq!(read_plain(b"ok \xFF"), "ok \u{FFFD}");
    }

    #[test]
    fn test_json_fallback_to_raw() {
        assert_eq!(read_json_pretty(b"{broken"), "{broken");
    }

    #[test]
    fn test_json_nested_indentation() {
        let out = read_json_pretty(br#"{"a":[1,2]}"#);
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_json_keeps_key_order() {
        let out = read_json_pretty(br#"{"zeta":1,"alpha":{"y":true,"b":null}}"#);
        assert_eq!(
            out,
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"y\": true,\n    \"b\": null\n  }\n}"
        );
    }

    #[test]
    fn test_legacy_placeholder_rounds_up_kb() {
        let text = legacy_placeholder("memo.doc", 1500);
        assert!(text.starts_with("[Word document: memo.doc]"));
        assert!(text.contains("Size: 1.46 KB"));
        assert!(text.contains("contains 2 KB"));
    }
}
