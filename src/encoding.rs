// Best-effort text decoding for CSV exports. The files come out of various
// spreadsheet tools, so the reader tries a prioritized list of encodings:
// UTF-8 with BOM, UTF-16 (BOM), plain UTF-8, Windows-1256 (Arabic), and a
// Latin-1 tail that maps every byte.

use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn read_text_multi(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match decode_text(&bytes) {
        Some(text) => Ok(text),
        None => bail!("No candidate encoding could decode {}", path.display()),
    }
}

pub fn decode_text(bytes: &[u8]) -> Option<String> {
    // BOM-marked files first
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        if let Ok(text) = std::str::from_utf8(rest) {
            return Some(text.to_string());
        }
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        if let Some(text) =
            encoding_rs::UTF_16LE.decode_without_bom_handling_and_without_replacement(rest)
        {
            return Some(text.into_owned());
        }
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        if let Some(text) =
            encoding_rs::UTF_16BE.decode_without_bom_handling_and_without_replacement(rest)
        {
            return Some(text.into_owned());
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.to_string());
    }

    if let Some(text) =
        encoding_rs::WINDOWS_1256.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return Some(text.into_owned());
    }

    // Latin-1 maps all 256 byte values, so the fallback chain always ends here
    Some(bytes.iter().map(|&b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_utf8() {
        assert_eq!(decode_text("id,name\n1,مخبز".as_bytes()).unwrap(), "id,name\n1,مخبز");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("id,name".as_bytes());
        assert_eq!(decode_text(&bytes).unwrap(), "id,name");
    }

    #[test]
    fn test_decode_utf16_le() {
        let text = "id,name_ar\n1,مخبز";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), text);
    }

    #[test]
    fn test_decode_windows_1256() {
        let text = "مخبز قديم";
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1256.encode(text);
        assert!(!had_errors);
        // Arabic in cp1256 is not valid UTF-8, so this exercises the fallback
        assert!(std::str::from_utf8(&bytes).is_err());
        assert_eq!(decode_text(&bytes).unwrap(), text);
    }

    #[test]
    fn test_decode_never_fails() {
        // Arbitrary bytes always decode via the Latin-1 tail
        let bytes: Vec<u8> = (0..=255).collect();
        assert!(decode_text(&bytes).is_some());
    }
}
