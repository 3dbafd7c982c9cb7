//! Structural tokenization of raw delimited text.
//!
//! Splits a pasted or uploaded batch into a header row and data rows. Purely
//! structural: no type coercion, no content validation. The split is a naive
//! per-delimiter split with token trimming; quoted fields and embedded
//! delimiters are not supported, and fully-blank interior lines are kept
//! (they fail the validator's field-count check like any other short row).

use std::path::Path;

use crate::error::{ImportResult, StructureError};

/// Default field delimiter.
pub const DEFAULT_FIELD_DELIMITER: char = ',';

/// Default line delimiter.
pub const DEFAULT_LINE_DELIMITER: char = '\n';

// =============================================================================
// Raw Batch
// =============================================================================

/// An opaque block of delimited text with its delimiters.
///
/// Created transiently from user-pasted text or a decoded uploaded file and
/// discarded after tokenization.
#[derive(Debug, Clone)]
pub struct RawBatch {
    text: String,
    field_delimiter: char,
    line_delimiter: char,
}

impl RawBatch {
    /// A batch with the default comma/newline delimiters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            line_delimiter: DEFAULT_LINE_DELIMITER,
        }
    }

    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    pub fn with_line_delimiter(mut self, delimiter: char) -> Self {
        self.line_delimiter = delimiter;
        self
    }

    /// Tokenize into a header and data rows.
    pub fn tokenize(&self) -> Result<Tokens, StructureError> {
        tokenize(&self.text, self.field_delimiter, self.line_delimiter)
    }
}

/// Tokenized batch: one header row plus zero-validated data rows. Each data
/// row keeps positional correspondence with its line; nothing is re-ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub header: Vec<String>,
    pub data_rows: Vec<Vec<String>>,
}

/// Split raw text into a header row and data rows.
///
/// The whole input is trimmed first. Empty input and header-only input are
/// the two structural failures; everything else tokenizes.
///
/// # Example
/// ```ignore
/// use bulkops::tokenizer::tokenize;
///
/// let tokens = tokenize("a,b\n1,2", ',', '\n').unwrap();
/// assert_eq!(tokens.header, vec!["a", "b"]);
/// assert_eq!(tokens.data_rows, vec![vec!["1", "2"]]);
/// ```
pub fn tokenize(
    raw: &str,
    field_delimiter: char,
    line_delimiter: char,
) -> Result<Tokens, StructureError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StructureError::EmptyInput);
    }

    let lines: Vec<&str> = trimmed.split(line_delimiter).collect();
    if lines.len() < 2 {
        return Err(StructureError::MissingDataRows);
    }

    let header = split_line(lines[0], field_delimiter);
    let data_rows = lines[1..]
        .iter()
        .map(|line| split_line(line, field_delimiter))
        .collect();

    Ok(Tokens { header, data_rows })
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|token| token.trim().to_string()).collect()
}

// =============================================================================
// File ingestion
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8 so a batch always decodes;
/// any mangled tokens then surface as ordinary row errors.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Read an uploaded batch file, auto-detecting its encoding.
pub fn read_batch_file<P: AsRef<Path>>(path: P) -> ImportResult<String> {
    let bytes = std::fs::read(path.as_ref())?;
    let encoding = detect_encoding(&bytes);
    Ok(decode_content(&bytes, &encoding))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_batch() {
        let tokens = tokenize("a,b,c\n1,2,3\n4,5,6", ',', '\n').unwrap();
        assert_eq!(tokens.header, vec!["a", "b", "c"]);
        assert_eq!(tokens.data_rows.len(), 2);
        assert_eq!(tokens.data_rows[0], vec!["1", "2", "3"]);
        assert_eq!(tokens.data_rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_tokens_are_trimmed() {
        let tokens = tokenize(" a , b \n 1 ,  2 ", ',', '\n').unwrap();
        assert_eq!(tokens.header, vec!["a", "b"]);
        assert_eq!(tokens.data_rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let tokens = tokenize("a;b\n1;2", ';', '\n').unwrap();
        assert_eq!(tokens.header, vec!["a", "b"]);
        assert_eq!(tokens.data_rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("", ',', '\n'), Err(StructureError::EmptyInput));
        assert_eq!(tokenize("   \n  ", ',', '\n'), Err(StructureError::EmptyInput));
    }

    #[test]
    fn test_header_only() {
        assert_eq!(
            tokenize("a,b,c", ',', '\n'),
            Err(StructureError::MissingDataRows)
        );
        // Trailing newline alone does not make a data row
        assert_eq!(
            tokenize("a,b,c\n", ',', '\n'),
            Err(StructureError::MissingDataRows)
        );
    }

    #[test]
    fn test_blank_interior_line_is_kept() {
        let tokens = tokenize("a,b\n1,2\n\n3,4", ',', '\n').unwrap();
        assert_eq!(tokens.data_rows.len(), 3);
        assert_eq!(tokens.data_rows[1], vec![""]);
    }

    #[test]
    fn test_missing_trailing_value() {
        let tokens = tokenize("a,b,c\n1,2,", ',', '\n').unwrap();
        assert_eq!(tokens.data_rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_no_quote_handling() {
        // Quoted fields are split naively, by design
        let tokens = tokenize("a,b\n\"x,y\",2", ',', '\n').unwrap();
        assert_eq!(tokens.data_rows[0], vec!["\"x", "y\"", "2"]);
    }

    #[test]
    fn test_raw_batch_builder() {
        let tokens = RawBatch::new("a;b\r1;2")
            .with_field_delimiter(';')
            .with_line_delimiter('\r')
            .tokenize()
            .unwrap();
        assert_eq!(tokens.header, vec!["a", "b"]);
        assert_eq!(tokens.data_rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("a,b\n1,2".as_bytes()), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert!(decoded.contains("Soci"));
    }

    #[test]
    fn test_read_batch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let content = read_batch_file(&path).unwrap();
        let tokens = RawBatch::new(content).tokenize().unwrap();
        assert_eq!(tokens.header, vec!["a", "b"]);
        assert_eq!(tokens.data_rows.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_batch_file("/nonexistent/batch.csv").is_err());
    }
}
