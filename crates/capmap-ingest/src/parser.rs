//! Record parsers for uploaded score files
//!
//! Converts raw delimited text into a validated [`ImportMapping`]. The first
//! line is a header and is never inspected. Malformed rows are skipped, they
//! never fail the parse; the only failure is content that is not text.

use crate::error::ParseError;
use capmap_catalog::{ImportMapping, MaturityLevel};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser trait for converting uploaded content into a mapping
///
/// Implement this trait to accept another upload format.
pub trait RecordParser: Send + Sync + 'static {
    /// Parse decoded text into a mapping, skipping malformed rows
    fn parse(&self, content: &str) -> ImportMapping;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Decode `bytes` as UTF-8, then parse
    ///
    /// A leading byte-order mark is ignored.
    ///
    /// # Errors
    /// `ParseError::Decode` when the content is not valid UTF-8
    fn parse_bytes(&self, name: &str, bytes: &[u8]) -> Result<ImportMapping, ParseError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(|e| ParseError::decode(name, e))?;
        Ok(self.parse(text))
    }
}

/// Per-parse row tally
///
/// Only logged, never shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Rows that produced an entry
    pub accepted: usize,
    /// Rows that replaced an earlier row with the same name
    pub overwritten: usize,
    /// Rows without a comma, or with an empty name or level
    pub missing_field: usize,
    /// Rows whose level is not a base-10 integer
    pub not_an_integer: usize,
    /// Rows whose level is outside 1..=4
    pub out_of_range: usize,
}

impl ParseStats {
    /// Rows dropped for any reason
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.missing_field + self.not_an_integer + self.out_of_range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    MissingField,
    NotAnInteger,
    OutOfRange,
}

/// `<name>,<level>` CSV parser
///
/// Each line after the header is trimmed and split on its first comma. The
/// name is the text before it, kept verbatim; the level is the text up to
/// the next comma, trimmed. The level must be a base-10 integer in 1..=4.
/// When a name repeats, the last row wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRecordParser;

impl CsvRecordParser {
    /// Create new CSV parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse and return the row tally alongside the mapping
    #[must_use]
    pub fn parse_with_stats(&self, content: &str) -> (ImportMapping, ParseStats) {
        let mut mapping = ImportMapping::new();
        let mut stats = ParseStats::default();

        for line in content.split('\n').skip(1) {
            match parse_row(line) {
                Ok((name, level)) => {
                    stats.accepted += 1;
                    if mapping.insert(name, level).is_some() {
                        stats.overwritten += 1;
                    }
                }
                Err(Skip::MissingField) => stats.missing_field += 1,
                Err(Skip::NotAnInteger) => stats.not_an_integer += 1,
                Err(Skip::OutOfRange) => stats.out_of_range += 1,
            }
        }

        tracing::debug!(
            entries = mapping.len(),
            accepted = stats.accepted,
            overwritten = stats.overwritten,
            skipped = stats.skipped(),
            "parsed capability rows"
        );
        (mapping, stats)
    }
}

fn parse_row(line: &str) -> Result<(&str, MaturityLevel), Skip> {
    let (name, rest) = line.trim().split_once(',').ok_or(Skip::MissingField)?;
    let level_text = rest.split_once(',').map_or(rest, |(first, _)| first);

    let level_text = level_text.trim();
    if name.is_empty() || level_text.is_empty() {
        return Err(Skip::MissingField);
    }

    let value: i64 = level_text.parse().map_err(|_| Skip::NotAnInteger)?;
    let level = MaturityLevel::new(value).ok_or(Skip::OutOfRange)?;
    Ok((name, level))
}

impl RecordParser for CsvRecordParser {
    fn parse(&self, content: &str) -> ImportMapping {
        self.parse_with_stats(content).0
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(v: i64) -> MaturityLevel {
        MaturityLevel::new(v).unwrap()
    }

    fn parse(content: &str) -> ImportMapping {
        CsvRecordParser.parse(content)
    }

    #[test]
    fn header_is_discarded() {
        let mapping = parse("CI/CD,2\nIaC,3\n");
        assert_eq!(mapping.get("CI/CD"), None);
        assert_eq!(mapping.get("IaC"), Some(level(3)));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse("capability,level").is_empty());
        assert!(parse("capability,level\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn duplicate_name_last_wins() {
        let (mapping, stats) = CsvRecordParser.parse_with_stats("h\nA,2\nA,3\n");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("A"), Some(level(3)));
        assert_eq!(stats.overwritten, 1);
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(parse("h\nX,5\n").is_empty());
        assert!(parse("h\nX,0\n").is_empty());
        assert!(parse("h\nX,-1\n").is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (mapping, stats) = CsvRecordParser.parse_with_stats("header\nfoo\nbar,baz\nA,2\n");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("A"), Some(level(2)));
        assert_eq!(stats.missing_field, 2); // "foo" and the trailing blank line
        assert_eq!(stats.not_an_integer, 1);
    }

    #[test]
    fn empty_fields_are_skipped() {
        assert!(parse("h\n,3\nA,\n , \n\n").is_empty());
    }

    #[test]
    fn only_first_two_tokens_matter() {
        let mapping = parse("h\nA,2,extra\nB,3,\n");
        assert_eq!(mapping.get("A"), Some(level(2)));
        assert_eq!(mapping.get("B"), Some(level(3)));
    }

    #[test]
    fn empty_second_token_is_missing() {
        assert!(parse("h\nA,,2\n").is_empty());
    }

    #[test]
    fn crlf_and_padding_tolerated() {
        let mapping = parse("capability,level\r\n  CI/CD, 1 \r\nIaC,4\r\n");
        assert_eq!(mapping.get("CI/CD"), Some(level(1)));
        assert_eq!(mapping.get("IaC"), Some(level(4)));
    }

    #[test]
    fn name_keeps_inner_padding() {
        let mapping = parse("h\nIaC ,2\n");
        assert_eq!(mapping.get("IaC "), Some(level(2)));
        assert_eq!(mapping.get("IaC"), None);
    }

    #[test]
    fn non_integer_levels_rejected() {
        assert!(parse("h\nA,2.5\nB,two\nC,0x2\n").is_empty());
    }

    #[test]
    fn parse_bytes_rejects_invalid_utf8() {
        let err = CsvRecordParser
            .parse_bytes("scores.csv", b"h\nA,\xff\xfe\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Decode { ref name, .. } if name == "scores.csv"));
    }

    #[test]
    fn parse_bytes_strips_bom() {
        let mapping = CsvRecordParser
            .parse_bytes("scores.csv", b"\xEF\xBB\xBFcapability,level\nA,1\n")
            .unwrap();
        assert_eq!(mapping.get("A"), Some(level(1)));
    }

    #[test]
    fn csv_extension() {
        assert_eq!(CsvRecordParser.extensions(), &["csv"]);
    }
}
