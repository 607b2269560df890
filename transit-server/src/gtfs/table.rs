//! Low-level GTFS table reading.
//!
//! The feed's exporter wraps each whole row in one layer of outer double
//! quotes (`"col1,col2,col3"`). Each raw line is trimmed of CR/LF and
//! surrounding whitespace and stripped of that outer quote layer, then
//! handed to the `csv` crate for field splitting with standard `""`
//! escaping.

use std::fs;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

/// Normalize one raw feed line: trim whitespace/CR/LF, then strip a single
/// layer of outer double quotes if the line is wrapped in one.
pub fn normalize_line(raw: &str) -> &str {
    let line = raw.trim();
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        &line[1..line.len() - 1]
    } else {
        line
    }
}

/// Read a GTFS table file into field records.
///
/// The first line is a header and is discarded. Returns `None` when the
/// file does not exist or cannot be read (a missing table contributes
/// nothing). Rows the CSV parser rejects are skipped.
pub fn read_table(path: &Path) -> Option<Vec<StringRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "table not readable, skipping");
            return None;
        }
    };

    let mut normalized = String::with_capacity(contents.len());
    for line in contents.lines().skip(1) {
        let line = normalize_line(line);
        if line.is_empty() {
            continue;
        }
        normalized.push_str(line);
        normalized.push('\n');
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(normalized.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => debug!(path = %path.display(), error = %e, "skipping malformed row"),
        }
    }
    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> Vec<String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(normalize_line(line).as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        record.iter().map(str::to_string).collect()
    }

    #[test]
    fn plain_line() {
        assert_eq!(parse_one("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn outer_quotes_stripped() {
        assert_eq!(parse_one("\"a,b,c\""), vec!["a", "b", "c"]);
    }

    #[test]
    fn trailing_cr_trimmed() {
        assert_eq!(parse_one("a,b,c\r"), vec!["a", "b", "c"]);
        assert_eq!(parse_one("  \"a,b\"  \r\n"), vec!["a", "b"]);
    }

    #[test]
    fn inner_quoted_field_with_comma() {
        assert_eq!(parse_one("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn escaped_quote_inside_quoted_field() {
        // "" inside a quoted field denotes a literal quote.
        assert_eq!(parse_one("a,\"b\"\"c\",d"), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn normalize_leaves_unwrapped_alone() {
        assert_eq!(normalize_line("plain"), "plain");
        assert_eq!(normalize_line("  padded  "), "padded");
        assert_eq!(normalize_line("\"wrapped\""), "wrapped");
    }

    #[test]
    fn missing_file_is_none() {
        assert!(read_table(Path::new("/definitely/not/here.csv")).is_none());
    }
}
