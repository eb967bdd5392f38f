//! Shared helpers for the tab-separated table formats.

use crate::error::{Result, SynthError};
use std::io::BufRead;

/// One non-blank line of a tab-separated source, with its 1-based line number.
pub(crate) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Read every non-blank line and split it on tabs.
///
/// A trailing `\r` is stripped so CRLF files parse the same as LF files.
/// Only empty lines are skipped; a line of spaces or tabs is a record and
/// goes through the caller's field checks. Fields are not trimmed.
pub(crate) fn records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| SynthError::malformed(line_no, format!("read failed: {e}")))?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }
        out.push(Record {
            line: line_no,
            fields: line.split('\t').map(str::to_string).collect(),
        });
    }
    Ok(out)
}

/// Parse a finite float; `what` names the field in the error.
pub(crate) fn parse_finite(raw: &str, line: usize, what: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| SynthError::malformed(line, format!("{what} is not a number: {raw:?}")))?;
    if !value.is_finite() {
        return Err(SynthError::malformed(
            line,
            format!("{what} is not finite: {raw:?}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_strips_cr() {
        let src = "a\t1\r\n\r\n\nb\t2\n";
        let recs = records(src.as_bytes()).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].line, 1);
        assert_eq!(recs[0].fields, vec!["a", "1"]);
        assert_eq!(recs[1].line, 4);
        assert_eq!(recs[1].fields, vec!["b", "2"]);
    }

    #[test]
    fn whitespace_only_line_is_a_record() {
        let recs = records("a\t1\n \t \t\n".as_bytes()).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].line, 2);
        assert_eq!(recs[1].fields, vec![" ", " ", ""]);
    }

    #[test]
    fn rejects_nan_and_garbage() {
        assert!(parse_finite("0.25", 1, "score").is_ok());
        assert!(parse_finite(" 1e-6 ", 1, "score").is_ok());
        assert!(matches!(
            parse_finite("NaN", 3, "score"),
            Err(SynthError::MalformedInput { line: 3, .. })
        ));
        assert!(parse_finite("inf", 1, "score").is_err());
        assert!(parse_finite("abc", 1, "score").is_err());
    }
}
