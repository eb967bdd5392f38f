//! Reader for the cleaned tweet log.
//!
//! Records end with `\r\n`. A `\r` that is not followed by `\n` is dropped
//! and the character after it kept. Each record has six tab-separated
//! fields; the last one (the tweet text) may itself contain tabs.

use tweetsynth_core::SynthError;

/// One input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetRecord {
    pub reference_user: String,
    pub tweet_id: i64,
    pub date: String,
    pub user_id: i64,
    pub username: String,
    pub text: String,
}

impl TweetRecord {
    /// Parse one record body (terminator already removed).
    pub fn parse(body: &str, record_no: usize) -> Result<Self, SynthError> {
        let fields: Vec<&str> = body.splitn(6, '\t').collect();
        if fields.len() != 6 {
            return Err(SynthError::malformed(
                record_no,
                format!("expected 6 fields, got {}", fields.len()),
            ));
        }
        let id = |raw: &str, what: &str| {
            raw.trim().parse::<i64>().map_err(|_| {
                SynthError::malformed(record_no, format!("{what} is not an integer: {raw:?}"))
            })
        };
        let record = Self {
            reference_user: fields[0].to_string(),
            tweet_id: id(fields[1], "tweet id")?,
            date: fields[2].to_string(),
            user_id: id(fields[3], "user id")?,
            username: fields[4].to_string(),
            text: fields[5].to_string(),
        };
        if record.checked_adjusted_id().is_none() {
            return Err(SynthError::malformed(
                record_no,
                format!("tweet id overflows: {}", record.tweet_id),
            ));
        }
        Ok(record)
    }

    fn id_offset(&self) -> i64 {
        if self.username.contains("generated") {
            2
        } else if self.username.contains("simulated") {
            1
        } else {
            0
        }
    }

    /// Tweet id as written to output: +2 for generated accounts, +1 for
    /// simulated ones. `None` if the sum leaves the `i64` range.
    pub fn checked_adjusted_id(&self) -> Option<i64> {
        self.tweet_id.checked_add(self.id_offset())
    }

    /// Like [`checked_adjusted_id`](Self::checked_adjusted_id), wrapping on
    /// overflow. Records from [`TweetRecord::parse`] never wrap.
    pub fn adjusted_id(&self) -> i64 {
        self.tweet_id.wrapping_add(self.id_offset())
    }
}

/// Records parsed from one log, plus any unterminated tail.
#[derive(Debug, Default)]
pub struct TweetLog {
    pub records: Vec<TweetRecord>,
    /// Text after the last `\r\n`; not processed.
    pub unterminated: Option<String>,
}

/// Split `raw` into records and parse each one. A bad record fails the
/// whole log.
pub fn parse_log(raw: &str) -> Result<TweetLog, SynthError> {
    let mut log = TweetLog::default();
    let mut buf = String::with_capacity(1024);
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\r' {
            buf.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {
                let record_no = log.records.len() + 1;
                log.records.push(TweetRecord::parse(&buf, record_no)?);
                buf.clear();
            }
            Some(other) => buf.push(other),
            None => {}
        }
    }

    if !buf.is_empty() {
        tracing::warn!(bytes = buf.len(), "tweet log ends without \\r\\n; last fragment skipped");
        log.unterminated = Some(buf);
    }
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "NASA\t1001\t2019-03-04\t11348282\tNASA_simulated\tWe're going to the Moon";

    #[test]
    fn parses_six_fields() {
        let rec = TweetRecord::parse(LINE, 1).unwrap();
        assert_eq!(rec.reference_user, "NASA");
        assert_eq!(rec.tweet_id, 1001);
        assert_eq!(rec.date, "2019-03-04");
        assert_eq!(rec.user_id, 11348282);
        assert_eq!(rec.username, "NASA_simulated");
        assert_eq!(rec.text, "We're going to the Moon");
    }

    #[test]
    fn text_keeps_inner_tabs() {
        let rec = TweetRecord::parse("a\t1\td\t2\tu\tleft\tright", 1).unwrap();
        assert_eq!(rec.text, "left\tright");
    }

    #[test]
    fn id_adjustment() {
        let mut rec = TweetRecord::parse(LINE, 1).unwrap();
        assert_eq!(rec.adjusted_id(), 1002);
        rec.username = "NASA_generated".into();
        assert_eq!(rec.adjusted_id(), 1003);
        rec.username = "generated_and_simulated".into();
        assert_eq!(rec.adjusted_id(), 1003);
        rec.username = "NASA".into();
        assert_eq!(rec.adjusted_id(), 1001);
    }

    #[test]
    fn tweet_id_overflow_is_malformed() {
        let max = i64::MAX;
        let err = TweetRecord::parse(&format!("a\t{max}\td\t2\tx_generated\tt"), 3).unwrap_err();
        assert!(matches!(err, SynthError::MalformedInput { line: 3, .. }));
        assert!(TweetRecord::parse(&format!("a\t{}\td\t2\tx_simulated\tt", max - 1), 1).is_ok());
        assert_eq!(
            TweetRecord::parse(&format!("a\t{max}\td\t2\tplain\tt"), 1)
                .unwrap()
                .adjusted_id(),
            max
        );

        let rec = TweetRecord {
            reference_user: "a".into(),
            tweet_id: max,
            date: "d".into(),
            user_id: 2,
            username: "x_generated".into(),
            text: "t".into(),
        };
        assert_eq!(rec.checked_adjusted_id(), None);
        assert_eq!(rec.adjusted_id(), i64::MIN + 1);
    }

    #[test]
    fn bad_records() {
        assert_eq!(
            TweetRecord::parse("a\t1\td\t2\tu", 4).unwrap_err(),
            SynthError::malformed(4, "expected 6 fields, got 5")
        );
        assert!(TweetRecord::parse("a\tx\td\t2\tu\tt", 1).is_err());
        assert!(TweetRecord::parse("a\t1\td\ty\tu\tt", 1).is_err());
    }

    #[test]
    fn splits_on_crlf_only() {
        let raw = format!("{LINE}\r\n{LINE} two\nlines\r\n");
        let log = parse_log(&raw).unwrap();
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[1].text, "We're going to the Moon two\nlines");
        assert!(log.unterminated.is_none());
    }

    #[test]
    fn lone_cr_is_dropped() {
        let raw = "a\t1\td\t2\tu\tx\ry\r\n";
        let log = parse_log(raw).unwrap();
        assert_eq!(log.records[0].text, "xy");
    }

    #[test]
    fn unterminated_tail_is_kept_aside() {
        let raw = format!("{LINE}\r\n{LINE}");
        let log = parse_log(&raw).unwrap();
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.unterminated.as_deref(), Some(LINE));
    }

    #[test]
    fn bad_record_fails_the_log() {
        let raw = format!("{LINE}\r\nbroken\r\n");
        assert!(matches!(
            parse_log(&raw),
            Err(SynthError::MalformedInput { line: 2, .. })
        ));
    }
}
