use crate::error::{Result, SynthError};
use crate::ingest;
use ahash::AHashMap;
use std::io::BufRead;

/// One user's word -> score mapping, in first-insertion order.
///
/// Re-inserting a word overwrites its score but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfVector {
    entries: Vec<(String, f64)>,
    positions: AHashMap<String, usize>,
}

impl TfidfVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: impl Into<String>, score: f64) {
        let word = word.into();
        match self.positions.get(&word) {
            Some(&pos) => self.entries[pos].1 = score,
            None => {
                self.positions.insert(word.clone(), self.entries.len());
                self.entries.push((word, score));
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.positions.get(word).map(|&pos| self.entries[pos].1)
    }

    /// `(word, score)` pairs in the vector's defined order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(w, s)| (w.as_str(), *s))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(w, _)| w.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TfidfVector {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut v = Self::new();
        for (word, score) in iter {
            v.insert(word, score);
        }
        v
    }
}

/// Per-user TF-IDF vectors, keyed in header (column) order.
#[derive(Debug, Clone, Default)]
pub struct TfidfTable {
    users: Vec<String>,
    vectors: AHashMap<String, TfidfVector>,
}

impl TfidfTable {
    /// Build from a header of user ids and rows of `(word, scores)`, where
    /// `scores[i]` belongs to `header[i]`.
    pub fn from_matrix<W, I>(header: Vec<String>, rows: I) -> Result<Self>
    where
        W: Into<String>,
        I: IntoIterator<Item = (W, Vec<f64>)>,
    {
        let mut table = Self::with_header(header, 0)?;
        for (idx, (word, scores)) in rows.into_iter().enumerate() {
            table.push_row(word.into(), &scores).map_err(|e| e.at_line(idx + 2))?;
        }
        Ok(table)
    }

    /// Parse the tab-separated matrix: a header line of user ids, then rows of
    /// `ignored \t word \t score_1 \t ... \t score_n`.
    ///
    /// Empty header fields (a leading index column) are skipped. User ids are
    /// kept byte-for-byte, as in the parameter table. Any bad row rejects the
    /// whole source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = ingest::records(reader)?.into_iter();
        let header = records
            .next()
            .ok_or_else(|| SynthError::malformed(1, "missing header row"))?;
        let users: Vec<String> = header
            .fields
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect();
        let mut table = Self::with_header(users, header.line)?;

        let expected = table.users.len() + 2;
        for rec in records {
            if rec.fields.len() != expected {
                return Err(SynthError::malformed(
                    rec.line,
                    format!("expected {expected} fields, got {}", rec.fields.len()),
                ));
            }
            let scores = rec.fields[2..]
                .iter()
                .map(|raw| ingest::parse_finite(raw, rec.line, "score"))
                .collect::<Result<Vec<_>>>()?;
            table
                .push_row(rec.fields[1].clone(), &scores)
                .map_err(|e| e.at_line(rec.line))?;
        }

        tracing::debug!(
            users = table.users.len(),
            words = table.vectors.values().map(TfidfVector::len).max().unwrap_or(0),
            "tf-idf matrix loaded"
        );
        Ok(table)
    }

    fn with_header(users: Vec<String>, line: usize) -> Result<Self> {
        if users.is_empty() {
            return Err(SynthError::malformed(line, "header names no users"));
        }
        let mut vectors = AHashMap::with_capacity(users.len());
        for user in &users {
            if user.is_empty() {
                return Err(SynthError::malformed(line, "empty user id in header"));
            }
            if vectors.insert(user.clone(), TfidfVector::new()).is_some() {
                return Err(SynthError::malformed(
                    line,
                    format!("duplicate user in header: {user}"),
                ));
            }
        }
        Ok(Self { users, vectors })
    }

    fn push_row(&mut self, word: String, scores: &[f64]) -> Result<()> {
        if word.is_empty() {
            return Err(SynthError::malformed(0, "empty word"));
        }
        if scores.len() != self.users.len() {
            return Err(SynthError::malformed(
                0,
                format!(
                    "word {word:?} has {} scores for {} users",
                    scores.len(),
                    self.users.len()
                ),
            ));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(SynthError::malformed(
                0,
                format!("word {word:?} has non-finite score {bad}"),
            ));
        }
        for (user, &score) in self.users.iter().zip(scores) {
            if let Some(vector) = self.vectors.get_mut(user) {
                vector.insert(word.as_str(), score);
            }
        }
        Ok(())
    }

    /// Look up a user's vector.
    pub fn get(&self, user: &str) -> Result<&TfidfVector> {
        self.vectors
            .get(user)
            .ok_or_else(|| SynthError::unknown_user(user))
    }

    pub fn contains(&self, user: &str) -> bool {
        self.vectors.contains_key(user)
    }

    /// Users in header order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
