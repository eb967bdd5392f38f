use crate::error::{Result, SynthError};
use crate::ingest;
use ahash::AHashMap;
use rand_distr::Weibull;
use serde::Deserialize;
use std::io::BufRead;

/// Shape and scale of one user's Weibull distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeibullParams {
    shape: f64,
    scale: f64,
}

impl WeibullParams {
    /// Both values must be finite and strictly positive.
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        for (name, value) in [("shape", shape), ("scale", scale)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SynthError::malformed(
                    0,
                    format!("{name} must be finite and > 0, got {value}"),
                ));
            }
        }
        Ok(Self { shape, scale })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The distribution to draw variates from.
    pub fn distribution(&self) -> Weibull<f64> {
        // rand_distr takes (scale, shape); positivity was checked in `new`.
        Weibull::new(self.scale, self.shape).unwrap_or_else(|_| unreachable!())
    }
}

/// Positional order of the two numeric fields in a parameter file.
///
/// The reference data files label the columns `scale, shape`, but the
/// generator that produced the published corpora fed the first column into
/// the shape slot. `ShapeScale` reproduces that behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnOrder {
    #[default]
    ShapeScale,
    ScaleShape,
}

/// Per-user Weibull parameters. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    params: AHashMap<String, WeibullParams>,
    order: Vec<String>,
}

impl ParameterTable {
    /// Build from `(user, shape, scale)` triples. Later duplicates overwrite
    /// earlier ones but keep the user's first position.
    pub fn from_records<I, S>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (user, shape, scale) in records {
            table.insert(user.into(), WeibullParams::new(shape, scale)?)?;
        }
        Ok(table)
    }

    /// Parse `user \t a \t b` lines, mapping `a`/`b` per `columns`.
    ///
    /// Any bad line rejects the whole source.
    pub fn from_reader<R: BufRead>(reader: R, columns: ColumnOrder) -> Result<Self> {
        let mut table = Self::default();
        for rec in ingest::records(reader)? {
            if rec.fields.len() != 3 {
                return Err(SynthError::malformed(
                    rec.line,
                    format!("expected 3 fields, got {}", rec.fields.len()),
                ));
            }
            let first = ingest::parse_finite(&rec.fields[1], rec.line, "parameter")?;
            let second = ingest::parse_finite(&rec.fields[2], rec.line, "parameter")?;
            let (shape, scale) = match columns {
                ColumnOrder::ShapeScale => (first, second),
                ColumnOrder::ScaleShape => (second, first),
            };
            let params = WeibullParams::new(shape, scale).map_err(|e| e.at_line(rec.line))?;
            table
                .insert(rec.fields[0].clone(), params)
                .map_err(|e| e.at_line(rec.line))?;
        }
        tracing::debug!(users = table.len(), "parameter table loaded");
        Ok(table)
    }

    fn insert(&mut self, user: String, params: WeibullParams) -> Result<()> {
        if user.is_empty() {
            return Err(SynthError::malformed(0, "user identity is empty"));
        }
        if self.params.insert(user.clone(), params).is_none() {
            self.order.push(user);
        }
        Ok(())
    }

    /// Look up a user's parameters.
    pub fn get(&self, user: &str) -> Result<WeibullParams> {
        self.params
            .get(user)
            .copied()
            .ok_or_else(|| SynthError::unknown_user(user))
    }

    pub fn contains(&self, user: &str) -> bool {
        self.params.contains_key(user)
    }

    /// Users in first-seen order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_registered_params() {
        let table = ParameterTable::from_records([("nasa", 0.34, 2.1e-6)]).unwrap();
        let p = table.get("nasa").unwrap();
        assert_eq!(p.shape(), 0.34);
        assert_eq!(p.scale(), 2.1e-6);
    }

    #[test]
    fn unknown_user_is_an_error() {
        let table = ParameterTable::from_records([("nasa", 1.0, 1.0)]).unwrap();
        assert_eq!(
            table.get("esa").unwrap_err(),
            SynthError::unknown_user("esa")
        );
    }

    #[test]
    fn duplicate_user_last_write_wins() {
        let table =
            ParameterTable::from_records([("a", 1.0, 1.0), ("b", 2.0, 2.0), ("a", 3.0, 4.0)])
                .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a").unwrap(), WeibullParams::new(3.0, 4.0).unwrap());
        assert_eq!(table.users().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn rejects_non_positive_or_non_finite() {
        assert!(WeibullParams::new(0.0, 1.0).is_err());
        assert!(WeibullParams::new(1.0, -1.0).is_err());
        assert!(WeibullParams::new(f64::NAN, 1.0).is_err());
        assert!(WeibullParams::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn reader_maps_columns_positionally() {
        let src = "nasa\t0.5\t0.002\n";
        let shape_first = ParameterTable::from_reader(src.as_bytes(), ColumnOrder::ShapeScale)
            .unwrap()
            .get("nasa")
            .unwrap();
        assert_eq!((shape_first.shape(), shape_first.scale()), (0.5, 0.002));

        let scale_first = ParameterTable::from_reader(src.as_bytes(), ColumnOrder::ScaleShape)
            .unwrap()
            .get("nasa")
            .unwrap();
        assert_eq!((scale_first.shape(), scale_first.scale()), (0.002, 0.5));
    }

    #[test]
    fn reader_keeps_user_ids_verbatim() {
        let table =
            ParameterTable::from_reader(" nasa\t1\t1\n".as_bytes(), ColumnOrder::default()).unwrap();
        assert!(table.get(" nasa").is_ok());
        assert_eq!(table.get("nasa").unwrap_err(), SynthError::unknown_user("nasa"));
    }

    #[test]
    fn whitespace_only_line_rejects_batch() {
        let src = "a\t1\t1\n \t \n";
        assert_eq!(
            ParameterTable::from_reader(src.as_bytes(), ColumnOrder::default()).unwrap_err(),
            SynthError::malformed(2, "expected 3 fields, got 2")
        );
    }

    #[test]
    fn reader_rejects_whole_batch_on_bad_line() {
        let src = "a\t1\t1\nb\t1\nc\t1\t1\n";
        let err = ParameterTable::from_reader(src.as_bytes(), ColumnOrder::default()).unwrap_err();
        assert_eq!(err, SynthError::malformed(2, "expected 3 fields, got 2"));

        let src = "a\t1\t1\nb\tx\t1\n";
        assert!(matches!(
            ParameterTable::from_reader(src.as_bytes(), ColumnOrder::default()),
            Err(SynthError::MalformedInput { line: 2, .. })
        ));

        let src = "a\t0\t1\n";
        assert!(matches!(
            ParameterTable::from_reader(src.as_bytes(), ColumnOrder::default()),
            Err(SynthError::MalformedInput { line: 1, .. })
        ));
    }
}
