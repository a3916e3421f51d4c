//! Bordered text tables.
//!
//! ```text
//! +---+----+
//! | a |  b |
//! +---+----+
//! | 1 | 22 |
//! +---+----+
//! ```

use std::fmt;

use serde_json::Value;

use crate::{
    ansi::Style,
    error::{GlitterError, Result},
};

/// An ordered mapping of column key to cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, keeping its original position when it already exists.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Labels each key of `row` with itself.
    fn identity_labels(row: &Self) -> Self {
        row.keys().map(|k| (k, k)).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Record {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

/// Rows plus column labels, with column widths measured once up front.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Record>,
    labels: Record,
    widths: Vec<usize>,
}

impl Grid {
    /// Builds a grid. Without `labels`, the first row's keys label
    /// themselves, so an empty `rows` then fails. Every row must hold every
    /// labelled key.
    pub fn new(rows: Vec<Record>, labels: Option<Record>) -> Result<Self> {
        let labels = match labels {
            Some(labels) => labels,
            None => rows.first().map(Record::identity_labels).ok_or_else(|| {
                GlitterError::invalid("cannot infer labels from an empty set of rows")
            })?,
        };

        for (index, row) in rows.iter().enumerate() {
            if let Some(missing) = labels.keys().find(|key| row.get(key).is_none()) {
                return Err(GlitterError::invalid(format!(
                    "row {index} has no value for column {missing:?}"
                )));
            }
        }

        let widths = labels
            .iter()
            .map(|(key, label)| {
                rows.iter()
                    .filter_map(|row| row.get(key))
                    .map(|value| value.chars().count())
                    .fold(label.chars().count(), usize::max)
            })
            .collect();

        Ok(Self {
            rows,
            labels,
            widths,
        })
    }

    /// Column widths in label order.
    #[must_use]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    #[must_use]
    pub fn labels(&self) -> &Record {
        &self.labels
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_rule(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("+")?;
        for width in &self.widths {
            write!(f, "{}+", "-".repeat(width.saturating_add(2)))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bold = Style::Bold.sequence();
        let reset = Style::Reset.sequence();

        self.write_rule(f)?;

        f.write_str("|")?;
        for ((_, label), width) in self.labels.iter().zip(&self.widths) {
            write!(f, " {bold}{}{reset} |", pad(label, *width))?;
        }
        writeln!(f)?;
        self.write_rule(f)?;

        for row in &self.rows {
            f.write_str("|")?;
            for (key, width) in self.labels.keys().zip(&self.widths) {
                write!(f, " {} |", pad(row.get(key).unwrap_or_default(), *width))?;
            }
            writeln!(f)?;
        }

        self.write_rule(f)
    }
}

/// Right-aligns by character count, not bytes.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{text}", " ".repeat(fill))
}

/// Renders `rows` as a bordered grid. See [`Grid::new`].
pub fn build_grid(rows: Vec<Record>, labels: Option<Record>) -> Result<String> {
    Grid::new(rows, labels).map(|grid| grid.render())
}

/// Converts a JSON array of flat objects into records, keeping key order.
/// Numbers and booleans are stringified and `null` becomes an empty cell.
pub fn rows_from_json(value: &Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(GlitterError::invalid("rows must be a JSON array"));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(map) = item else {
                return Err(GlitterError::invalid(format!("row {index} is not an object")));
            };

            map.iter()
                .map(|(key, cell)| {
                    let text = match cell {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        Value::Null => String::new(),
                        Value::Array(_) | Value::Object(_) => {
                            return Err(GlitterError::invalid(format!(
                                "row {index} column {key:?} is not a scalar"
                            )));
                        }
                    };
                    Ok((key.clone(), text))
                })
                .collect::<Result<Record>>()
        })
        .collect()
}

/// Converts a JSON object into column labels.
pub fn labels_from_json(value: &Value) -> Result<Record> {
    rows_from_json(&Value::Array(vec![value.clone()]))?
        .pop()
        .ok_or_else(|| GlitterError::invalid("labels must be a JSON object"))
}
