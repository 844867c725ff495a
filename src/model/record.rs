//! Result records: one flat row of answers per image.

use std::fmt;

/// A recorded cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Free text: operator, image id, categorical choice names, cells read back from disk.
    Text(String),

    /// A boolean label's selected index.
    Index(usize),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Column name → value, in insertion order.
///
/// Re-inserting a column overwrites its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<(String, Value)>,
}

impl Record {
    /// A record seeded with the operator and image columns, in that order.
    pub fn identified(
        operator_column: &str,
        operator: &str,
        image_column: &str,
        image: &str,
    ) -> Self {
        let mut record = Self::default();
        record.insert(operator_column, operator);
        record.insert(image_column, image);
        record
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| c == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }
}
