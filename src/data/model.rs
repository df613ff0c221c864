use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Name of the record identifier column.
pub const ID_COLUMN: &str = "id";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a CSV row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a CSV reader infers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    /// Infer the cell type from raw CSV text.
    pub fn infer(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        // `nan` is a missing value; `inf`/`infinity` stay text.
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return CellValue::Null;
            }
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        if s.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        CellValue::String(s.to_string())
    }

    /// Interpret the value as a record id. Floats count only when integral.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

/// `Null` renders as the empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Float(_) | CellValue::Null => serializer.serialize_unit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – one normalized CSV file
// ---------------------------------------------------------------------------

/// The full parsed dataset. Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Lowercased, de-duplicated column names in output order.
    pub columns: Vec<String>,
    /// Rows in file order.
    pub rows: Vec<Vec<CellValue>>,
    /// Source text of every cell, aligned with `rows`.
    texts: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from typed cells; cell text is the rendered value.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let texts = rows
            .iter()
            .map(|row| row.iter().map(CellValue::to_string).collect())
            .collect();
        Self::assemble(columns, rows, texts)
    }

    /// Build a dataset from raw CSV fields, inferring each cell's type and
    /// keeping the field text for keyword search.
    pub fn from_text(columns: Vec<String>, texts: Vec<Vec<String>>) -> Self {
        let rows = texts
            .iter()
            .map(|row| row.iter().map(|t| CellValue::infer(t)).collect())
            .collect();
        Self::assemble(columns, rows, texts)
    }

    /// Lowercase headers and inject a synthetic `id` column (first position,
    /// counted from 1) when the source has none.
    fn assemble(
        columns: Vec<String>,
        mut rows: Vec<Vec<CellValue>>,
        mut texts: Vec<Vec<String>>,
    ) -> Self {
        let mut columns = unique_columns(columns);

        if !columns.iter().any(|c| c == ID_COLUMN) {
            columns.insert(0, ID_COLUMN.to_string());
            for (n, (row, text)) in rows.iter_mut().zip(texts.iter_mut()).enumerate() {
                let id = n as i64 + 1;
                row.insert(0, CellValue::Integer(id));
                text.insert(0, id.to_string());
            }
        }

        Dataset {
            columns,
            rows,
            texts,
        }
    }

    /// Source text of row `idx`'s cells.
    pub fn row_text(&self, idx: usize) -> &[String] {
        self.texts.get(idx).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the `id` column.
    pub fn id_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c == ID_COLUMN)
    }

    /// The id of row `idx`, if it has a numeric one.
    pub fn row_id(&self, idx: usize) -> Option<i64> {
        let col = self.id_index()?;
        self.rows.get(idx)?.get(col)?.as_id()
    }

    /// A serializable view of row `idx`.
    pub fn record(&self, idx: usize) -> Option<Record<'_>> {
        self.rows.get(idx).map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    /// Serializable views of the given rows, in the given order.
    pub fn records(&self, indices: &[usize]) -> Vec<Record<'_>> {
        indices.iter().filter_map(|&i| self.record(i)).collect()
    }
}

/// Lowercase column names; a name seen before gets `.1`, `.2`, ... appended.
fn unique_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .into_iter()
        .map(|c| {
            let base = c.to_lowercase();
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Record – one row rendered as a JSON object
// ---------------------------------------------------------------------------

/// Borrowed view of a single row; serializes as an object keyed by column,
/// keys in column order.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(col, cell)?;
        }
        map.end()
    }
}
