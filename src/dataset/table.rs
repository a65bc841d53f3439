use std::{collections::HashMap, fmt, io, sync::Arc};
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use crate::{Error, Result, CENSUS_ANNOTATION_VALUES, CENSUS_GEOGRAPHY_FIELDS, MISSING_MARKER};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

pub type Cell = Option<Value>;

impl Value {
    /// Numeric view of the value, parsing text such as FIPS codes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    // Type-tagged so that "121" and 121 never join
    pub(crate) fn key_repr(&self) -> String {
        match self {
            Value::Text(s) => format!("t:{}", s),
            Value::Number(n) => format!("n:{}", n),
        }
    }

    fn parse(raw: &str, as_text: bool) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == MISSING_MARKER {
            return None;
        }
        if as_text {
            return Some(Value::Text(raw.to_string()));
        }
        match trimmed.parse::<f64>() {
            Ok(n) if CENSUS_ANNOTATION_VALUES.contains(&n) => None,
            Ok(n) => Some(Value::Number(n)),
            Err(_) => Some(Value::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Dataset(format!(
                "Row has {} cells but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Cell>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::Dataset(format!("Column not found: {}", name)))?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(self
            .column(name)?
            .into_iter()
            .map(|cell| cell.as_ref().and_then(Value::as_f64))
            .collect())
    }

    /// Relabels columns found in `labels`; other columns keep their names.
    pub fn rename_columns(&mut self, labels: &HashMap<String, String>) {
        for column in self.columns.iter_mut() {
            if let Some(label) = labels.get(column) {
                *column = label.clone();
            }
        }
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Parses a census API response: a JSON array whose first row is the header.
    pub fn from_census_json(bytes: &[u8]) -> Result<Self> {
        let raw: Vec<Vec<Option<String>>> = serde_json::from_slice(bytes)?;
        let mut raw_rows = raw.into_iter();
        let header = raw_rows
            .next()
            .ok_or_else(|| Error::Dataset("Census response has no header row".to_string()))?;

        let columns = header
            .into_iter()
            .map(|name| name.ok_or_else(|| Error::Dataset("Census header contains null".to_string())))
            .collect::<Result<Vec<String>>>()?;
        let text_mask: Vec<bool> = columns
            .iter()
            .map(|c| CENSUS_GEOGRAPHY_FIELDS.contains(&c.as_str()))
            .collect();

        let mut table = Table::new(columns);
        for raw_row in raw_rows {
            let row = raw_row
                .iter()
                .zip(&text_mask)
                .map(|(cell, &as_text)| cell.as_deref().and_then(|s| Value::parse(s, as_text)))
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Reads CSV with a header row; `text_columns` are never parsed as numbers.
    pub fn from_csv<R: io::Read>(reader: R, text_columns: &[&str]) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let text_mask: Vec<bool> = columns
            .iter()
            .map(|c| text_columns.contains(&c.as_str()))
            .collect();

        let mut table = Table::new(columns);
        for result in rdr.records() {
            let record = result?;
            let row = record
                .iter()
                .zip(&text_mask)
                .map(|(field, &as_text)| Value::parse(field, as_text))
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| match cell {
                Some(value) => value.to_string(),
                None => MISSING_MARKER.to_string(),
            }))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Columns whose present values are all numbers become Float64, the rest Utf8.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len());

        for (idx, name) in self.columns.iter().enumerate() {
            let cells = self.rows.iter().map(|row| &row[idx]);
            let numeric = cells
                .clone()
                .all(|cell| matches!(cell, None | Some(Value::Number(_))));

            if numeric {
                let values: Vec<Option<f64>> = cells
                    .map(|cell| cell.as_ref().and_then(Value::as_f64))
                    .collect();
                fields.push(Field::new(name, DataType::Float64, true));
                arrays.push(Arc::new(Float64Array::from(values)));
            } else {
                let values: Vec<Option<String>> = cells
                    .map(|cell| cell.as_ref().map(Value::to_string))
                    .collect();
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from(values)));
            }
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
    }
}
