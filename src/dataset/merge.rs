use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::{Cell, Error, Result, Table};

type KeyTuple = Vec<Option<String>>;

fn key_indices(table: &Table, keys: &[&str], position: usize) -> Result<Vec<usize>> {
    keys.iter()
        .map(|key| {
            table.column_index(key).ok_or_else(|| {
                Error::Dataset(format!("Table {} is missing key column {}", position, key))
            })
        })
        .collect()
}

fn key_tuple(row: &[Cell], indices: &[usize]) -> KeyTuple {
    indices
        .iter()
        .map(|&idx| row[idx].as_ref().map(|value| value.key_repr()))
        .collect()
}

/// Outer-joins `tables` left to right on `keys`.
///
/// Left rows keep their order, unmatched right rows follow. Columns that
/// clash outside the key set get `_x`/`_y` suffixes.
pub fn merge_tables(tables: &[Table], keys: &[&str]) -> Result<Table> {
    let (first, rest) = tables
        .split_first()
        .ok_or_else(|| Error::Dataset("Cannot merge an empty sequence of tables".to_string()))?;

    if keys.is_empty() {
        return Err(Error::Dataset("At least one key column is required".to_string()));
    }

    key_indices(first, keys, 0)?;
    let mut merged = first.clone();

    for (offset, right) in rest.iter().enumerate() {
        merged = outer_join(&merged, right, keys, offset + 1)?;
    }

    debug!(
        "Merged {} tables into {} rows x {} columns",
        tables.len(),
        merged.len(),
        merged.columns().len()
    );
    Ok(merged)
}

fn outer_join(left: &Table, right: &Table, keys: &[&str], position: usize) -> Result<Table> {
    let left_keys = key_indices(left, keys, position - 1)?;
    let right_keys = key_indices(right, keys, position)?;

    let key_names: HashSet<&str> = keys.iter().copied().collect();
    let right_value_idx: Vec<usize> = (0..right.columns().len())
        .filter(|idx| !key_names.contains(right.columns()[*idx].as_str()))
        .collect();

    let right_names: HashSet<&str> = right_value_idx
        .iter()
        .map(|&idx| right.columns()[idx].as_str())
        .collect();
    let left_names: HashSet<&str> = left.columns().iter().map(String::as_str).collect();

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .map(|name| {
            if !key_names.contains(name.as_str()) && right_names.contains(name.as_str()) {
                format!("{}_x", name)
            } else {
                name.clone()
            }
        })
        .collect();
    columns.extend(right_value_idx.iter().map(|&idx| {
        let name = &right.columns()[idx];
        if left_names.contains(name.as_str()) {
            format!("{}_y", name)
        } else {
            name.clone()
        }
    }));

    let mut seen = HashSet::with_capacity(columns.len());
    if let Some(clash) = columns.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(Error::Dataset(format!(
            "Merging table {} produces duplicate column {}",
            position, clash
        )));
    }

    let mut right_lookup: HashMap<KeyTuple, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows().iter().enumerate() {
        right_lookup
            .entry(key_tuple(row, &right_keys))
            .or_default()
            .push(row_idx);
    }

    let mut rows = Vec::with_capacity(left.len().max(right.len()));
    let mut matched_right = vec![false; right.len()];

    for left_row in left.rows() {
        match right_lookup.get(&key_tuple(left_row, &left_keys)) {
            Some(matches) => {
                for &right_idx in matches {
                    matched_right[right_idx] = true;
                    let right_row = &right.rows()[right_idx];
                    let mut row = left_row.clone();
                    row.extend(right_value_idx.iter().map(|&idx| right_row[idx].clone()));
                    rows.push(row);
                }
            }
            None => {
                let mut row = left_row.clone();
                row.extend(std::iter::repeat(None).take(right_value_idx.len()));
                rows.push(row);
            }
        }
    }

    // Right-only rows carry their key values into the left key positions
    for (right_idx, right_row) in right.rows().iter().enumerate() {
        if matched_right[right_idx] {
            continue;
        }
        let mut row: Vec<Cell> = vec![None; left.columns().len()];
        for (&left_idx, &key_idx) in left_keys.iter().zip(&right_keys) {
            row[left_idx] = right_row[key_idx].clone();
        }
        row.extend(right_value_idx.iter().map(|&idx| right_row[idx].clone()));
        rows.push(row);
    }

    Ok(Table::from_parts(columns, rows))
}
