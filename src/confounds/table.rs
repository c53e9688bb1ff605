//! Tab-separated confound table (fMRIPrep `desc-confounds_timeseries.tsv`).
//!
//! Header row = column names, one row per volume. Missing cells (`""`,
//! `n/a`, `NaN`, …) are filled with zero, matching `read_csv(...).fillna(0)`.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DenoiseError, Result};

/// Column-major confound table: `columns[k][t]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl ConfoundTable {
    /// Read a TSV file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| DenoiseError::io(path, e))?;
        Self::from_reader(file)
    }

    /// Parse TSV text from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let names: Vec<String> = rdr
            .headers()
            .map_err(|e| DenoiseError::Confounds(format!("reading header row: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if names.iter().all(String::is_empty) {
            return Err(DenoiseError::Confounds("empty header row".into()));
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for (row_no, record) in rdr.records().enumerate() {
            // Row numbers in messages are 1-based data rows (header excluded).
            let record = record
                .map_err(|e| DenoiseError::Confounds(format!("row {}: {e}", row_no + 1)))?;
            for (k, cell) in record.iter().enumerate() {
                let v = parse_cell(cell).ok_or_else(|| {
                    DenoiseError::Confounds(format!(
                        "row {}, column '{}': cannot parse {cell:?} as a number",
                        row_no + 1,
                        names[k]
                    ))
                })?;
                columns[k].push(v);
            }
        }
        let n_rows = columns.first().map_or(0, Vec::len);
        Ok(Self { names, columns, n_rows })
    }

    /// Build a table from `(name, values)` pairs. NaN values become zero.
    pub fn from_columns<S: Into<String>>(cols: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let n_rows = cols.first().map_or(0, |(_, v)| v.len());
        let mut names = Vec::with_capacity(cols.len());
        let mut columns = Vec::with_capacity(cols.len());
        for (name, mut values) in cols {
            let name = name.into();
            if values.len() != n_rows {
                return Err(DenoiseError::Confounds(format!(
                    "column '{name}' has {} rows, expected {n_rows}",
                    values.len()
                )));
            }
            values.iter_mut().filter(|v| !v.is_finite()).for_each(|v| *v = 0.0);
            names.push(name);
            columns.push(values);
        }
        Ok(Self { names, columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|k| self.columns[k].as_slice())
    }

    /// Return a copy of the table with one indicator column
    /// `custom_spike_<i>` per frame: `1.0` at row `i`, zero elsewhere (all
    /// zero when `i` is past the end). Existing columns are kept as is.
    pub fn with_synthetic_spikes(&self, frames: &[usize]) -> Self {
        let mut out = self.clone();
        for &i in frames {
            let name = spike_column_name(i);
            if out.contains(&name) {
                continue;
            }
            let mut reg = vec![0.0; self.n_rows];
            if let Some(v) = reg.get_mut(i) {
                *v = 1.0;
            }
            out.names.push(name);
            out.columns.push(reg);
        }
        out
    }
}

pub fn spike_column_name(frame: usize) -> String {
    format!("custom_spike_{frame}")
}

/// Parse one TSV cell; missing markers and non-finite values map to `0.0`.
fn parse_cell(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("n/a") || s.eq_ignore_ascii_case("na") {
        return Some(0.0);
    }
    let v: f64 = s.parse().ok()?;
    Some(if v.is_finite() { v } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "trans_x\trot_x\tcsf\n0.1\tn/a\t3\n\t0.5\tNaN\n-0.2\t1e-3\t4.5\n";

    #[test]
    fn missing_cells_become_zero() {
        let t = ConfoundTable::from_reader(TSV.as_bytes()).unwrap();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.column_names(), ["trans_x", "rot_x", "csf"]);
        assert_eq!(t.column("trans_x").unwrap(), &[0.1, 0.0, -0.2]);
        assert_eq!(t.column("rot_x").unwrap(), &[0.0, 0.5, 1e-3]);
        assert_eq!(t.column("csf").unwrap(), &[3.0, 0.0, 4.5]);
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = ConfoundTable::from_reader("a\tb\n1\t2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DenoiseError::Confounds(_)), "{err}");
    }

    #[test]
    fn garbage_cell_cites_row_and_column() {
        let err = ConfoundTable::from_reader("a\tb\n1\t2\n3\tabc\n".as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2") && msg.contains("'b'"), "{msg}");
    }

    #[test]
    fn synthetic_spikes_are_indicators() {
        let t = ConfoundTable::from_columns(vec![("csf", vec![0.0; 5])]).unwrap();
        let s = t.with_synthetic_spikes(&[1, 3, 9]);
        assert_eq!(s.n_columns(), 4);
        assert_eq!(s.column("custom_spike_1").unwrap(), &[0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(s.column("custom_spike_3").unwrap(), &[0.0, 0.0, 0.0, 1.0, 0.0]);
        // Out of range frame: all-zero column.
        assert!(s.column("custom_spike_9").unwrap().iter().all(|&v| v == 0.0));
        // Input untouched.
        assert_eq!(t.n_columns(), 1);
    }

    #[test]
    fn from_columns_checks_lengths() {
        let err = ConfoundTable::from_columns(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(err.is_err());
    }
}
