// core/table.rs
// Header-indexed CSV tables and the two record layouts the figures consume.

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use crate::error::{FigureError, Result};

/// A rectangular CSV table: one header row, every data row the same width.
#[derive(Clone, Debug)]
pub struct Table {
    columns: Vec<String>,
    col_idx: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    // 1-based source line of each row, for error messages.
    lines: Vec<usize>,
}

impl Table {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_to_string(path).map_err(|e| FigureError::file(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());
        let (_, header) = lines
            .next()
            .ok_or_else(|| FigureError::parse(1, "empty CSV"))?;
        let header = header.trim_start_matches('\u{feff}');
        let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

        let mut col_idx = HashMap::new();
        for (i, name) in columns.iter().enumerate() {
            // pandas writes an unnamed index column; it may be left blank.
            if name.is_empty() {
                continue;
            }
            if col_idx.insert(name.clone(), i).is_some() {
                return Err(FigureError::parse(1, format!("duplicate column `{name}`")));
            }
        }

        let mut rows = Vec::new();
        let mut line_numbers = Vec::new();
        for (line_no, line) in lines {
            let cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            if cells.len() != columns.len() {
                return Err(FigureError::parse(
                    line_no + 1,
                    format!("expected {} fields, found {}", columns.len(), cells.len()),
                ));
            }
            rows.push(cells);
            line_numbers.push(line_no + 1);
        }

        Ok(Self {
            columns,
            col_idx,
            rows,
            lines: line_numbers,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.col_idx
            .get(name)
            .copied()
            .ok_or_else(|| FigureError::parse(1, format!("missing required column `{name}`")))
    }

    pub fn column_str(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.index_of(name)?;
        Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
    }

    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.index_of(name)?;
        self.rows
            .iter()
            .zip(&self.lines)
            .map(|(row, &line)| {
                let cell = &row[idx];
                let v = cell
                    .parse::<f64>()
                    .map_err(|e| FigureError::parse(line, format!("invalid {name} `{cell}`: {e}")))?;
                if v.is_finite() {
                    Ok(v)
                } else {
                    Err(FigureError::parse(line, format!("non-finite {name}")))
                }
            })
            .collect()
    }

    pub fn column_u16(&self, name: &str) -> Result<Vec<u16>> {
        let idx = self.index_of(name)?;
        self.rows
            .iter()
            .zip(&self.lines)
            .map(|(row, &line)| {
                let cell = &row[idx];
                cell.parse::<u16>()
                    .map_err(|e| FigureError::parse(line, format!("invalid {name} `{cell}`: {e}")))
            })
            .collect()
    }
}

/// One row of the method comparison table: distortion under each method.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComparisonRecord {
    pub dist1: f64,
    pub dist2: f64,
}

/// One row of the structure-pair table.
#[derive(Clone, Debug, PartialEq)]
pub struct StructurePair {
    pub formula: String,
    /// Energy difference, eV/atom.
    pub de: f64,
    /// Atomic distortion, Å.
    pub dist: f64,
    pub spg1: u16,
    pub spg2: u16,
}

pub fn comparisons_from_table(table: &Table) -> Result<Vec<ComparisonRecord>> {
    let dist1 = table.column_f64("dist1")?;
    let dist2 = table.column_f64("dist2")?;
    Ok(dist1
        .into_iter()
        .zip(dist2)
        .map(|(dist1, dist2)| ComparisonRecord { dist1, dist2 })
        .collect())
}

pub fn structure_pairs_from_table(table: &Table) -> Result<Vec<StructurePair>> {
    let formula = table.column_str("formula")?;
    let de = table.column_f64("de")?;
    let dist = table.column_f64("dist")?;
    let spg1 = table.column_u16("spg1")?;
    let spg2 = table.column_u16("spg2")?;
    let mut out = Vec::with_capacity(table.n_rows());
    for i in 0..table.n_rows() {
        out.push(StructurePair {
            formula: formula[i].clone(),
            de: de[i],
            dist: dist[i],
            spg1: spg1[i],
            spg2: spg2[i],
        });
    }
    Ok(out)
}

pub fn load_comparisons(path: impl AsRef<Path>) -> Result<Vec<ComparisonRecord>> {
    comparisons_from_table(&Table::load(path)?)
}

pub fn load_structure_pairs(path: impl AsRef<Path>) -> Result<Vec<StructurePair>> {
    structure_pairs_from_table(&Table::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = Table::parse("dist1,dist2\n0.1,0.2\n\n1.5, 1.4\n").unwrap();
        assert_eq!(table.columns(), &["dist1".to_string(), "dist2".to_string()]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_f64("dist2").unwrap(), vec![0.2, 1.4]);
    }

    #[test]
    fn ragged_row_reports_line() {
        let err = Table::parse("a,b\n1,2\n3\n").unwrap_err();
        match err {
            FigureError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_parse_error() {
        let table = Table::parse("a,b\n1,2\n").unwrap();
        assert!(matches!(
            table.column_f64("dist1"),
            Err(FigureError::Parse { .. })
        ));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let table = Table::parse("de\nabc\n").unwrap();
        assert!(matches!(table.column_f64("de"), Err(FigureError::Parse { line: 2, .. })));
    }

    #[test]
    fn empty_text_is_parse_error() {
        assert!(matches!(Table::parse("\n  \n"), Err(FigureError::Parse { .. })));
    }

    #[test]
    fn pandas_index_column_is_tolerated() {
        let text = ",formula,de,dist,spg1,spg2\n0,NaCl,0.01,0.3,225,221\n";
        let pairs = structure_pairs_from_table(&Table::parse(text).unwrap()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].formula, "NaCl");
        assert_eq!(pairs[0].spg1, 225);
        assert_eq!(pairs[0].spg2, 221);
    }

    #[test]
    fn missing_file_is_file_error() {
        let err = Table::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, FigureError::File { .. }));
    }
}
