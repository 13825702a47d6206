//! Results table: one row per (subject, label) with named metric values.
//!
//! Mirrors the semicolon-separated evaluation tables written by common
//! segmentation-evaluation tooling: a SUBJECT column, a LABEL column, and
//! one numeric column per metric.
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub subject: String,
    pub label: String,
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Parse a separated-values text with a header line containing SUBJECT
    /// and LABEL; every other column is a numeric metric.
    pub fn from_csv_str(text: &str, separator: char) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or_else(|| {
            Error::Processing("results table is empty".to_string())
        })?;
        let columns: Vec<&str> = header.split(separator).map(str::trim).collect();
        let subject_idx = columns.iter().position(|&c| c == "SUBJECT").ok_or_else(|| {
            Error::Processing("results table is missing the SUBJECT column".to_string())
        })?;
        let label_idx = columns.iter().position(|&c| c == "LABEL").ok_or_else(|| {
            Error::Processing("results table is missing the LABEL column".to_string())
        })?;

        let mut table = Self::new();
        for (line_no, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(separator).map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(Error::Processing(format!(
                    "results table row {} has {} fields, expected {}",
                    line_no + 2,
                    fields.len(),
                    columns.len()
                )));
            }
            let mut metrics = BTreeMap::new();
            for (idx, &column) in columns.iter().enumerate() {
                if idx == subject_idx || idx == label_idx {
                    continue;
                }
                let value: f64 = fields[idx].parse().map_err(|_| {
                    Error::Processing(format!(
                        "results table row {}: column {} is not numeric: {:?}",
                        line_no + 2,
                        column,
                        fields[idx]
                    ))
                })?;
                metrics.insert(column.to_string(), value);
            }
            table.push(ResultRow {
                subject: fields[subject_idx].to_string(),
                label: fields[label_idx].to_string(),
                metrics,
            });
        }
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv_str(&text, ';')
    }

    /// Unique labels in first-seen order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.label) {
                labels.push(row.label.clone());
            }
        }
        labels
    }

    /// Metric names present in the table, sorted.
    pub fn metrics(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .flat_map(|r| r.metrics.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Metric values for one label.
    pub fn values(&self, label: &str, metric: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.label == label)
            .filter_map(|r| r.metrics.get(metric).copied())
            .collect()
    }

    /// Metric values across all labels.
    pub fn metric_values(&self, metric: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.metrics.get(metric).copied())
            .collect()
    }
}
