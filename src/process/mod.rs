// src/process/mod.rs
use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

pub mod date_parser;
pub mod email;
pub mod normalize;
pub mod repair;

/// An employee table parsed from one delimited export file.
#[derive(Debug)]
pub struct RecordTable {
    /// Column names from the first line, stripped of line-ending artifacts.
    pub headers: Vec<String>,
    /// Each data line, as a Vec of Strings (one per field).
    pub rows: Vec<Vec<String>>,
}

/// Split raw file text into rows: one row per line, fields split literally
/// on `,`. The export carries no quoting, so this is not RFC-4180 parsing.
/// Line terminators stay attached to each line's final field so that stray
/// `\r` artifacts remain visible to the cleaning passes.
pub fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.split_inclusive('\n')
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

impl RecordTable {
    /// Build a table from raw rows. The first row becomes the header, with
    /// all `\r`/`\n` stripped from each name so upstream variants like
    /// `"Country\n"` and `"Country\r\n"` collapse into one column.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            bail!("input file contained no rows");
        }
        let headers: Vec<String> = rows
            .remove(0)
            .into_iter()
            .map(|name| name.replace(['\r', '\n'], ""))
            .collect();

        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() > headers.len() {
                bail!(
                    "row {} has {} fields but the header has {}",
                    i + 1,
                    row.len(),
                    headers.len()
                );
            }
            if row.len() < headers.len() {
                warn!(
                    row = i + 1,
                    fields = row.len(),
                    expected = headers.len(),
                    "padding short row"
                );
                row.resize(headers.len(), String::new());
            }
        }

        debug!(columns = headers.len(), rows = rows.len(), "table built");
        Ok(Self { headers, rows })
    }

    /// Index of the named column. The cleaning passes each require their
    /// column, so a miss is an error rather than a skip.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("column {:?} not found in header {:?}", name, self.headers))
    }

    /// Mutable references to every value in the named column, in row order.
    pub fn column_mut(&mut self, name: &str) -> Result<Vec<&mut String>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter_mut().map(|row| &mut row[idx]).collect())
    }

    /// Serialize back to comma-joined text with the header first. No
    /// quoting; a newline is appended only when the row's final field does
    /// not already carry one.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.headers);
        for row in &self.rows {
            push_line(&mut out, row);
        }
        out
    }
}

fn push_line(out: &mut String, fields: &[String]) {
    out.push_str(&fields.join(","));
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Run every column pass in the fixed pipeline order.
pub fn clean_table(table: &mut RecordTable) -> Result<()> {
    normalize::clean_income(table)?;
    normalize::clean_country(table)?;
    normalize::clean_names(table)?;
    email::clean_emails(table)?;
    normalize::clean_birth_dates(table)?;
    normalize::clean_ages(table)?;
    Ok(())
}
