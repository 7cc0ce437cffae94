// src/process/normalize.rs
use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

use super::{date_parser, RecordTable};

/// Sentinel written wherever a value cannot be recovered.
pub const UNKNOWN: &str = "unknown";

/// Spellings of the United States seen in the source data, each also with
/// the `\r` artifact that CRLF exports leave on the final column.
static USA_ALIASES: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for alias in [
        "United States",
        "us",
        " U.S.",
        "usa",
        "United States of America",
        "United states",
        "United Staes", // recurring upstream misspelling
        "US",
    ] {
        map.insert(alias.to_string(), "USA");
        map.insert(format!("{alias}\r"), "USA");
    }
    map.insert("USA\r".to_string(), "USA");
    map
});

/// Strip the `$` prefix, force two decimal places onto whole amounts, and
/// mark originally-empty amounts as unknown. The sentinel itself is skipped
/// so re-running the pass is a no-op.
pub fn clean_income(table: &mut RecordTable) -> Result<()> {
    for value in table.column_mut("Income")? {
        if *value == UNKNOWN {
            continue;
        }
        if value.starts_with('$') {
            value.remove(0);
        }
        if !value.contains('.') {
            value.push_str(".00");
        }
        if *value == ".00" {
            *value = UNKNOWN.to_string();
        }
    }
    Ok(())
}

/// Strip embedded newlines, then canonicalize USA aliases. Values matching
/// no alias pass through untouched.
pub fn clean_country(table: &mut RecordTable) -> Result<()> {
    let mut canonicalized = 0usize;
    for value in table.column_mut("Country")? {
        if value.contains('\n') {
            *value = value.replace('\n', "");
        }
        if let Some(canonical) = USA_ALIASES.get(value.as_str()) {
            *value = (*canonical).to_string();
            canonicalized += 1;
        }
    }
    debug!(values = canonicalized, "country aliases canonicalized");
    Ok(())
}

/// Title-case each name: the first letter of every alphabetic run is
/// uppercased and the rest lowercased; spacing and punctuation stay put.
pub fn clean_names(table: &mut RecordTable) -> Result<()> {
    for value in table.column_mut("Name")? {
        *value = title_case(value);
    }
    Ok(())
}

/// Standardize every date of birth to `YYYY-MM-DD`, reading ambiguous
/// numeric forms day-first. Unparseable values become the sentinel.
pub fn clean_birth_dates(table: &mut RecordTable) -> Result<()> {
    let mut unparsed = 0usize;
    for value in table.column_mut("Date of Birth")? {
        match date_parser::parse_day_first(value) {
            Some(date) => *value = date.format("%Y-%m-%d").to_string(),
            None => {
                unparsed += 1;
                *value = UNKNOWN.to_string();
            }
        }
    }
    if unparsed > 0 {
        debug!(values = unparsed, "unparseable birth dates marked unknown");
    }
    Ok(())
}

/// Ages stay opaque strings; only outright-missing values are marked.
pub fn clean_ages(table: &mut RecordTable) -> Result<()> {
    for value in table.column_mut("Age")? {
        if value.is_empty() {
            *value = UNKNOWN.to_string();
        }
    }
    Ok(())
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_column(name: &str, values: &[&str]) -> RecordTable {
        RecordTable {
            headers: vec![name.to_string()],
            rows: values.iter().map(|v| vec![v.to_string()]).collect(),
        }
    }

    fn column(table: &RecordTable) -> Vec<&str> {
        table.rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn income_gains_decimals_and_loses_dollar() -> Result<()> {
        let mut table = one_column("Income", &["$1200", "950.50", "$88.10", ""]);
        clean_income(&mut table)?;
        assert_eq!(column(&table), vec!["1200.00", "950.50", "88.10", "unknown"]);
        Ok(())
    }

    #[test]
    fn income_pass_is_idempotent() -> Result<()> {
        let mut table = one_column("Income", &["$1200", ""]);
        clean_income(&mut table)?;
        clean_income(&mut table)?;
        assert_eq!(column(&table), vec!["1200.00", "unknown"]);
        Ok(())
    }

    #[test]
    fn usa_aliases_canonicalize() -> Result<()> {
        let mut table = one_column(
            "Country",
            &[
                "United States",
                "us\r",
                " U.S.",
                "United Staes",
                "US\r\n",
                "USA",
                "Germany",
                "Germany\r",
            ],
        );
        clean_country(&mut table)?;
        assert_eq!(
            column(&table),
            vec!["USA", "USA", "USA", "USA", "USA", "USA", "Germany", "Germany\r"]
        );
        // already-clean output is stable
        let before = table.rows.clone();
        clean_country(&mut table)?;
        assert_eq!(table.rows, before);
        Ok(())
    }

    #[test]
    fn names_title_case() -> Result<()> {
        let mut table = one_column("Name", &["john doe", "JANE  SMITH", "o'brien", ""]);
        clean_names(&mut table)?;
        assert_eq!(column(&table), vec!["John Doe", "Jane  Smith", "O'Brien", ""]);
        Ok(())
    }

    #[test]
    fn birth_dates_standardize_day_first() -> Result<()> {
        let mut table = one_column(
            "Date of Birth",
            &["04/03/2020", "1985-12-01", "31.12.1999", "yesterday", ""],
        );
        clean_birth_dates(&mut table)?;
        assert_eq!(
            column(&table),
            vec!["2020-03-04", "1985-12-01", "1999-12-31", "unknown", "unknown"]
        );
        Ok(())
    }

    #[test]
    fn empty_ages_become_unknown() -> Result<()> {
        let mut table = one_column("Age", &["44", "", "unknown"]);
        clean_ages(&mut table)?;
        assert_eq!(column(&table), vec!["44", "unknown", "unknown"]);
        Ok(())
    }
}
