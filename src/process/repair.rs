use tracing::debug;

/// The merge reads fields 4 through 6, so anything shorter cannot hold a
/// split income and is left alone.
const MIN_FIELDS: usize = 7;

/// Detect an income value that a stray delimiter split across fields 4 and
/// 5, merge the two fragments back into field 4, and shift the remaining
/// fields left by one. At most one merge per row.
///
/// Field 4 must be all digits once a leading `$` and surrounding whitespace
/// are removed, and field 5 must be all digits after trimming.
pub fn merge_split_income(rows: &mut [Vec<String>]) {
    let mut merged = 0usize;
    for row in rows.iter_mut() {
        if row.len() < MIN_FIELDS {
            continue;
        }
        if is_income_fragment(&row[4]) && is_digits(row[5].trim()) {
            let tail = row.remove(5);
            row[4].push_str(&tail);
            merged += 1;
        }
    }
    if merged > 0 {
        debug!(rows = merged, "merged split income fields");
    }
}

fn is_income_fragment(field: &str) -> bool {
    let trimmed = field.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    is_digits(trimmed.trim())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn merges_split_income() {
        let mut rows = vec![row(&["a", "b", "c", "d", "$1", "200", "e", "f"])];
        merge_split_income(&mut rows);
        assert_eq!(rows[0], row(&["a", "b", "c", "d", "$1200", "e", "f"]));
    }

    #[test]
    fn tolerates_whitespace_around_fragments() {
        let mut rows = vec![row(&["a", "b", "c", "d", " $1 ", " 200 ", "e", "f"])];
        merge_split_income(&mut rows);
        assert_eq!(rows[0][4], " $1  200 ");
        assert_eq!(rows[0].len(), 7);
    }

    #[test]
    fn leaves_intact_rows_alone() {
        let mut rows = vec![
            row(&["a", "b", "c", "d", "$1200", "e", "f"]),
            row(&["a", "b", "c", "d", "$1", "two hundred", "e", "f"]),
            row(&["a", "b", "c", "d", "", "200", "e", "f"]),
        ];
        let before = rows.clone();
        merge_split_income(&mut rows);
        assert_eq!(rows, before);
    }

    #[test]
    fn skips_rows_too_short_to_hold_the_split() {
        let mut rows = vec![row(&["a", "b", "c", "d", "$1", "200"])];
        let before = rows.clone();
        merge_split_income(&mut rows);
        assert_eq!(rows, before);
    }
}
