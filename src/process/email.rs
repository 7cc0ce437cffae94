// src/process/email.rs
use anyhow::Result;
use tracing::debug;

use super::{normalize::UNKNOWN, RecordTable};

/// The domain part of one address, split into labels. A trailing `.` is an
/// empty trailing label and is recorded separately from the real labels.
struct Domain {
    labels: Vec<String>,
    trailing_dot: bool,
}

impl Domain {
    fn parse(value: &str) -> Self {
        let domain = match value.rfind('@') {
            Some(at) => &value[at + 1..],
            None => value,
        };
        let trailing_dot = domain.ends_with('.');
        let stem = if trailing_dot {
            &domain[..domain.len() - 1]
        } else {
            domain
        };
        Domain {
            labels: stem.split('.').map(str::to_string).collect(),
            trailing_dot,
        }
    }

    /// At most one label ahead of the top-level suffix: `foo.com`, a bare
    /// label, or an empty domain.
    fn lacks_subdomain(&self) -> bool {
        self.labels.len() <= 2
    }

    /// The label the domain hangs off: the one just before the suffix, or
    /// the sole label.
    fn base_label(&self) -> &str {
        if self.labels.len() >= 2 {
            &self.labels[self.labels.len() - 2]
        } else {
            &self.labels[0]
        }
    }

    /// For fully-qualified addresses on `base`, the label immediately left
    /// of the base.
    fn subdomain_for(&self, base: &str) -> Option<&str> {
        let n = self.labels.len();
        if n >= 3 && self.labels[n - 2] == base {
            Some(&self.labels[n - 3])
        } else {
            None
        }
    }

    /// Rebuild the full address with `sub` inserted ahead of the base label.
    fn insert_subdomain(&self, value: &str, sub: &str) -> String {
        let base_idx = self.labels.len().saturating_sub(2);
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.insert(base_idx, sub);
        let mut domain = labels.join(".");
        if self.trailing_dot {
            domain.push('.');
        }
        match value.rfind('@') {
            Some(at) => format!("{}@{}", &value[..at], domain),
            None => domain,
        }
    }
}

/// Clean the Email column: trim, collapse doubled `@`s, infer missing
/// subdomains from sibling addresses on the same base domain, and mark
/// addresses that reduce to a bare `.com` as unknown.
pub fn clean_emails(table: &mut RecordTable) -> Result<()> {
    let mut column = table.column_mut("Email")?;

    for value in column.iter_mut() {
        let cleaned = value.trim().replace("@@", "@");
        **value = cleaned;
    }

    infer_subdomains(&mut column);

    for value in column.iter_mut() {
        if value.as_str() == ".com" {
            **value = UNKNOWN.to_string();
        }
    }
    Ok(())
}

/// Fill in subdomains for addresses that lack one, learning the most common
/// subdomain used with the same base domain elsewhere in the column. The
/// analysis runs over a single snapshot; fills never feed back into it.
fn infer_subdomains(column: &mut [&mut String]) {
    let domains: Vec<Domain> = column.iter().map(|v| Domain::parse(v.as_str())).collect();

    // base labels that appear without a subdomain, in encounter order
    let mut bases: Vec<&str> = Vec::new();
    for d in &domains {
        if d.lacks_subdomain() {
            let base = d.base_label();
            if !bases.contains(&base) {
                bases.push(base);
            }
        }
    }

    for base in bases {
        // tally candidates in first-encounter order; only a strictly higher
        // count displaces the running winner, which is the tie-break
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for d in &domains {
            if let Some(sub) = d.subdomain_for(base) {
                match tally.iter_mut().find(|(s, _)| *s == sub) {
                    Some((_, n)) => *n += 1,
                    None => tally.push((sub, 1)),
                }
            }
        }
        let mut winner: Option<&str> = None;
        let mut best = 0usize;
        for &(sub, n) in &tally {
            if n > best {
                best = n;
                winner = Some(sub);
            }
        }

        match winner {
            Some(sub) => {
                debug!(base, subdomain = sub, "inferred subdomain");
                for (value, d) in column.iter_mut().zip(&domains) {
                    if d.lacks_subdomain() && d.base_label() == base {
                        **value = d.insert_subdomain(value.as_str(), sub);
                    }
                }
            }
            None => {
                // nothing to learn from: suffix-less domains default to .com
                for (value, d) in column.iter_mut().zip(&domains) {
                    if d.lacks_subdomain() && d.base_label() == base && d.labels.len() == 1 {
                        if value.ends_with('.') {
                            value.push_str("com");
                        } else {
                            value.push_str(".com");
                        }
                    }
                }
            }
        }
    }
}
