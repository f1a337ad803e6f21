// src/utils.rs
use crate::types::ScanError;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

fn domain_regex() -> &'static Regex {
    static DOMAIN_RE: OnceLock<Regex> = OnceLock::new();
    DOMAIN_RE.get_or_init(|| {
        Regex::new(r"^(?:[a-zA-Z0-9-]{1,63}\.)+[a-zA-Z]{2,}$").expect("domain pattern is valid")
    })
}

/// Reads lines from a file into a vector of strings.
pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Check if a string is a valid target domain.
///
/// One or more labels of 1-63 alphanumerics or hyphens, none starting with a
/// hyphen, followed by an alphabetic top-level label of at least two chars.
pub fn is_valid_domain(domain: &str) -> bool {
    if !domain_regex().is_match(domain) {
        return false;
    }

    !domain.split('.').any(|label| label.starts_with('-'))
}

pub fn validate_domain(domain: &str) -> Result<(), ScanError> {
    if is_valid_domain(domain) {
        Ok(())
    } else {
        Err(ScanError::InvalidDomain(domain.to_string()))
    }
}

/// Join a wordlist prefix with the target domain.
pub fn fqdn(prefix: &str, domain: &str) -> String {
    format!("{}.{}", prefix, domain)
}
