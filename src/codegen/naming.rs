use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// Turns column names into distinct identifiers. Invalid characters become
/// `_`, a leading digit gets a `_` prefix, an empty name becomes
/// `_<position>`, and repeats get `_2`, `_3`, ... appended.
pub fn normalize_field_names(names: &[&str]) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let base = normalize_one(name, position);
            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

fn normalize_one(name: &str, position: usize) -> String {
    if name.is_empty() {
        return format!("_{}", position);
    }
    let cleaned = INVALID_CHARS.replace_all(name, "_");
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", cleaned)
    } else {
        cleaned.into_owned()
    }
}

/// First `prefix1`, `prefix2`, ... for which `is_taken` is false.
pub fn unique_name(prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    (1..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| prefix.to_string())
}
