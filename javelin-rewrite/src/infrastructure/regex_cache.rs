//! Compiled rule patterns
//!
//! Catalog patterns are compiled once and shared by every scan, pass and
//! preview for the life of the process.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::RwLock;

static REGEX_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Patterns are compiled in multi-line mode so `^` and `$` anchor per line.
pub fn get_regex(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(existing) = REGEX_CACHE
        .read()
        .ok()
        .and_then(|guard| guard.get(pattern).cloned())
    {
        return Ok(existing);
    }

    let compiled = RegexBuilder::new(pattern).multi_line(true).build()?;
    if let Ok(mut guard) = REGEX_CACHE.write() {
        guard
            .entry(pattern.to_string())
            .or_insert_with(|| compiled.clone());
    }

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_regex_is_reused() {
        let a = get_regex(r"new Integer\s*\(").unwrap();
        let b = get_regex(r"new Integer\s*\(").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        assert!(get_regex("(unclosed").is_err());
    }
}
