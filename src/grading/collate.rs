//! Display-name ordering
//!
//! Case-insensitive, accent-folded comparison for Spanish names: `Álvaro`
//! sorts with `Alvaro`, and `ñ` sorts after `n`.

use std::cmp::Ordering;

/// Fold one character to its collation base.
fn fold(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ç' | 'Ç' => 'c',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}

/// Primary sort weight of a character; `ñ` ranks between `n` and `o`.
fn weight(c: char) -> (u32, u32) {
    match fold(c) {
        'ñ' | 'Ñ' => ('n' as u32, 1),
        base => (base as u32, 0),
    }
}

/// Collation key for a display name
pub fn collation_key(name: &str) -> Vec<(u32, u32)> {
    name.trim().chars().map(weight).collect()
}

/// Locale-aware ascending comparison, total via raw-string tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| compare_names(a, b));
        v
    }

    #[test]
    fn test_case_and_accents() {
        assert_eq!(
            sorted(&["beto", "ana", "Carla", "Álvaro"]),
            vec!["Álvaro", "ana", "beto", "Carla"]
        );
    }

    #[test]
    fn test_enie_after_n() {
        assert_eq!(sorted(&["Oscar", "Ñusta", "Nora"]), vec!["Nora", "Ñusta", "Oscar"]);
        assert_eq!(sorted(&["Muñoz", "Munoz", "Muoz"]), vec!["Munoz", "Muñoz", "Muoz"]);
    }

    #[test]
    fn test_total_order_on_equal_keys() {
        assert_eq!(compare_names("Ana", "ana"), "Ana".cmp("ana"));
        assert_eq!(compare_names("Ana", "Ana"), Ordering::Equal);
    }
}
