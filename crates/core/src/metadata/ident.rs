use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_ID_LENGTH: usize = 2;
pub const MAX_ID_LENGTH: usize = 64;

static VALID_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z][a-z0-9_-]{1,63}$").expect("mod id pattern"));

/// Check a mod id (or `provides` alias) against the identifier grammar.
///
/// Returns one entry per violated rule, phrased to follow "it ..." in the
/// final diagnostic, so a multi-violation identifier yields a multi-line
/// report instead of stopping at the first problem.
pub fn validate_id(id: &str) -> Vec<String> {
    if VALID_ID.is_match(id) {
        return Vec::new();
    }

    if id.is_empty() {
        return vec!["is empty".to_string()];
    }

    let mut violations = Vec::new();

    if id.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("contains uppercase characters".to_string());
    }

    let mut reported = Vec::new();
    for c in id.chars() {
        let valid = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
        if !valid && !c.is_ascii_uppercase() && !reported.contains(&c) {
            reported.push(c);
            violations.push(format!("contains invalid character '{c}'"));
        }
    }

    if let Some(first) = id.chars().next() {
        if !first.is_ascii_lowercase() {
            violations.push(format!("begins with an invalid character '{first}'"));
        }
    }

    if id.chars().count() < MIN_ID_LENGTH {
        violations.push(format!(
            "is too short (the minimum length is {MIN_ID_LENGTH} characters)"
        ));
    } else if id.chars().count() > MAX_ID_LENGTH {
        violations.push(format!(
            "exceeds the maximum length of {MAX_ID_LENGTH} characters"
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_ids() {
        assert!(validate_id("examplemod").is_empty());
        assert!(validate_id("mod_2-extra").is_empty());
        assert!(validate_id("ab").is_empty());
    }

    #[test]
    fn empty_id_is_a_single_violation() {
        assert_eq!(validate_id(""), vec!["is empty".to_string()]);
    }

    #[test]
    fn enumerates_every_violated_rule() {
        let violations = validate_id("My Mod");
        assert!(violations.contains(&"contains uppercase characters".to_string()));
        assert!(violations.contains(&"contains invalid character ' '".to_string()));
        assert!(
            violations
                .iter()
                .any(|v| v.starts_with("begins with an invalid character")),
            "{violations:?}"
        );
        assert!(violations.len() >= 3);
    }

    #[test]
    fn repeated_invalid_characters_are_reported_once() {
        let violations = validate_id("a!b!c");
        assert_eq!(
            violations
                .iter()
                .filter(|v| v.contains("invalid character '!'"))
                .count(),
            1
        );
    }

    #[test]
    fn length_bounds_are_enforced() {
        assert!(
            validate_id("a")
                .iter()
                .any(|v| v.contains("too short"))
        );
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(
            validate_id(&long)
                .iter()
                .any(|v| v.contains("maximum length"))
        );
    }

    #[test]
    fn digit_start_is_rejected_without_an_invalid_character_entry() {
        let violations = validate_id("1mod");
        assert!(
            violations
                .iter()
                .any(|v| v.contains("begins with an invalid character '1'"))
        );
        assert!(!violations.iter().any(|v| v.starts_with("contains")));
    }
}
