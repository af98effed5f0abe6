//! RSVP link slugs.

use crate::ids::random_hex;

/// Normalize text to `[a-z0-9_]`, collapsing runs of anything else into one
/// underscore and trimming underscores from both ends. May return an empty
/// string.
#[must_use]
pub fn slug_base(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Random fallback used when a name has no slug-able characters.
#[must_use]
pub fn random_slug() -> String {
    format!("invite_{}", random_hex(6))
}

/// Derive a slug from a display name, never returning an empty string.
#[must_use]
pub fn slugify(text: &str) -> String {
    let base = slug_base(text);
    if base.is_empty() { random_slug() } else { base }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("The Shoulson Family", "the_shoulson_family")]
    #[case("Alex & Jordan Rivera", "alex_jordan_rivera")]
    #[case("  __Riley--Morgan__ ", "riley_morgan")]
    #[case("Zoë Ñuñez", "zo_u_ez")]
    #[case("A1", "a1")]
    fn derives_expected_slug(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name), expected);
    }

    #[rstest]
    #[case("The Shoulson Family")]
    #[case("!!Wow!! ... such__slug")]
    #[case("ÄÖÜ mixed 42")]
    fn derived_slug_is_clean_and_idempotent(#[case] name: &str) {
        let slug = slugify(name);
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        );
        assert!(!slug.starts_with('_') && !slug.ends_with('_'));
        assert!(!slug.contains("__"));
        assert_eq!(slugify(&slug), slug);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("&&&")]
    fn empty_names_get_random_fallback(#[case] name: &str) {
        let slug = slugify(name);
        assert!(slug.starts_with("invite_"));
        assert!(slug.len() > "invite_".len());
    }
}
