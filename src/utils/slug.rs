use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// URL slug for a display name: lowercase, every run of non-alphanumerics
/// collapsed into one hyphen, no leading/trailing hyphen.
pub fn generate_slug(input: &str) -> String {
    let lower = input.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_slug;

    #[test]
    fn test_basic() {
        assert_eq!(generate_slug("Dr. Jane O'Brien"), "dr-jane-o-brien");
        assert_eq!(generate_slug("Rust Mentor 2024"), "rust-mentor-2024");
    }

    #[test]
    fn test_leading_trailing_and_runs() {
        assert_eq!(generate_slug("  --Hello,   World!!  "), "hello-world");
        assert_eq!(generate_slug("a__b..c"), "a-b-c");
    }

    #[test]
    fn test_empty_and_symbols_only() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
    }
}
