use regex::Regex;
use std::sync::OnceLock;

use crate::errors::CommandError;

/// Characters the game uses in player tags
const TAG_PATTERN: &str = r"^[0289PYLQGRJCUV]{3,12}$";

fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(TAG_PATTERN).expect("tag pattern is valid"))
}

/// Canonical form of a player tag: uppercase, without the leading `#`
///
/// The letter `O` is read as the digit `0`, as players often type it that way.
pub fn normalize_tag(input: &str) -> Result<String, CommandError> {
    let tag: String = input
        .trim()
        .trim_start_matches('#')
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            upper => upper,
        })
        .collect();

    if tag_regex().is_match(&tag) {
        Ok(tag)
    } else {
        Err(CommandError::InvalidTag(input.trim().to_string()))
    }
}

/// Tag as shown to users, with its `#`
pub fn display_tag(tag: &str) -> String {
    format!("#{tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_hash_and_uppercases() {
        assert_eq!(normalize_tag("#2pp9lq").unwrap(), "2PP9LQ");
        assert_eq!(normalize_tag("  9YCQ2  ").unwrap(), "9YCQ2");
    }

    #[test]
    fn test_letter_o_becomes_zero() {
        assert_eq!(normalize_tag("#Y2o8").unwrap(), "Y208");
    }

    #[test]
    fn test_invalid_tags_are_refused() {
        assert_eq!(
            normalize_tag("#ABC"),
            Err(CommandError::InvalidTag("#ABC".to_string()))
        );
        assert!(normalize_tag("").is_err());
        assert!(normalize_tag("#2P").is_err());
    }

    #[test]
    fn test_display_tag() {
        assert_eq!(display_tag("2PP"), "#2PP");
    }
}
