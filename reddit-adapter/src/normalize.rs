//! Canonical forms for user-supplied Reddit identifiers.
//!
//! Both functions are idempotent: normalising a normalised value returns
//! it unchanged.

use reddit_types::ToolError;

/// Canonical subreddit name.
///
/// Removes all whitespace, then any leading `/r/` or `r/` prefixes. Case
/// is kept as given; Reddit resolves names case-insensitively.
#[must_use]
pub fn normalize_subreddit(input: &str) -> String {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut name = compact.as_str();
    while let Some(rest) = name.strip_prefix("/r/").or_else(|| name.strip_prefix("r/")) {
        name = rest;
    }
    name.to_string()
}

/// Canonical post id: whitespace removed, leading `t3_` prefixes stripped.
#[must_use]
pub fn normalize_post_id(input: &str) -> String {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut id = compact.as_str();
    while let Some(rest) = id.strip_prefix("t3_") {
        id = rest;
    }
    id.to_string()
}

fn is_identifier(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Normalise a subreddit argument and reject names Reddit cannot have.
pub(crate) fn subreddit_name(input: &str) -> Result<String, ToolError> {
    let name = normalize_subreddit(input);
    if name.is_empty() {
        return Err(ToolError::missing_argument("subreddit name is empty"));
    }
    if !is_identifier(&name) {
        return Err(ToolError::not_found(format!("no such subreddit: {name}")));
    }
    Ok(name)
}

/// Normalise a post id argument and reject ids Reddit cannot have.
pub(crate) fn post_id(input: &str) -> Result<String, ToolError> {
    let id = normalize_post_id(input);
    if id.is_empty() {
        return Err(ToolError::missing_argument("post id is empty"));
    }
    if !is_identifier(&id) {
        return Err(ToolError::not_found(format!("no such post: {id}")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reddit_types::ErrorKind;

    #[test]
    fn strips_prefixes_and_whitespace() {
        assert_eq!(normalize_subreddit("r/ python "), "python");
        assert_eq!(normalize_subreddit("/r/rust"), "rust");
        assert_eq!(normalize_subreddit("  PYTHON "), "PYTHON");
        assert_eq!(normalize_subreddit("ask science"), "askscience");
        assert_eq!(normalize_post_id(" t3_abc123"), "abc123");
    }

    #[test]
    fn repeated_prefixes_are_stripped() {
        assert_eq!(normalize_subreddit("r/ r/rust"), "rust");
        assert_eq!(normalize_subreddit("/r/r/rust"), "rust");
        assert_eq!(normalize_post_id("t3_t3_x"), "x");
    }

    #[test]
    fn idempotent() {
        for input in ["python", "r/ python", "/r/Rust", " a b c ", "r/", "r / r/x", "/ r/x"] {
            let once = normalize_subreddit(input);
            assert_eq!(normalize_subreddit(&once), once, "{input:?}");
        }
        for input in ["t3_abc", "abc", " t3_ x", "t 3_x"] {
            let once = normalize_post_id(input);
            assert_eq!(normalize_post_id(&once), once, "{input:?}");
        }
    }

    #[test]
    fn empty_after_normalising_is_missing() {
        assert_eq!(subreddit_name("r/ ").unwrap_err().kind, ErrorKind::MissingArgument);
        assert_eq!(post_id("t3_").unwrap_err().kind, ErrorKind::MissingArgument);
    }

    #[test]
    fn impossible_names_are_not_found() {
        assert_eq!(subreddit_name("py?thon").unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(post_id("../etc").unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(subreddit_name("r/ask_science").unwrap(), "ask_science");
    }
}
