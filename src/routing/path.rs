//! Path canonicalization and remainder tokenization.
//!
//! # Responsibilities
//! - Lexically clean request and route paths (`.`/`..`, duplicate slashes)
//! - Split the unmatched part of a path into `{id, action}` tokens
//!
//! # Design Decisions
//! - Purely lexical: the filesystem is never consulted
//! - A trailing slash survives cleaning unless the result is the root
//! - Only the first two remainder segments are significant; deeper nesting
//!   is not supported and extra segments are ignored

/// Returns the canonical form of `path`.
///
/// The result always begins with `/`, contains no empty, `.` or `..`
/// segments, and ends with `/` only when the input did and the cleaned
/// path is not the root.
pub fn canonicalize(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // `..` at the root stays at the root.
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }

    if cleaned.is_empty() {
        cleaned.push('/');
    } else if path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

/// Tokens parsed from the part of a path left after the matched prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTokens {
    /// First segment, usually a record id.
    pub id: String,
    /// Second segment, usually a custom action word.
    pub action: String,
}

/// Splits a path remainder such as `/10/edit/` into `{id: "10", action: "edit"}`.
pub fn split_remainder(remainder: &str) -> PathTokens {
    let trimmed = remainder.strip_prefix('/').unwrap_or(remainder);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let mut segments = trimmed.split('/');
    PathTokens {
        id: segments.next().unwrap_or_default().to_string(),
        action: segments.next().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_clean_paths_unchanged() {
        assert_eq!(canonicalize("/"), "/");
        assert_eq!(canonicalize("/pages"), "/pages");
        assert_eq!(canonicalize("/pages/"), "/pages/");
        assert_eq!(canonicalize("/api/v1/pages/10"), "/api/v1/pages/10");
    }

    #[test]
    fn test_canonicalize_rewrites() {
        assert_eq!(canonicalize(""), "/");
        assert_eq!(canonicalize("pages"), "/pages");
        assert_eq!(canonicalize("//pages"), "/pages");
        assert_eq!(canonicalize("/api//pages2"), "/api/pages2");
        assert_eq!(canonicalize("/a/./b"), "/a/b");
        assert_eq!(canonicalize("/a/b/.."), "/a");
        assert_eq!(canonicalize("/a/b/../"), "/a/");
        assert_eq!(canonicalize("/a/."), "/a");
    }

    #[test]
    fn test_canonicalize_never_escapes_root() {
        assert_eq!(canonicalize("/.."), "/");
        assert_eq!(canonicalize("/../../etc"), "/etc");
        assert_eq!(canonicalize("/a/../"), "/");
    }

    #[test]
    fn test_split_remainder() {
        assert_eq!(split_remainder(""), PathTokens::default());
        assert_eq!(split_remainder("/"), PathTokens::default());

        let tokens = split_remainder("/10");
        assert_eq!(tokens.id, "10");
        assert_eq!(tokens.action, "");

        let tokens = split_remainder("/10/edit/");
        assert_eq!(tokens.id, "10");
        assert_eq!(tokens.action, "edit");

        let tokens = split_remainder("10/edit");
        assert_eq!(tokens.id, "10");
        assert_eq!(tokens.action, "edit");
    }

    #[test]
    fn test_split_remainder_ignores_deeper_segments() {
        let tokens = split_remainder("/10/edit/extra/more");
        assert_eq!(tokens.id, "10");
        assert_eq!(tokens.action, "edit");
    }
}
