//! Segment classification for directory-naming conventions.
//!
//! Pure functional parsing of directory segment names into typed segments.
//! All functions are **pure**: same input → same output, no side effects.

/// A compiled route segment.
///
/// Functional sum type: every directory segment that survives compilation
/// becomes exactly one of these variants. Display strings are rendered from
/// this union at the boundary (canonical pattern, transport registration,
/// route listing) and never parsed back.
///
/// # Examples
///
/// ```
/// use virgule_router::route::segment::{classify_segment, Segment};
///
/// // Static segment
/// assert_eq!(classify_segment("users"), Segment::Literal("users".into()));
///
/// // Dynamic parameter
/// assert_eq!(classify_segment("[id]"), Segment::Param("id".into()));
///
/// // Catch-all
/// assert_eq!(classify_segment("[...slug]"), Segment::CatchAll("slug".into()));
///
/// // Optional catch-all
/// assert_eq!(
///     classify_segment("[[...rest]]"),
///     Segment::OptionalCatchAll("rest".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Static text segment: `users`
    Literal(String),
    /// Dynamic parameter: `[id]`
    Param(String),
    /// Catch-all parameter: `[...slug]`
    CatchAll(String),
    /// Optional catch-all parameter: `[[...slug]]`
    OptionalCatchAll(String),
}

impl Segment {
    /// Parameter name carried by this segment, if any.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name)
            | Segment::CatchAll(name)
            | Segment::OptionalCatchAll(name) => Some(name),
        }
    }

    /// Whether this segment captures one or more trailing path segments.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_) | Segment::OptionalCatchAll(_))
    }
}

/// Classifies a directory segment into a typed route segment (pure function).
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Optional catch-all**: `[[...name]]`
/// 2. **Catch-all**: `[...name]`
/// 3. **Dynamic param**: `[name]`
/// 4. **Static**: any other text
///
/// Route groups `(name)` never reach this function; callers strip them
/// before classification (see [`is_group_segment`]).
pub fn classify_segment(segment: &str) -> Segment {
    // Optional catch-all: [[...name]] (double brackets)
    if let Some(inner) = segment
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
    {
        if let Some(name) = inner.strip_prefix("...") {
            return Segment::OptionalCatchAll(name.to_string());
        }
    }

    match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => {
            if let Some(name) = inner.strip_prefix("...") {
                Segment::CatchAll(name.to_string())
            } else {
                Segment::Param(inner.to_string())
            }
        }
        None => Segment::Literal(segment.to_string()),
    }
}

/// Whether a directory segment is a route group: `(name)`.
///
/// Groups organize the tree on disk but are dropped from the URL entirely.
///
/// ```
/// use virgule_router::route::segment::is_group_segment;
///
/// assert!(is_group_segment("(admin)"));
/// assert!(!is_group_segment("admin"));
/// assert!(!is_group_segment("[id]"));
/// ```
pub fn is_group_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('(') && segment.ends_with(')')
}

/// Whether a directory segment carries routing syntax (bracket or paren
/// tokens). Private-folder filtering exempts these: `[_id]` is a parameter
/// named `_id`, not a private folder.
pub fn is_convention_token(segment: &str) -> bool {
    segment.starts_with('[') || is_group_segment(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_literal() {
        assert_eq!(classify_segment("about"), Segment::Literal("about".into()));
    }

    #[test]
    fn test_classify_param() {
        assert_eq!(classify_segment("[id]"), Segment::Param("id".into()));
    }

    #[test]
    fn test_classify_catch_all() {
        assert_eq!(
            classify_segment("[...slug]"),
            Segment::CatchAll("slug".into())
        );
    }

    #[test]
    fn test_classify_optional_catch_all() {
        assert_eq!(
            classify_segment("[[...categories]]"),
            Segment::OptionalCatchAll("categories".into())
        );
    }

    #[test]
    fn test_double_bracket_without_dots_is_param() {
        // [[name]] is not a recognized optional catch-all; the outer bracket
        // pair wins and the inner brackets stay in the name.
        assert_eq!(classify_segment("[[name]]"), Segment::Param("[name]".into()));
    }

    #[test]
    fn test_group_detection() {
        assert!(is_group_segment("(auth)"));
        assert!(is_group_segment("(marketing)"));
        assert!(!is_group_segment("()"));
        assert!(!is_group_segment("auth"));
    }

    #[test]
    fn test_convention_tokens_exempt_from_private_prefix() {
        assert!(is_convention_token("[_id]"));
        assert!(is_convention_token("[...slug]"));
        assert!(is_convention_token("(group)"));
        assert!(!is_convention_token("_components"));
    }

    #[test]
    fn test_param_name_accessor() {
        assert_eq!(classify_segment("users").param_name(), None);
        assert_eq!(classify_segment("[id]").param_name(), Some("id"));
        assert_eq!(classify_segment("[...s]").param_name(), Some("s"));
    }

    #[test]
    fn test_is_catch_all() {
        assert!(!classify_segment("[id]").is_catch_all());
        assert!(classify_segment("[...slug]").is_catch_all());
        assert!(classify_segment("[[...slug]]").is_catch_all());
    }
}
