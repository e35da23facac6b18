//! Interception matcher language.
//!
//! Compiles the small pattern language used to scope the pre-routing
//! interceptor to a subset of request paths:
//!
//! | Segment form | Matches |
//! |---|---|
//! | `literal` | that exact segment |
//! | `:name` | exactly one segment |
//! | `:name?` | zero or one segment |
//! | `:name*` | zero or more trailing segments |
//! | `:name+` | one or more trailing segments |
//! | `(a\|b)` | one of the listed literal alternatives |
//! | `*` | shorthand for an anonymous `:_*` |
//!
//! Compilation happens once at build time; matching is a pure boolean
//! test over path segments with no captures.

/// One compiled matcher segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSegment {
    /// Literal segment, matched verbatim.
    Literal(String),
    /// Alternation group of literals: `(a|b)`.
    Alternation(Vec<String>),
    /// `:name` - exactly one segment.
    One(String),
    /// `:name?` - zero or one segment.
    ZeroOrOne(String),
    /// `:name*` - zero or more segments.
    ZeroOrMore(String),
    /// `:name+` - one or more segments.
    OneOrMore(String),
}

/// A single compiled matcher pattern.
///
/// # Examples
///
/// ```
/// use virgule_router::matcher::Matcher;
///
/// let m = Matcher::compile("/api/:rest*");
/// assert!(m.matches("/api"));
/// assert!(m.matches("/api/users/5"));
/// assert!(!m.matches("/other"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    segments: Vec<MatchSegment>,
    source: String,
}

impl Matcher {
    /// Compiles a matcher pattern (pure function).
    pub fn compile(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(compile_segment)
            .collect();

        Self {
            segments,
            source: pattern.to_string(),
        }
    }

    /// The original pattern text, kept for the route listing and logs.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_from(&self.segments, &parts)
    }
}

/// An ordered set of matchers; a path is intercepted when any member
/// matches, or when the set is empty (match-all).
///
/// # Examples
///
/// ```
/// use virgule_router::matcher::MatcherSet;
///
/// let set = MatcherSet::compile(&["/v1/*", "/api/admin/*"]);
/// assert!(set.matches("/v1/users"));
/// assert!(set.matches("/api/admin/keys"));
/// assert!(!set.matches("/health"));
///
/// // Empty set intercepts everything.
/// assert!(MatcherSet::compile(&[] as &[&str]).matches("/anything"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    matchers: Vec<Matcher>,
}

impl MatcherSet {
    /// Compiles every pattern in registration order.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            matchers: patterns
                .iter()
                .map(|p| Matcher::compile(p.as_ref()))
                .collect(),
        }
    }

    /// Whether the set is the implicit match-all (no patterns given).
    pub fn is_match_all(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Whether the path should be intercepted.
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.is_empty() || self.matchers.iter().any(|m| m.matches(path))
    }

    /// The compiled matchers, in registration order.
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }
}

fn compile_segment(segment: &str) -> MatchSegment {
    if segment == "*" {
        return MatchSegment::ZeroOrMore("_".to_string());
    }

    if let Some(inner) = segment
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        return MatchSegment::Alternation(
            inner.split('|').map(|alt| alt.to_string()).collect(),
        );
    }

    match segment.strip_prefix(':') {
        Some(name) => {
            if let Some(name) = name.strip_suffix('*') {
                MatchSegment::ZeroOrMore(name.to_string())
            } else if let Some(name) = name.strip_suffix('+') {
                MatchSegment::OneOrMore(name.to_string())
            } else if let Some(name) = name.strip_suffix('?') {
                MatchSegment::ZeroOrOne(name.to_string())
            } else {
                MatchSegment::One(name.to_string())
            }
        }
        None => MatchSegment::Literal(segment.to_string()),
    }
}

/// Recursive segment matching with backtracking for the variadic forms.
///
/// Pattern lists are short (hand-written matcher entries), so the
/// worst-case backtracking cost is irrelevant in practice.
fn match_from(segments: &[MatchSegment], parts: &[&str]) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return parts.is_empty();
    };

    match segment {
        MatchSegment::Literal(lit) => {
            parts.first() == Some(&lit.as_str()) && match_from(rest, &parts[1..])
        }
        MatchSegment::Alternation(alts) => parts
            .first()
            .is_some_and(|p| alts.iter().any(|a| a == p))
            && match_from(rest, &parts[1..]),
        MatchSegment::One(_) => !parts.is_empty() && match_from(rest, &parts[1..]),
        MatchSegment::ZeroOrOne(_) => {
            match_from(rest, parts) || (!parts.is_empty() && match_from(rest, &parts[1..]))
        }
        MatchSegment::ZeroOrMore(_) => (0..=parts.len()).any(|n| match_from(rest, &parts[n..])),
        MatchSegment::OneOrMore(_) => (1..=parts.len()).any(|n| match_from(rest, &parts[n..])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        let m = Matcher::compile("/api/users");
        assert!(m.matches("/api/users"));
        assert!(!m.matches("/api"));
        assert!(!m.matches("/api/users/5"));
    }

    #[test]
    fn test_one_segment_param() {
        let m = Matcher::compile("/users/:id");
        assert!(m.matches("/users/5"));
        assert!(!m.matches("/users"));
        assert!(!m.matches("/users/5/posts"));
    }

    #[test]
    fn test_zero_or_more() {
        let m = Matcher::compile("/api/:rest*");
        assert!(m.matches("/api"));
        assert!(m.matches("/api/x"));
        assert!(m.matches("/api/x/y/z"));
        assert!(!m.matches("/apix"));
    }

    #[test]
    fn test_one_or_more() {
        let m = Matcher::compile("/docs/:slug+");
        assert!(!m.matches("/docs"));
        assert!(m.matches("/docs/intro"));
        assert!(m.matches("/docs/guide/setup"));
    }

    #[test]
    fn test_zero_or_one() {
        let m = Matcher::compile("/posts/:id?");
        assert!(m.matches("/posts"));
        assert!(m.matches("/posts/42"));
        assert!(!m.matches("/posts/42/comments"));
    }

    #[test]
    fn test_alternation() {
        let m = Matcher::compile("/(api|admin)/users");
        assert!(m.matches("/api/users"));
        assert!(m.matches("/admin/users"));
        assert!(!m.matches("/other/users"));
    }

    #[test]
    fn test_bare_star() {
        let m = Matcher::compile("/v1/*");
        assert!(m.matches("/v1"));
        assert!(m.matches("/v1/users/5"));
        assert!(!m.matches("/v2/users"));
    }

    #[test]
    fn test_param_then_literal() {
        let m = Matcher::compile("/:tenant/settings");
        assert!(m.matches("/acme/settings"));
        assert!(!m.matches("/acme/other"));
    }

    #[test]
    fn test_optional_then_literal_backtracks() {
        let m = Matcher::compile("/a/:x?/b");
        assert!(m.matches("/a/b"));
        assert!(m.matches("/a/mid/b"));
        assert!(!m.matches("/a/mid/extra/b"));
    }

    #[test]
    fn test_set_any_semantics() {
        let set = MatcherSet::compile(&["/v1/*", "/api/admin/*", "/api/*"]);
        assert!(set.matches("/v1/legacy"));
        assert!(set.matches("/api/x"));
        assert!(!set.matches("/other"));
    }

    #[test]
    fn test_empty_set_matches_all() {
        let set = MatcherSet::compile(&[] as &[&str]);
        assert!(set.is_match_all());
        assert!(set.matches("/"));
        assert!(set.matches("/anything/at/all"));
    }

    #[test]
    fn test_root_pattern() {
        let m = Matcher::compile("/");
        assert!(m.matches("/"));
        assert!(!m.matches("/a"));
    }
}
