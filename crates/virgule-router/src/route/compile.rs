//! Directory path → canonical URL pattern, parameter list, and priority.
//!
//! The compiler is the single place where naming conventions turn into
//! routing data. It consumes directory segments left to right, strips route
//! groups, and produces a [`CompiledPattern`] whose typed segments are the
//! source of truth; the canonical string is rendered once and never parsed
//! back.

use super::segment::{classify_segment, is_group_segment, Segment};

/// Priority tier for pure-static patterns (matched first).
pub const PRIORITY_STATIC: i32 = 100;
/// Priority tier for patterns with at least one dynamic parameter.
pub const PRIORITY_DYNAMIC: i32 = 50;
/// Priority tier for patterns with a catch-all (matched last).
pub const PRIORITY_CATCH_ALL: i32 = 5;

/// One named parameter of a compiled pattern, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: String,
    pub is_catch_all: bool,
    pub is_optional: bool,
}

/// The compiler's output: typed segments plus everything rendered from them.
///
/// # Examples
///
/// ```
/// use virgule_router::route::compile::compile_pattern;
///
/// let compiled = compile_pattern(["users", "[id]"]);
/// assert_eq!(compiled.pattern, "/users/{id}");
/// assert_eq!(compiled.params.len(), 1);
/// assert_eq!(compiled.params[0].name, "id");
/// assert_eq!(compiled.priority, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    /// Typed segments, groups already stripped.
    pub segments: Vec<Segment>,
    /// Canonical pattern: `{name}` placeholders, trailing `*` for catch-alls.
    pub pattern: String,
    /// Parameters in order of appearance.
    pub params: Vec<ParamInfo>,
    /// Priority tier: 100 static, 50 dynamic, 5 catch-all.
    pub priority: i32,
}

/// Compiles directory segments into a pattern (pure function).
///
/// Rules, applied left to right:
///
/// - `name` → literal
/// - `[name]` → dynamic parameter
/// - `[...name]` → catch-all; the pattern renders this and everything after
///   it as a single `*`
/// - `[[...name]]` → optional catch-all; same rendering, but the route also
///   matches with the segment absent, binding the empty string
/// - `(name)` → route group, dropped entirely
///
/// # Examples
///
/// ```
/// use virgule_router::route::compile::compile_pattern;
///
/// assert_eq!(compile_pattern(["users"]).pattern, "/users");
/// assert_eq!(compile_pattern(["users", "[id]"]).pattern, "/users/{id}");
/// assert_eq!(compile_pattern(["docs", "[...slug]"]).pattern, "/docs/*");
/// assert_eq!(compile_pattern(["(admin)", "settings"]).pattern, "/settings");
///
/// // Empty input compiles to the root pattern.
/// let root = compile_pattern(std::iter::empty::<&str>());
/// assert_eq!(root.pattern, "/");
/// assert_eq!(root.priority, 100);
/// ```
pub fn compile_pattern<I, S>(raw_segments: I) -> CompiledPattern
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segments = Vec::new();

    for raw in raw_segments {
        let raw = raw.as_ref();
        if raw.is_empty() || is_group_segment(raw) {
            continue;
        }

        let segment = classify_segment(raw);
        let terminal = segment.is_catch_all();
        segments.push(segment);

        // A catch-all swallows everything after it.
        if terminal {
            break;
        }
    }

    let pattern = render_pattern(&segments);
    let params = collect_params(&segments);
    let priority = priority_of(&segments);

    CompiledPattern {
        segments,
        pattern,
        params,
        priority,
    }
}

/// Renders the canonical pattern string from typed segments.
///
/// This is a boundary function: the rendered string is for display,
/// transport registration keys, and the route listing; routing decisions
/// are made from the segments themselves.
pub fn render_pattern(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut pattern = String::new();
    for segment in segments {
        pattern.push('/');
        match segment {
            Segment::Literal(name) => pattern.push_str(name),
            Segment::Param(name) => {
                pattern.push('{');
                pattern.push_str(name);
                pattern.push('}');
            }
            Segment::CatchAll(_) | Segment::OptionalCatchAll(_) => {
                pattern.push('*');
            }
        }
    }
    pattern
}

/// Priority tier for a segment list (pure function).
///
/// Catch-all weight dominates, then dynamic weight, then static:
///
/// ```
/// use virgule_router::route::compile::compile_pattern;
///
/// assert_eq!(compile_pattern(["api", "health"]).priority, 100);
/// assert_eq!(compile_pattern(["users", "[id]"]).priority, 50);
/// assert_eq!(compile_pattern(["docs", "[...slug]"]).priority, 5);
/// assert_eq!(compile_pattern(["shop", "[[...c]]"]).priority, 5);
/// ```
pub fn priority_of(segments: &[Segment]) -> i32 {
    let has_catch_all = segments.iter().any(Segment::is_catch_all);
    let has_dynamic = segments
        .iter()
        .any(|s| matches!(s, Segment::Param(_)));

    if has_catch_all {
        PRIORITY_CATCH_ALL
    } else if has_dynamic {
        PRIORITY_DYNAMIC
    } else {
        PRIORITY_STATIC
    }
}

fn collect_params(segments: &[Segment]) -> Vec<ParamInfo> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Literal(_) => None,
            Segment::Param(name) => Some(ParamInfo {
                name: name.clone(),
                is_catch_all: false,
                is_optional: false,
            }),
            Segment::CatchAll(name) => Some(ParamInfo {
                name: name.clone(),
                is_catch_all: true,
                is_optional: false,
            }),
            Segment::OptionalCatchAll(name) => Some(ParamInfo {
                name: name.clone(),
                is_catch_all: true,
                is_optional: true,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(segments: &[&str]) -> CompiledPattern {
        compile_pattern(segments.iter().copied())
    }

    #[test]
    fn test_root() {
        let c = compile(&[]);
        assert_eq!(c.pattern, "/");
        assert_eq!(c.priority, PRIORITY_STATIC);
        assert!(c.params.is_empty());
    }

    #[test]
    fn test_static_nested() {
        let c = compile(&["api", "users", "profile"]);
        assert_eq!(c.pattern, "/api/users/profile");
        assert_eq!(c.priority, PRIORITY_STATIC);
    }

    #[test]
    fn test_dynamic_segment() {
        let c = compile(&["users", "[id]"]);
        assert_eq!(c.pattern, "/users/{id}");
        assert_eq!(
            c.params,
            vec![ParamInfo {
                name: "id".into(),
                is_catch_all: false,
                is_optional: false,
            }]
        );
        assert_eq!(c.priority, PRIORITY_DYNAMIC);
    }

    #[test]
    fn test_multiple_dynamic_segments() {
        let c = compile(&["orgs", "[orgId]", "teams", "[teamId]"]);
        assert_eq!(c.pattern, "/orgs/{orgId}/teams/{teamId}");
        assert_eq!(c.params.len(), 2);
        assert_eq!(c.params[0].name, "orgId");
        assert_eq!(c.params[1].name, "teamId");
        assert_eq!(c.priority, PRIORITY_DYNAMIC);
    }

    #[test]
    fn test_catch_all() {
        let c = compile(&["docs", "[...slug]"]);
        assert_eq!(c.pattern, "/docs/*");
        assert_eq!(c.params.len(), 1);
        assert!(c.params[0].is_catch_all);
        assert!(!c.params[0].is_optional);
        assert_eq!(c.priority, PRIORITY_CATCH_ALL);
    }

    #[test]
    fn test_catch_all_swallows_trailing_segments() {
        let c = compile(&["docs", "[...slug]", "extra"]);
        assert_eq!(c.pattern, "/docs/*");
        assert_eq!(c.params.len(), 1);
    }

    #[test]
    fn test_optional_catch_all() {
        let c = compile(&["shop", "[[...categories]]"]);
        assert_eq!(c.pattern, "/shop/*");
        assert!(c.params[0].is_catch_all);
        assert!(c.params[0].is_optional);
        assert_eq!(c.priority, PRIORITY_CATCH_ALL);
    }

    #[test]
    fn test_group_stripped() {
        let c = compile(&["(auth)", "login"]);
        assert_eq!(c.pattern, "/login");
        assert_eq!(c.priority, PRIORITY_STATIC);
    }

    #[test]
    fn test_nested_groups_stripped() {
        let c = compile(&["(marketing)", "(landing)", "about"]);
        assert_eq!(c.pattern, "/about");
    }

    #[test]
    fn test_group_with_dynamic() {
        let c = compile(&["(api)", "users", "[id]"]);
        assert_eq!(c.pattern, "/users/{id}");
        assert_eq!(c.priority, PRIORITY_DYNAMIC);
    }

    #[test]
    fn test_deep_group_mix() {
        let c = compile(&[
            "(admin)", "dashboard", "users", "[userId]", "posts", "[postId]",
        ]);
        assert_eq!(c.pattern, "/dashboard/users/{userId}/posts/{postId}");
    }

    #[test]
    fn test_group_only_path_is_root() {
        let c = compile(&["(admin)"]);
        assert_eq!(c.pattern, "/");
        assert_eq!(c.priority, PRIORITY_STATIC);
    }

    #[test]
    fn test_root_catch_all() {
        let c = compile(&["[...rest]"]);
        assert_eq!(c.pattern, "/*");
        assert_eq!(c.priority, PRIORITY_CATCH_ALL);
    }

    #[test]
    fn test_params_ordered_left_to_right() {
        let c = compile(&["[a]", "x", "[b]", "[...c]"]);
        let names: Vec<&str> = c.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
