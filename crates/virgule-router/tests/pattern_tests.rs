//! Pattern compilation parity tests.
//!
//! The table cases mirror the directory layouts the scanner feeds into the
//! compiler, one assertion per supported convention.

use pretty_assertions::assert_eq;
use virgule_router::{compile_pattern, MatcherSet, Segment};

fn pattern_of(dir: &str) -> String {
    compile_pattern(dir.split('/').filter(|s| !s.is_empty())).pattern
}

fn priority_of_dir(dir: &str) -> i32 {
    compile_pattern(dir.split('/').filter(|s| !s.is_empty())).priority
}

#[test]
fn directory_to_pattern_table() {
    let cases = [
        ("", "/"),
        ("users", "/users"),
        ("api/users/profile", "/api/users/profile"),
        ("users/[id]", "/users/{id}"),
        ("orgs/[orgId]/teams/[teamId]", "/orgs/{orgId}/teams/{teamId}"),
        ("docs/[...slug]", "/docs/*"),
        ("shop/[[...categories]]", "/shop/*"),
        ("(auth)/login", "/login"),
        ("(marketing)/(landing)/about", "/about"),
        ("(api)/users/[id]", "/users/{id}"),
        (
            "(admin)/dashboard/users/[userId]/posts/[postId]",
            "/dashboard/users/{userId}/posts/{postId}",
        ),
        ("api/health", "/api/health"),
    ];

    for (dir, want) in cases {
        assert_eq!(pattern_of(dir), want, "directory: {dir:?}");
    }
}

#[test]
fn priority_tier_table() {
    let cases = [
        ("", 100),
        ("users", 100),
        ("api/health", 100),
        ("users/[id]", 50),
        ("orgs/[orgId]/teams/[teamId]", 50),
        ("docs/[...slug]", 5),
        ("[...rest]", 5),
        ("shop/[[...categories]]", 5),
    ];

    for (dir, want) in cases {
        assert_eq!(priority_of_dir(dir), want, "directory: {dir:?}");
    }
}

#[test]
fn groups_never_reach_patterns_at_any_depth() {
    for dir in [
        "(a)",
        "(a)/(b)",
        "(a)/x/(b)/y",
        "x/(a)/y/(b)",
        "(a)/(b)/(c)/deep/(d)/leaf",
    ] {
        let compiled = compile_pattern(dir.split('/'));
        assert!(
            !compiled.pattern.contains('(') && !compiled.pattern.contains(')'),
            "group leaked into {:?} from {dir:?}",
            compiled.pattern
        );
        assert!(compiled
            .segments
            .iter()
            .all(|s| !matches!(s, Segment::Literal(l) if l.starts_with('('))));
    }
}

#[test]
fn param_metadata_for_each_convention() {
    let compiled = compile_pattern(["users", "[id]"]);
    assert_eq!(compiled.params.len(), 1);
    assert!(!compiled.params[0].is_catch_all);
    assert!(!compiled.params[0].is_optional);

    let compiled = compile_pattern(["docs", "[...slug]"]);
    assert_eq!(compiled.params[0].name, "slug");
    assert!(compiled.params[0].is_catch_all);
    assert!(!compiled.params[0].is_optional);

    let compiled = compile_pattern(["shop", "[[...categories]]"]);
    assert!(compiled.params[0].is_catch_all);
    assert!(compiled.params[0].is_optional);
}

#[test]
fn interception_matchers_scope_paths() {
    let set = MatcherSet::compile(&["/api/*"]);
    assert!(set.matches("/api/x"));
    assert!(!set.matches("/other"));

    let set = MatcherSet::compile(&["/v1/*", "/api/admin/*", "/api/*"]);
    assert!(set.matches("/v1/anything/here"));
    assert!(set.matches("/api/admin"));
    assert!(set.matches("/api/users"));
    assert!(!set.matches("/health"));
}

#[test]
fn matcher_language_forms() {
    let set = MatcherSet::compile(&["/users/:id"]);
    assert!(set.matches("/users/5"));
    assert!(!set.matches("/users/5/posts"));

    let set = MatcherSet::compile(&["/docs/:slug+"]);
    assert!(!set.matches("/docs"));
    assert!(set.matches("/docs/a/b"));

    let set = MatcherSet::compile(&["/posts/:id?"]);
    assert!(set.matches("/posts"));
    assert!(set.matches("/posts/9"));

    let set = MatcherSet::compile(&["/(blog|news)/:rest*"]);
    assert!(set.matches("/blog"));
    assert!(set.matches("/news/2024/06"));
    assert!(!set.matches("/shop"));
}
