// File: src/descriptor.rs
// Purpose: Descriptor types emitted by the scanner

use virgule_router::CompiledPattern;

/// HTTP methods a route file can declare, one handler function per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl Method {
    /// All recognized methods, in lexical order of their wire names.
    pub const ALL: [Method; 7] = [
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
    ];

    /// Wire name, e.g. `GET`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    /// Maps a handler function name to its method. Case-sensitive: the
    /// scanner recognizes exactly `get`, `post`, `put`, `patch`, `delete`,
    /// `head`, and `options`.
    pub fn from_handler_name(name: &str) -> Option<Method> {
        match name {
            "delete" => Some(Method::Delete),
            "get" => Some(Method::Get),
            "head" => Some(Method::Head),
            "options" => Some(Method::Options),
            "patch" => Some(Method::Patch),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered route handler declaration.
///
/// `dir` is the route directory relative to the app root, exactly as
/// written on disk (groups included); it is the key callers use to pair a
/// handler callable with this descriptor. `compiled` carries the URL-facing
/// pattern with groups stripped.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub method: Method,
    pub compiled: CompiledPattern,
    pub dir: String,
    pub source_path: String,
}

/// One discovered middleware declaration.
///
/// `prefix` is the directory's URL pattern (groups stripped), used verbatim
/// as the inheritance prefix for chain lookup.
#[derive(Debug, Clone)]
pub struct MiddlewareDescriptor {
    pub prefix: String,
    pub dir: String,
    /// Whether the declaration is the zero-argument factory form.
    pub is_factory: bool,
    pub source_path: String,
}

/// The application's single proxy declaration, if present.
#[derive(Debug, Clone)]
pub struct ProxyDescriptor {
    /// Matcher patterns read from `PROXY_MATCHERS`; empty means match-all.
    pub matchers: Vec<String>,
    pub source_path: String,
}

/// Everything one scan run produced.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub routes: Vec<RouteDescriptor>,
    pub middlewares: Vec<MiddlewareDescriptor>,
    pub proxy: Option<ProxyDescriptor>,
    /// Declarations skipped for having a non-conforming shape.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        for method in Method::ALL {
            let name = method.as_str().to_ascii_lowercase();
            assert_eq!(Method::from_handler_name(&name), Some(method));
        }
    }

    #[test]
    fn test_method_name_is_case_sensitive() {
        assert_eq!(Method::from_handler_name("GET"), None);
        assert_eq!(Method::from_handler_name("Get"), None);
        assert_eq!(Method::from_handler_name("fetch"), None);
    }

    #[test]
    fn test_method_order_is_lexical() {
        let names: Vec<&str> = Method::ALL.iter().map(|m| m.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "ALL must list wire names lexically");

        let mut by_ord = Method::ALL.to_vec();
        by_ord.sort();
        assert_eq!(by_ord, Method::ALL.to_vec(), "derived Ord must agree");
    }
}
