// File: src/report.rs
// Purpose: Serializable route table for listing and tooling surfaces

use serde::Serialize;

use virgule_scan::ScanOutcome;

/// One route line in the report, sorted by pattern then method.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
    pub priority: i32,
    pub source_path: String,
    pub params: Vec<String>,
}

/// One middleware line in the report.
#[derive(Debug, Clone, Serialize)]
pub struct MiddlewareInfo {
    pub prefix: String,
    pub source_path: String,
}

/// Proxy info in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyInfo {
    pub enabled: bool,
    pub source_path: String,
    pub matchers: Vec<String>,
}

/// The route table consumed by external listing tools.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteReport {
    pub routes: Vec<RouteInfo>,
    pub middlewares: Vec<MiddlewareInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyInfo>,
    pub total_routes: usize,
    pub total_middlewares: usize,
}

impl RouteReport {
    /// Builds the report from a scan outcome. Routes are sorted by pattern
    /// and then method so the listing is stable across runs.
    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        let mut routes: Vec<RouteInfo> = outcome
            .routes
            .iter()
            .map(|route| RouteInfo {
                method: route.method.to_string(),
                pattern: route.compiled.pattern.clone(),
                priority: route.compiled.priority,
                source_path: route.source_path.clone(),
                params: route
                    .compiled
                    .params
                    .iter()
                    .map(|param| param.name.clone())
                    .collect(),
            })
            .collect();

        routes.sort_by(|a, b| {
            a.pattern
                .cmp(&b.pattern)
                .then_with(|| a.method.cmp(&b.method))
        });

        let middlewares: Vec<MiddlewareInfo> = outcome
            .middlewares
            .iter()
            .map(|mw| MiddlewareInfo {
                prefix: mw.prefix.clone(),
                source_path: mw.source_path.clone(),
            })
            .collect();

        let proxy = outcome.proxy.as_ref().map(|proxy| ProxyInfo {
            enabled: true,
            source_path: proxy.source_path.clone(),
            matchers: proxy.matchers.clone(),
        });

        Self {
            total_routes: routes.len(),
            total_middlewares: middlewares.len(),
            routes,
            middlewares,
            proxy,
        }
    }
}
