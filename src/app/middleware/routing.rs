use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Uri,
    middleware::Next,
    response::Response,
};

/// Lowercase `/{controller}` and `/{controller}/{action}` prefixes known to
/// the router.
#[derive(Clone, Debug, Default)]
pub struct ConventionalRoutes {
    prefixes: Arc<HashSet<String>>,
}

impl ConventionalRoutes {
    pub fn new<'a>(prefixes: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            prefixes: Arc::new(prefixes.into_iter().map(str::to_string).collect()),
        }
    }

    /// Lowercases the controller and action segments of `path` when they name
    /// a known route. The id segment and anything else keep their spelling.
    pub fn normalize(&self, path: &str) -> Option<String> {
        let mut segments = path.strip_prefix('/')?.splitn(3, '/');
        let controller = segments.next().filter(|s| !s.is_empty())?.to_lowercase();

        match segments.next().filter(|s| !s.is_empty()) {
            Some(action) => {
                let prefix = format!("/{controller}/{}", action.to_lowercase());
                if !self.prefixes.contains(&prefix) {
                    return None;
                }

                Some(match segments.next() {
                    Some(rest) => format!("{prefix}/{rest}"),
                    None => prefix,
                })
            }
            None => {
                let prefix = format!("/{controller}");
                self.prefixes.contains(&prefix).then_some(prefix)
            }
        }
    }
}

/// Must wrap the router itself, since it rewrites the path routing sees.
pub async fn normalize_route_case(State(routes): State<ConventionalRoutes>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if let Some(normalized) = routes.normalize(path).filter(|normalized| normalized != path) {
        if let Some(uri) = rewrite_path(request.uri(), &normalized) {
            tracing::trace!(from = %request.uri(), to = %uri, "normalized route case");
            *request.uri_mut() = uri;
        }
    }

    next.run(request).await
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);

    Uri::from_parts(parts).ok()
}
