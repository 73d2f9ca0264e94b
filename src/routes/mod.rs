use std::path::Path;

use axum::{Router, middleware};
use docview_core::controller::Controller;
use tower::Layer;
use tower_http::services::ServeDir;

use crate::app::AppState;
use crate::app::controller::{AiController, HomeController};
use crate::app::middleware::routing::{ConventionalRoutes, normalize_route_case};

/// Conventional controller routes, with static files from `web_root` as the fallback.
pub fn routes(web_root: &Path) -> Router<AppState> {
    Router::new()
        .merge(HomeController::router())
        .merge(AiController::router())
        .fallback_service(ServeDir::new(web_root))
}

pub fn conventional_routes() -> ConventionalRoutes {
    ConventionalRoutes::new(
        HomeController::conventional_routes()
            .iter()
            .chain(AiController::conventional_routes())
            .copied(),
    )
}

/// Puts the route-case rewrite in front of `router`. `Router::layer` would
/// only run it after a route had already matched.
pub fn case_insensitive(router: Router) -> Router {
    let rewrite = middleware::from_fn_with_state(conventional_routes(), normalize_route_case);

    Router::new().fallback_service(rewrite.layer(router))
}
