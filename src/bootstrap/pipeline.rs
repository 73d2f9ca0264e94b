use axum::{
    Router,
    http::{HeaderValue, header::STRICT_TRANSPORT_SECURITY},
    middleware,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::app::middleware::{exception, https};
use crate::config::Environment;

/// 30 days.
const HSTS: &str = "max-age=2592000";

/// Request pipeline, fixed once from the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Unhandled errors render a diagnostic page.
    Development,
    /// Unhandled errors redirect to the error page; responses carry HSTS.
    Production,
}

impl Pipeline {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::Development,
            Environment::Production => Self::Production,
        }
    }

    /// Wraps `router`; layers added last run first.
    pub fn apply(self, router: Router, https_port: Option<u16>) -> Router {
        let router = router.layer(CatchPanicLayer::custom(exception::panic_response));

        let router = match self {
            Self::Development => router.layer(middleware::from_fn(exception::developer_exception_page)),
            Self::Production => router
                .layer(middleware::from_fn(exception::exception_handler))
                .layer(SetResponseHeaderLayer::if_not_present(
                    STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static(HSTS),
                )),
        };

        let router = match https_port {
            Some(port) => router.layer(middleware::from_fn_with_state(port, https::redirect_to_https)),
            None => router,
        };

        router.layer(TraceLayer::new_for_http())
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::LOCATION},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::error::RequestError;
    use crate::services::ChatError;

    fn failing_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/fail",
                get(|| async { Err::<&'static str, _>(RequestError::Chat(ChatError::EmptyResponse)) }),
            )
            .route("/panic", get(panicking))
    }

    async fn panicking() -> &'static str {
        panic!("kaboom")
    }

    async fn call(router: Router, uri: &str, headers: &[(&str, &str)]) -> axum::response::Response {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        router.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn follows_the_environment() {
        assert_eq!(Pipeline::for_environment(Environment::Development), Pipeline::Development);
        assert_eq!(Pipeline::for_environment(Environment::Production), Pipeline::Production);
    }

    #[tokio::test]
    async fn development_shows_the_detail() {
        let router = Pipeline::Development.apply(failing_router(), None);

        let response = call(router.clone(), "/fail", &[]).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(STRICT_TRANSPORT_SECURITY).is_none());
        assert!(body_text(response).await.contains("response contained no message"));

        let response = call(router, "/panic", &[]).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("kaboom"));
    }

    #[tokio::test]
    async fn production_redirects_without_detail() {
        let router = Pipeline::Production.apply(failing_router(), None);

        for uri in ["/fail", "/panic"] {
            let response = call(router.clone(), uri, &[]).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers().get(LOCATION).unwrap(), exception::ERROR_PATH);
            assert_eq!(response.headers().get(STRICT_TRANSPORT_SECURITY).unwrap(), HSTS);

            let body = body_text(response).await;
            assert!(!body.contains("response contained no message"));
            assert!(!body.contains("kaboom"));
        }
    }

    #[tokio::test]
    async fn successful_responses_pass_through() {
        let response = call(Pipeline::Production.apply(failing_router(), None), "/ok", &[]).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(STRICT_TRANSPORT_SECURITY).unwrap(), HSTS);
        assert_eq!(body_text(response).await, "fine");
    }

    #[tokio::test]
    async fn redirects_forwarded_http_when_https_is_configured() {
        let router = Pipeline::Development.apply(failing_router(), Some(8443));

        let response = call(
            router.clone(),
            "/ok",
            &[("host", "example.test:8080"), ("x-forwarded-proto", "http")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "https://example.test:8443/ok");

        let response = call(router, "/ok", &[("host", "example.test"), ("x-forwarded-proto", "https")]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
