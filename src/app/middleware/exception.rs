//! Exception policies for unhandled request failures.
//!
//! Handlers and the panic catcher answer with [`failure_response`], which tags
//! a bare 500 with an [`ErrorDetail`] extension. Exactly one of the two
//! middlewares below then decides what the client sees.

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};

/// Path of the generic error page used in production.
pub const ERROR_PATH: &str = "/Home/Error";

/// Diagnostic text attached to a failed response. Never leaves the process
/// unless the developer exception page renders it.
#[derive(Clone, Debug)]
pub struct ErrorDetail(pub String);

pub fn failure_response(detail: String) -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}

/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    failure_response(format!("handler panicked: {detail}"))
}

/// Development: render the failure with its detail.
pub async fn developer_exception_page(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    tracing::error!(%method, %uri, detail = %detail, "unhandled request error");

    let page = format!(
        "<!DOCTYPE html>\n<html><head><title>Internal Server Error</title></head><body>\
         <h1>An unhandled exception occurred while processing the request.</h1>\
         <p><code>{} {}</code></p><pre>{}</pre></body></html>",
        escape_html(method.as_str()),
        escape_html(&uri.to_string()),
        escape_html(&detail),
    );

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
}

/// Production: log the detail and send the client to the error page.
pub async fn exception_handler(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>() else {
        return response;
    };

    tracing::error!(%method, %uri, detail = %detail, "unhandled request error");

    // the error page itself failed; redirecting again would loop
    if uri.path() == ERROR_PATH {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    Redirect::to(ERROR_PATH).into_response()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_its_detail() {
        let response = failure_response("boom".into());

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.extensions().get::<ErrorDetail>().map(|d| d.0.as_str()), Some("boom"));
    }

    #[test]
    fn panic_payloads_are_described() {
        let response = panic_response(Box::new("static message"));
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.0, "handler panicked: static message");

        let response = panic_response(Box::new(String::from("owned message")));
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.0, "handler panicked: owned message");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
