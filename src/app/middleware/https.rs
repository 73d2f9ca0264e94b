use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Redirects requests that a fronting proxy reports as plain HTTP to the
/// configured HTTPS port. TLS itself terminates upstream of this process.
pub async fn redirect_to_https(State(https_port): State<u16>, request: Request, next: Next) -> Response {
    let plain_http = request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("http"));

    if !plain_http {
        return next.run(request).await;
    }

    let Some(host) = request.headers().get(HOST).and_then(|value| value.to_str().ok()) else {
        return next.run(request).await;
    };

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Redirect::temporary(&https_location(host, https_port, path)).into_response()
}

fn https_location(host: &str, port: u16, path: &str) -> String {
    let hostname = match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };

    if port == 443 {
        format!("https://{hostname}{path}")
    } else {
        format!("https://{hostname}:{port}{path}")
    }
}
