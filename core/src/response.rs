use axum::{response::IntoResponse, http::StatusCode, Json};

pub enum CoreResponse<T, E>
where T: serde::Serialize,
      E: serde::Serialize
{
    Ok(T),

    NotFound(E),

    /// A dependency (store, upstream client) is not reachable right now.
    Unavailable(E),

    InternalServerError(E),
}

impl<T, E> IntoResponse for CoreResponse<T, E>
where T: serde::Serialize,
      E: serde::Serialize
{
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Self::NotFound(error) => (StatusCode::NOT_FOUND, Json(error)).into_response(),
            Self::Unavailable(error) => (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response(),
            Self::InternalServerError(error) => (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response(),
        }
    }
}
