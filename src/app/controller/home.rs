use axum::{extract::State, response::Html};
use docview_core::response::CoreResponse;

use crate::app::AppState;
use crate::app::response::{ServiceStatus, SimpleResponse, StatusResponse};

const ERROR_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Error</title></head><body>\
    <h1>Error.</h1><h2>An error occurred while processing your request.</h2></body></html>";

pub struct HomeController;

#[docview_macros::controller(state = AppState)]
impl HomeController {
    #[docview_macros::get]
    pub async fn index(State(state): State<AppState>) -> Html<String> {
        Html(format!(
            "<!DOCTYPE html>\n<html><head><title>Document Viewer</title></head><body>\
             <h1>Document Viewer</h1><p>Environment: {}</p></body></html>",
            state.config.environment
        ))
    }

    #[docview_macros::get]
    pub async fn error() -> Html<&'static str> {
        Html(ERROR_PAGE)
    }

    #[docview_macros::get]
    pub async fn status(State(state): State<AppState>) -> StatusResponse {
        if let Err(err) = state.services.data_context().ping().await {
            tracing::warn!(%err, "data store ping failed");

            return CoreResponse::Unavailable(SimpleResponse {
                message: "data store unreachable".into(),
            });
        }

        CoreResponse::Ok(ServiceStatus {
            environment: state.config.environment.name(),
            deployment: state.services.chat_client().deployment().to_string(),
            services: state.services.capabilities(),
            store: "ok",
        })
    }
}
