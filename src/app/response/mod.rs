use serde::Serialize;

use crate::services::Capability;

#[derive(Serialize)]
pub struct SimpleResponse {
    pub message: String
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub environment: &'static str,
    pub deployment: String,
    pub services: Vec<Capability>,
    pub store: &'static str,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub content: String
}

pub type StatusResponse = docview_core::response::CoreResponse<ServiceStatus, SimpleResponse>;
