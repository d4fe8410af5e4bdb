//! Request/response bodies for the three `/generator/*` endpoints.

use eventer_core::{DestinationDesc, EventDesc, ScheduleDesc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub events: Vec<EventDesc>,
    pub destinations: Vec<DestinationDesc>,
    pub schedules: Vec<ScheduleDesc>,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub generators: Vec<GeneratorSummary>,
}

#[derive(Debug, Serialize)]
pub struct GeneratorSummary {
    pub id: String,
    pub count: i64,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: String,
    pub count: i64,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub status: &'static str,
}

impl Default for OkResponse {
    fn default() -> Self {
        OkResponse { status: "OK" }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub result: &'static str,
}
