use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use eventer_core::{DestinationDesc, DestinationKind, Sink};
use eventer_generator::GeneratorStatus;

use crate::http::dto::{
    AddRequest, AddResponse, GeneratorSummary, HealthResponse, OkResponse, RemoveRequest,
    StatusQuery, StatusResponse,
};
use crate::http::error::AppError;
use crate::http::state::AppState;

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { result: "OK" })
}

/// `POST /generator/add`: validates every schedule's references up front —
/// if any `event_id`/`destination_id` is unknown, nothing is registered and
/// the whole request fails with `400` (§8 scenario 6). Otherwise schedules
/// are processed in order; a fatal construction failure on one schedule
/// returns `403` immediately but leaves already-registered generators in
/// place (§9 Open Question 2).
pub async fn add_generator(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<(StatusCode, Json<AddResponse>), AppError> {
    for sched in &req.schedules {
        if !req.events.iter().any(|e| e.id == sched.event_id) {
            return Err(AppError::BadRequest(format!(
                "unknown event_id {:?}",
                sched.event_id
            )));
        }
        if !req.destinations.iter().any(|d| d.id == sched.destination_id) {
            return Err(AppError::BadRequest(format!(
                "unknown destination_id {:?}",
                sched.destination_id
            )));
        }
    }

    let mut generators = Vec::with_capacity(req.schedules.len());
    for sched in &req.schedules {
        let event_desc = req
            .events
            .iter()
            .find(|e| e.id == sched.event_id)
            .expect("validated above")
            .clone();
        let dest = req
            .destinations
            .iter()
            .find(|d| d.id == sched.destination_id)
            .expect("validated above");

        let sink = build_sink(dest, &state).await?;

        let generator = state
            .registry
            .register(event_desc, &dest.id, sink)
            .await
            .map_err(|e| AppError::SinkConnectFailed(e.to_string()))?;

        let status = GeneratorStatus::from(&*generator);
        generators.push(GeneratorSummary {
            id: status.id.to_string(),
            count: status.remaining_count,
            active: status.active,
        });
    }

    Ok((StatusCode::OK, Json(AddResponse { generators })))
}

pub async fn remove_generator(
    State(state): State<AppState>,
    Json(req): Json<RemoveRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let id: u64 = req
        .id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid generator id {:?}", req.id)))?;
    state
        .registry
        .unregister(id)
        .await
        .map_err(|_| AppError::NotFound(format!("generator {id} not found")))?;
    Ok(Json(OkResponse::default()))
}

pub async fn generator_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let id: u64 = query
        .id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid generator id {:?}", query.id)))?;
    let generator = state
        .registry
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("generator {id} not found")))?;
    let status = GeneratorStatus::from(&*generator);
    Ok(Json(StatusResponse {
        id: status.id.to_string(),
        count: status.remaining_count,
        active: status.active,
    }))
}

async fn build_sink(dest: &DestinationDesc, state: &AppState) -> Result<Arc<dyn Sink>, AppError> {
    match dest.kind {
        DestinationKind::Kafka => {
            let cfg = dest.kafka.clone().unwrap_or_default();
            state
                .kafka_pool
                .get_or_create(&dest.id, &cfg)
                .map(|s| s as Arc<dyn Sink>)
                .map_err(|e| AppError::SinkConnectFailed(e.to_string()))
        }
        DestinationKind::Postgres => {
            let cfg = dest.postgres.clone().unwrap_or_default();
            state
                .sql_pool
                .get_or_create(&dest.id, &cfg)
                .await
                .map(|s| s as Arc<dyn Sink>)
                .map_err(|e| AppError::SinkConnectFailed(e.to_string()))
        }
    }
}
