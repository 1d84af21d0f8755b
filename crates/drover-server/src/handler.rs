use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use drover_sdk::{ArrivalAmendment, CalfIntake, Drover, LoadRequest};
use drover_stockyard::{Calf, CalfLoad, Ranch, RanchDraft, RanchRollup, TimelineEntry, TransferReceipt};
use drover_types::{CalfId, LoadId, RanchId};

use crate::config::ServerConfig;
use crate::error::{ApiError, ServerResult};
use crate::identity::{Credentials, IdentityProvider};

/// Shared request state: the domain facade, the identity provider, and
/// the server configuration.
#[derive(Clone)]
pub struct AppState {
    pub drover: Arc<Drover>,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(
        drover: Arc<Drover>,
        identity: Arc<dyn IdentityProvider>,
        config: ServerConfig,
    ) -> Self {
        Self {
            drover,
            identity,
            config,
        }
    }

    /// Resolve the acting user for a mutating request.
    async fn actor(&self, headers: &HeaderMap) -> ServerResult<Option<String>> {
        let credentials = Credentials::from_headers(headers);
        let actor = self.identity.resolve(&credentials).await;
        if actor.is_none() && !self.config.allow_anonymous_write {
            return Err(ApiError::Unauthenticated);
        }
        Ok(actor)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "drover-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn create_ranch(
    State(state): State<AppState>,
    Json(draft): Json<RanchDraft>,
) -> ServerResult<(StatusCode, Json<Ranch>)> {
    let ranch = state.drover.create_ranch(draft)?;
    Ok((StatusCode::CREATED, Json(ranch)))
}

pub async fn list_ranches(State(state): State<AppState>) -> ServerResult<Json<Vec<Ranch>>> {
    Ok(Json(state.drover.ranches()?))
}

pub async fn inventory(
    State(state): State<AppState>,
    Path(ranch): Path<RanchId>,
) -> ServerResult<Json<Vec<Calf>>> {
    Ok(Json(state.drover.inventory(ranch)?))
}

pub async fn ranch_rollup(
    State(state): State<AppState>,
    Path(ranch): Path<RanchId>,
) -> ServerResult<Json<RanchRollup>> {
    Ok(Json(state.drover.ranch_rollup(ranch)?))
}

pub async fn admit_calf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(intake): Json<CalfIntake>,
) -> ServerResult<(StatusCode, Json<Calf>)> {
    let actor = state.actor(&headers).await?;
    let calf = state.drover.admit(intake, actor.as_deref())?;
    Ok((StatusCode::CREATED, Json(calf)))
}

/// Summary returned by bulk intake: a failing row never blocks the rest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub admitted: usize,
    pub failures: Vec<BatchFailureBody>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchFailureBody {
    pub index: usize,
    pub primary_id: String,
    pub detail: String,
}

pub async fn admit_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(rows): Json<Vec<CalfIntake>>,
) -> ServerResult<Json<BatchSummary>> {
    let actor = state.actor(&headers).await?;
    let outcome = state.drover.admit_batch(rows, actor.as_deref());
    Ok(Json(BatchSummary {
        admitted: outcome.admitted.len(),
        failures: outcome
            .failures
            .into_iter()
            .map(|f| BatchFailureBody {
                index: f.index,
                primary_id: f.primary_id,
                detail: f.error.to_string(),
            })
            .collect(),
    }))
}

pub async fn movement_history(
    State(state): State<AppState>,
    Path(calf): Path<CalfId>,
) -> ServerResult<Json<Vec<TimelineEntry>>> {
    Ok(Json(state.drover.movement_history(calf)?))
}

pub async fn create_load(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoadRequest>,
) -> ServerResult<(StatusCode, Json<TransferReceipt>)> {
    let actor = state.actor(&headers).await?;
    let receipt = state.drover.ship(request, actor.as_deref())?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn set_arrival_status(
    State(state): State<AppState>,
    Path((load, calf)): Path<(LoadId, CalfId)>,
    Json(amendment): Json<ArrivalAmendment>,
) -> ServerResult<Json<CalfLoad>> {
    let link = state
        .drover
        .set_arrival_status(load, calf, amendment.arrival_status)?;
    Ok(Json(link))
}
