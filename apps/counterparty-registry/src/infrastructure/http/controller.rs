//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the operator command dispatcher.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::application::commands::{
    COMMAND_TABLE, CommandDispatcher, CommandOutcome, OperatorCommand,
};
use crate::application::dto::{
    CounterpartyRecordDto, ExposureUpdateDto, RegisterCounterpartyDto, RegistrationDto,
    RiskAssessmentDto, RiskMetric, RiskMetricDto,
};
use crate::application::ports::LedgerGatewayPort;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::CounterpartyId;
use crate::error::ServiceError;

use super::request::UpdateExposureRequest;
use super::response::{ApiError, CommandsResponse, GatewayHealth, HealthResponse};

/// Application state shared across handlers.
pub struct AppState<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    /// Operator command dispatcher.
    pub dispatcher: CommandDispatcher<R, G>,
    /// Ledger gateway, probed by the health check.
    pub gateway: Arc<G>,
    /// Application version.
    pub version: String,
}

impl<R, G> Clone for AppState<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            gateway: Arc::clone(&self.gateway),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<R, G>(state: AppState<R, G>) -> Router
where
    R: CounterpartyRepository + 'static,
    G: LedgerGatewayPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/commands", get(list_commands).post(run_command))
        .route("/api/v1/counterparties", post(register_counterparty))
        .route("/api/v1/counterparties/{identity}", get(show_record))
        .route(
            "/api/v1/counterparties/{identity}/exposure",
            put(update_exposure),
        )
        .route("/api/v1/counterparties/{identity}/risk", get(compute_risk))
        .route(
            "/api/v1/counterparties/{identity}/risk/{metric}",
            get(risk_metric),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<R, G>(State(state): State<AppState<R, G>>) -> impl IntoResponse
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let gateway = match state.gateway.check_connectivity().await {
        Ok(status) => GatewayHealth {
            connected: status.connected,
            endpoint: Some(status.endpoint),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Ledger probe failed");
            GatewayHealth {
                connected: false,
                endpoint: None,
                error: Some(e.to_string()),
            }
        }
    };
    let (counterparties, registry_readable) = match state.dispatcher.query_record().count().await
    {
        Ok(count) => (count, true),
        Err(e) => {
            tracing::warn!(error = %e, "Registry count failed");
            (0, false)
        }
    };

    let (status_code, status) = if gateway.connected && registry_readable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: state.version.clone(),
            gateway,
            counterparties,
        }),
    )
}

/// Command table.
async fn list_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: COMMAND_TABLE.to_vec(),
    })
}

/// Run a tagged operator command.
async fn run_command<R, G>(
    State(state): State<AppState<R, G>>,
    body: Result<Json<OperatorCommand>, JsonRejection>,
) -> Result<Json<CommandOutcome>, ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Json(command) = body?;
    let outcome = state.dispatcher.dispatch(command).await?;
    Ok(Json(outcome))
}

/// Register a counterparty.
async fn register_counterparty<R, G>(
    State(state): State<AppState<R, G>>,
    body: Result<Json<RegisterCounterpartyDto>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationDto>), ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Json(dto) = body?;
    match state.dispatcher.dispatch(OperatorCommand::Register(dto)).await? {
        CommandOutcome::Registered(registration) => Ok((StatusCode::CREATED, Json(registration))),
        other => Err(unexpected(&other)),
    }
}

/// Replace the current exposure of a counterparty.
async fn update_exposure<R, G>(
    State(state): State<AppState<R, G>>,
    identity: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateExposureRequest>, JsonRejection>,
) -> Result<Json<ExposureUpdateDto>, ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Path(identity) = identity?;
    let Json(request) = body?;
    let command = OperatorCommand::UpdateExposure(request.into_dto(identity));
    match state.dispatcher.dispatch(command).await? {
        CommandOutcome::ExposureUpdated(update) => Ok(Json(update)),
        other => Err(unexpected(&other)),
    }
}

/// All risk metrics of a counterparty.
async fn compute_risk<R, G>(
    State(state): State<AppState<R, G>>,
    identity: Result<Path<String>, PathRejection>,
) -> Result<Json<RiskAssessmentDto>, ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Path(identity) = identity?;
    match state
        .dispatcher
        .dispatch(OperatorCommand::ComputeRisk { identity })
        .await?
    {
        CommandOutcome::Risk(assessment) => Ok(Json(assessment)),
        other => Err(unexpected(&other)),
    }
}

/// A single risk metric of a counterparty.
async fn risk_metric<R, G>(
    State(state): State<AppState<R, G>>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<RiskMetricDto>, ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Path((identity, metric)) = params?;
    let metric: RiskMetric = metric.parse().map_err(ServiceError::from)?;
    let identity = CounterpartyId::parse(identity).map_err(ServiceError::from)?;
    let value = state
        .dispatcher
        .compute_risk()
        .metric(&identity, metric)
        .await?;
    Ok(Json(value))
}

/// Full record of a counterparty.
async fn show_record<R, G>(
    State(state): State<AppState<R, G>>,
    identity: Result<Path<String>, PathRejection>,
) -> Result<Json<CounterpartyRecordDto>, ApiError>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    let Path(identity) = identity?;
    match state
        .dispatcher
        .dispatch(OperatorCommand::ShowRecord { identity })
        .await?
    {
        CommandOutcome::Record(record) => Ok(Json(record)),
        other => Err(unexpected(&other)),
    }
}

fn unexpected(outcome: &CommandOutcome) -> ApiError {
    ApiError::internal(format!("unexpected command outcome: {outcome:?}"))
}
