use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use flight_delay::{
    config::Config, form::FlightForm, PredictError, Predictor, PredictorStatus, ProbabilityPair,
    RawFlightRecord,
};

// ---------- Response types ----------

#[derive(serde::Serialize)]
struct Out {
    not_delayed: f64,
    delayed: f64,
    delayed_percent: String,
}

impl From<ProbabilityPair> for Out {
    fn from(p: ProbabilityPair) -> Self {
        Self {
            not_delayed: p.not_delayed,
            delayed: p.delayed,
            delayed_percent: p.delayed_percent(),
        }
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(e: PredictError) -> ApiError {
    let status = match &e {
        PredictError::UnknownCategory(_)
        | PredictError::UnknownAirport(_)
        | PredictError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PredictError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        PredictError::ShapeMismatch { .. }
        | PredictError::Inference(_)
        | PredictError::ModelLoad { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

// Extractor failures (missing field, wrong type, bad content type) get the
// same JSON error body as pipeline errors.
fn rejected(body_text: String) -> ApiError {
    api_error(PredictError::InvalidInput(body_text))
}

// ---------- Server state ----------

#[derive(Clone)]
struct AppState {
    predictor: Arc<Predictor>,
    log_predictions: bool,
}

impl AppState {
    /// `record` must already be normalized and validated.
    fn run(&self, record: RawFlightRecord) -> Result<Json<Out>, ApiError> {
        let probs = self.predictor.forward(&record).map_err(api_error)?;
        if self.log_predictions {
            tracing::info!(
                "predict carrier={} {}->{} month={} dow={} dep={} arr={} delayed={:.3}",
                record.carrier,
                record.origin_airport,
                record.dest_airport,
                record.month,
                record.day_of_week,
                record.dep_time,
                record.arr_time,
                probs.delayed
            );
        }
        Ok(Json(probs.into()))
    }
}

// ---------- Handlers ----------

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawFlightRecord>, JsonRejection>,
) -> Result<Json<Out>, ApiError> {
    let Json(mut record) = payload.map_err(|rej| rejected(rej.body_text()))?;
    record.normalize_codes();
    record.validate().map_err(api_error)?;
    state.run(record)
}

async fn submit_data(
    State(state): State<AppState>,
    payload: Result<Form<FlightForm>, FormRejection>,
) -> Result<Json<Out>, ApiError> {
    let Form(form) = payload.map_err(|rej| rejected(rej.body_text()))?;
    // into_record normalizes and validates
    let record = form.into_record().map_err(api_error)?;
    state.run(record)
}

async fn status(State(state): State<AppState>) -> Json<PredictorStatus> {
    Json(state.predictor.status())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/submit_data", post(submit_data))
        .route("/status", get(status))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env()?;
    let addr = cfg.socket_addr()?;

    let predictor = Predictor::new(cfg.missing_coords);
    predictor.load(&cfg.artifact_paths())?;

    // Exercise scaler + classifier once before taking traffic
    let warm = predictor.warmup()?;
    tracing::info!("warmup forward ok (p_delayed at origin = {:.3})", warm.delayed);

    let state = AppState {
        predictor: Arc::new(predictor),
        log_predictions: cfg.log_predictions,
    };

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
