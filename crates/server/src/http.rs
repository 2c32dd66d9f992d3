//! HTTP Endpoints
//!
//! REST API for the lead engine dashboard backend.

use std::time::{Duration, Instant};

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use lead_engine_agent::{build_recommendations, run_improve_cycle, ImproveOutcome};
use lead_engine_core::{
    normalize_leads, FeedbackMetadata, FeedbackOutcome, Interaction, TeamMetrics,
};
use lead_engine_scoring::{self as scoring, feature_importance, score_leads_batch, MlWeights};

use crate::metrics::{metrics_handler, record_error, record_llm_latency, record_request};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );
    let timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    Router::new()
        // Dashboard endpoints
        .route("/api/health", get(health_check))
        .route("/api/config", get(get_dashboard_config))
        .route("/api/sentiment", post(analyze_sentiment))
        // Agent endpoints
        .route("/api/agent/recommend", post(recommend))
        .route("/api/agent/feedback", post(submit_feedback))
        .route("/api/agent/improve", post(improve))
        .route("/api/agent/scores", post(batch_scores))
        // Scoring config endpoints
        .route("/api/agent/config", get(get_agent_config).post(patch_agent_config))
        .route("/api/agent/config/history", get(config_history))
        .route("/api/agent/config/rollback", post(rollback_config))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:5173 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let fallback = || {
        CorsLayer::new()
            .allow_origin("http://localhost:5173".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:5173");
        return fallback();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return fallback();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // Wildcard headers are illegal alongside credentials; mirroring the
        // request's headers is the credentials-compatible equivalent.
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| json!({}))
}

/// Parse the optional interactions array leniently: malformed records are
/// dropped with a warning, never a 400.
fn parse_interactions(value: Option<&Value>) -> Vec<Interaction> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Interaction>(item.clone()) {
            Ok(interaction) => Some(interaction),
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed interaction record");
                None
            }
        })
        .collect()
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "sentimentProvider": state.sentiment_provider_name(),
    }))
}

/// Dashboard settings view: just the engagement weights.
async fn get_dashboard_config(State(state): State<AppState>) -> Json<Value> {
    let config = state.config_store.current();
    Json(json!({ "scoringWeights": config.scoring_weights }))
}

/// Sentiment analysis: cache, then LLM provider (keyword fallback on any
/// failure), then keyword analyzer.
async fn analyze_sentiment(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(text) = body.get("text").and_then(Value::as_str) else {
        return Err(bad_request("Missing or invalid text"));
    };
    record_request("sentiment");

    if let Some(hit) = state.sentiment_cache.get(text) {
        return Ok(Json(hit));
    }

    let result = match &state.llm_sentiment {
        Some(provider) => {
            let start = Instant::now();
            match provider.analyze(text).await {
                Ok(llm_result) => {
                    record_llm_latency("sentiment", start.elapsed().as_secs_f64());
                    to_json(&llm_result)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "LLM sentiment failed, using keyword analyzer");
                    record_error("llm_sentiment");
                    to_json(&scoring::analyze(text))
                }
            }
        }
        None => to_json(&scoring::analyze(text)),
    };

    state.sentiment_cache.insert(text, result.clone());
    Ok(Json(result))
}

/// Recommendations: TTL cache, then the tool-calling agent when configured
/// (fallback ranker on agent failure), else the fallback ranker.
async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let leads_raw = body
        .get("leads")
        .and_then(Value::as_array)
        .filter(|leads| !leads.is_empty())
        .ok_or_else(|| bad_request("Missing or invalid leads array"))?;
    record_request("recommend");

    let leads = normalize_leads(leads_raw.clone());
    let interactions = parse_interactions(body.get("interactions"));
    let team_metrics: TeamMetrics = body
        .get("teamMetrics")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    if let Some(hit) = state.recommend_cache.get(&leads, &team_metrics, &interactions) {
        tracing::debug!("serving recommendations from cache");
        return Ok(Json(to_json(&hit)));
    }

    let config = state.config_store.current();
    let recommendations = match &state.engine {
        Some(engine) => {
            let start = Instant::now();
            match engine
                .recommend(&leads, &interactions, &team_metrics, &config)
                .await
            {
                Ok(result) => {
                    record_llm_latency("recommend", start.elapsed().as_secs_f64());
                    result
                }
                Err(err) => {
                    tracing::warn!(error = %err, "agent failed, using fallback ranker");
                    record_error("agent");
                    build_recommendations(&leads, &interactions, &config)
                }
            }
        }
        None => build_recommendations(&leads, &interactions, &config),
    };

    state
        .recommend_cache
        .insert(&leads, &team_metrics, &interactions, recommendations.clone());
    Ok(Json(to_json(&recommendations)))
}

/// Record recommendation feedback. 201 with the stored record.
async fn submit_feedback(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let Some(lead_id) = body.get("leadId").and_then(Value::as_str) else {
        return Err(bad_request("Missing leadId"));
    };
    let outcome: FeedbackOutcome =
        serde_json::from_value(body.get("outcomeType").cloned().unwrap_or(Value::Null))
            .map_err(|_| bad_request("Missing or invalid outcomeType"))?;
    record_request("feedback");

    let recommendation_id = body
        .get("recommendationId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let metadata: FeedbackMetadata = body
        .get("metadata")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let record = state
        .feedback
        .add(lead_id.to_string(), outcome, recommendation_id, metadata);
    Ok((StatusCode::CREATED, Json(to_json(&record))))
}

/// Run the improve cycle over the recent feedback window.
async fn improve(State(state): State<AppState>) -> Json<Value> {
    record_request("improve");
    match run_improve_cycle(&state.feedback, &state.config_store) {
        ImproveOutcome::NoFeedback => Json(json!({
            "success": true,
            "message": "No recent feedback to improve from",
        })),
        ImproveOutcome::Updated(config) => Json(json!({
            "success": true,
            "message": "Config updated",
            "config": config,
        })),
    }
}

/// Batch ML scores with per-feature contributions.
async fn batch_scores(
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let leads_raw = body
        .get("leads")
        .and_then(Value::as_array)
        .filter(|leads| !leads.is_empty())
        .ok_or_else(|| bad_request("Missing or invalid leads array"))?;
    record_request("scores");

    let leads = normalize_leads(leads_raw.clone());
    let interactions = parse_interactions(body.get("interactions"));
    let weights = MlWeights::default();
    let scores = score_leads_batch(&leads, &interactions, &weights);

    Ok(Json(json!({
        "scores": scores,
        "featureImportance": feature_importance(&weights),
    })))
}

/// Full current scoring config.
async fn get_agent_config(State(state): State<AppState>) -> Json<Value> {
    Json(to_json(&state.config_store.current()))
}

/// Apply a partial config patch; invalid fields are dropped, valid ones
/// applied, and the version always advances.
async fn patch_agent_config(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_request("config_patch");
    let updated = state.config_store.apply_patch(&body);
    Json(to_json(&updated))
}

/// Version history, oldest first.
async fn config_history(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "history": state.config_store.history() }))
}

/// Restore a historical config version.
async fn rollback_config(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(version) = body.get("version").and_then(Value::as_u64) else {
        return Err(bad_request("Missing version"));
    };
    record_request("config_rollback");

    match state.config_store.rollback(version) {
        Some(config) => Ok(Json(to_json(&config))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Version not found" })),
        )),
    }
}
