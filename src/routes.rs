use crate::config::Config;
use crate::diagnosis::{self, DiagnosisResult};
use crate::error::AppError;
use crate::portfolio::PortfolioPage;
use crate::upload_client::UploadClientPage;
use crate::vision::VisionModel;
use anyhow::{anyhow, Context};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<dyn VisionModel>,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn VisionModel>) -> Self {
        Self {
            config: Arc::new(config),
            model,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiagnoseRequest {
    #[serde(default)]
    image: Value,
}

/// `null`, `false`, `0` and `""` all count as "no image", like a JS falsy check.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

async fn diagnose_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DiagnosisResult>, AppError> {
    let request: DiagnoseRequest =
        serde_json::from_slice(&body).context("diagnose request body is not valid JSON")?;

    if is_falsy(&request.image) {
        return Err(AppError::Validation);
    }
    let Value::String(image) = request.image else {
        return Err(anyhow!("`image` is not a string").into());
    };

    let result = diagnosis::diagnose(state.model.as_ref(), &image).await?;
    Ok(Json(result))
}

async fn portfolio_page() -> PortfolioPage {
    PortfolioPage::new()
}

async fn upload_client_page() -> UploadClientPage {
    UploadClientPage::default()
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "papaji",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(state.config.static_dir.join("images"));
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(portfolio_page))
        .route("/papaji", get(upload_client_page))
        .route("/health", get(health))
        .route("/api/diagnose", post(diagnose_image).layer(body_limit))
        .nest_service("/images", images)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values_match_javascript() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&falsy), "{falsy}");
        }
        for truthy in [json!(true), json!(1), json!("data:"), json!([]), json!({})] {
            assert!(!is_falsy(&truthy), "{truthy}");
        }
    }
}
