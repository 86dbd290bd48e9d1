use std::sync::Arc;

use axum::{extract::Extension, Json};
use chrono::Utc;
use serde_json::Value;

use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "environment": services.environment,
    }))
}

pub async fn welcome() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Videoclub API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "api": "/api/v1",
        },
    }))
}
