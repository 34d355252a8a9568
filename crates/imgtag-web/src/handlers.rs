//! HTTP处理器

use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
};
use imgtag_core::utils::normalize_tag;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

/// 所有检索响应携带的跨域头
pub fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET,OPTIONS"),
    ]
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "imgtag API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "search": "/search",
            "events": "/events"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 检索参数
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub tag: Option<String>,
}

/// 标签检索处理器
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    info!("Search request: {:?}", params);

    // 存储中的标签均为小写
    let tag = params.tag.as_deref().and_then(normalize_tag);

    match state.query.search(tag.as_deref()).await {
        Ok(results) => (StatusCode::OK, cors_headers(), Json(json!({ "results": results }))).into_response(),
        Err(e) => {
            error!("Search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                cors_headers(),
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// 跨域预检处理器
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, cors_headers())
}

/// 对象创建事件处理器
pub async fn ingest_event(State(state): State<AppState>, body: Bytes) -> Response {
    let outcome = state.ingestor.handle_payload(&body).await;
    let status = StatusCode::from_u16(outcome.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(outcome)).into_response()
}
