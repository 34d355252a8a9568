//! Web服务器

use crate::handlers::{api_root, health, ingest_event, preflight, search};
use crate::ingest::Ingestor;
use axum::{
    routing::{get, post},
    Router,
};
use imgtag_core::Result;
use imgtag_storage::QueryService;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
    pub ingestor: Ingestor,
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = Self::create_app(state);
        Self { addr, app }
    }

    pub fn create_app(state: AppState) -> Router {
        Router::new()
            // 根路径
            .route("/", get(api_root))

            // 健康检查
            .route("/health", get(health))

            // 标签检索
            .route("/search", get(search).options(preflight))

            // 对象创建事件
            .route("/events", post(ingest_event))

            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app).await?;

        Ok(())
    }
}
