//! imgtag服务器主程序

mod settings;

use anyhow::Context;
use clap::{Parser, Subcommand};
use imgtag_core::{utils::normalize_tag, IngestionOutcome};
use imgtag_storage::{LabelStore, QueryService};
use imgtag_vision::{HttpDetectionClient, LabelingPipeline};
use imgtag_web::{AppState, Ingestor, WebServer};
use settings::Settings;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// imgtag服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "imgtag-server")]
#[command(about = "图像标签提取与检索服务")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动HTTP服务（默认）
    Serve {
        /// 服务器端口，覆盖配置文件
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// 处理一个对象创建事件文件后退出
    Ingest {
        /// 事件JSON文件
        event: PathBuf,
    },
    /// 按标签查询记录并输出结果
    Search {
        /// 标签，省略时返回全部记录
        #[arg(short, long)]
        tag: Option<String>,
    },
}

fn build_ingestor(settings: &Settings, store: Arc<dyn LabelStore>) -> anyhow::Result<Ingestor> {
    let client = HttpDetectionClient::new(&settings.detection.http_config())?;
    let pipeline = LabelingPipeline::new(Arc::new(client), settings.detection.label_options());
    Ok(Ingestor::new(pipeline, store))
}

async fn serve(settings: Settings, port: Option<u16>) -> anyhow::Result<()> {
    let table = settings.store.ingest_table()?;
    let store: Arc<dyn LabelStore> = Arc::new(settings.store.open(table)?);

    info!("imgtag服务器配置:");
    info!("  记录表: {}", table);
    info!("  存储后端: {:?}", settings.store.backend);
    info!("  检测服务: {}", settings.detection.endpoint);

    let state = AppState {
        query: QueryService::new(store.clone()),
        ingestor: build_ingestor(&settings, store)?,
    };

    let port = port.unwrap_or(settings.server.port);
    let addr: SocketAddr = format!("{}:{}", settings.server.host, port)
        .parse()
        .context("Invalid listen address")?;

    WebServer::new(addr, state).run().await?;
    Ok(())
}

async fn ingest_file(settings: Settings, event: PathBuf) -> anyhow::Result<IngestionOutcome> {
    settings.store.require_persistent()?;
    let table = settings.store.ingest_table()?;
    let store: Arc<dyn LabelStore> = Arc::new(settings.store.open(table)?);
    let ingestor = build_ingestor(&settings, store)?;

    let payload = tokio::fs::read(&event)
        .await
        .with_context(|| format!("Failed to read event file {}", event.display()))?;

    Ok(ingestor.handle_payload(&payload).await)
}

async fn search(settings: Settings, tag: Option<String>) -> anyhow::Result<serde_json::Value> {
    settings.store.require_persistent()?;
    let table = settings.store.query_table();
    let store: Arc<dyn LabelStore> = Arc::new(settings.store.open(table)?);
    let service = QueryService::new(store);

    let tag = tag.as_deref().and_then(normalize_tag);
    let results = service.search(tag.as_deref()).await?;
    Ok(serde_json::json!({ "results": results }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .init();

    let settings = Settings::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            info!("启动imgtag服务器...");
            if let Err(e) = serve(settings, port).await {
                error!("服务器启动失败: {}", e);
                return Err(e);
            }
        }
        Command::Ingest { event } => {
            let outcome = ingest_file(settings, event).await?;
            println!("{}", serde_json::to_string(&outcome)?);
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Command::Search { tag } => {
            let body = search(settings, tag).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
