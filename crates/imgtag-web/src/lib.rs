//! # imgtag Web模块
//!
//! 提供HTTP接口：标签检索、跨域预检、对象创建事件摄取与健康检查。

pub mod handlers;
pub mod ingest;
pub mod server;

pub use ingest::Ingestor;
pub use server::{AppState, WebServer};
