//! # imgtag 存储模块
//!
//! 负责标签记录的持久化与检索：
//! - 以图像ID为键的记录存储接口
//! - 基于对象存储的实现（内存 / S3）
//! - 兼容历史字段名的记录解码
//! - 按标签过滤的查询服务

pub mod object;
pub mod query;
pub mod schema;
pub mod store;

pub use object::ObjectLabelStore;
pub use query::QueryService;
pub use schema::{decode_item, RecordSchema};
pub use store::LabelStore;
