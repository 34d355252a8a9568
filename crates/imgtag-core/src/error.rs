//! 错误定义模块

use thiserror::Error;

/// 图像标签系统统一错误类型
#[derive(Error, Debug)]
pub enum ImgTagError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("检测服务错误: {0}")]
    Detection(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("事件格式错误: {0}")]
    Event(String),
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, ImgTagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert_to_network() {
        let err: ImgTagError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert!(matches!(err, ImgTagError::Network(_)));
        assert_eq!(err.to_string(), "网络错误: port taken");
    }
}
