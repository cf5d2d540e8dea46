//! # 统一错误处理模块
//!
//! 定义 psxpack 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个文件的处理失败不走这里：它们以 `Event::Error` 的形式发到通知总线，
//! 不会中断批处理。这里只收录会终止整个命令的错误。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// psxpack 统一错误类型
#[derive(Error, Debug)]
pub enum PackError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid compression level {0}, please enter a value from 0 to 9")]
    InvalidCompressionLevel(i32),

    #[error("Invalid disc list '{0}', please enter a comma separated list of values from 1-5")]
    InvalidDiscs(String),

    #[error("Invalid option, please select only one of extract, import, or generate")]
    ConflictingResourceModes,

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 数据库错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to load game database: {path}")]
    DatabaseError {
        path: String,
        #[source]
        source: csv::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to install Ctrl-C handler: {0}")]
    SignalError(#[from] ctrlc::Error),
}

impl PackError {
    /// 是否属于用户输入错误（对应退出码 INVALID_INPUT）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PackError::InvalidCompressionLevel(_)
                | PackError::InvalidDiscs(_)
                | PackError::ConflictingResourceModes
                | PackError::InvalidPattern { .. }
                | PackError::InvalidArgument(_)
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PackError>;
