//! # 批量处理模块
//!
//! 提供输入解析、串行批处理和取消信号。
//!
//! ## 功能
//! - 自动识别输入类型（文件/目录/通配符）
//! - 收集匹配文件列表
//! - 逐个处理，单个失败不中断批次
//! - 协作式取消与结果统计
//!
//! ## 依赖关系
//! - 被 `commands/pack.rs` 使用
//! - 使用 `walkdir`, `glob` 遍历与匹配，`ctrlc` 捕获中断

pub mod cancel;
pub mod resolver;
pub mod runner;

pub use cancel::CancelToken;
pub use resolver::PathResolver;
pub use runner::{BatchResult, BatchRunner, ExitStatus};
