//! # 界面批处理条目
//!
//! 每个正在处理的文件对应一个条目，只由 `notify/interactive.rs` 修改，
//! 以快照形式发送给界面线程。

use std::path::PathBuf;

/// 单个文件的界面状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub max_progress: u64,
    pub progress: u64,
    pub status: String,
    pub has_error: bool,
    pub error_message: String,
}

impl BatchEntry {
    pub fn new(path: PathBuf) -> Self {
        BatchEntry {
            path,
            ..Default::default()
        }
    }
}
