//! # 取消信号
//!
//! 进程级、只能置位一次的取消标志。由 Ctrl-C 或界面操作置位，
//! 批处理循环和单文件处理在检查点轮询它。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`、`processing/` 轮询
//! - 使用 `ctrlc` 捕获中断

use crate::error::Result;
use crate::utils::output;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可克隆的取消句柄，所有克隆共享同一个标志
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消。只有第一次调用返回 `true`，之后都是空操作
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 安装 Ctrl-C 处理：第一次按下时打印提示并请求取消
pub fn install_interrupt_handler(token: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || {
        if token.cancel() {
            output::print_warning("Stopping...");
        }
    })?;
    Ok(())
}
