//! # 单文件处理模块
//!
//! 批处理循环通过 [`FileProcessor`] 调用外部的打包/转换引擎。
//! 引擎在执行过程中自行发出阶段事件，并在长循环中轮询取消信号。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 子模块: copy（内置的替身阶段）, naming（输出命名模板）

pub mod copy;
pub mod naming;

pub use copy::CopyProcessor;

use crate::batch::CancelToken;
use crate::models::ProcessOptions;
use crate::notify::Sink;

use std::path::Path;

/// 单文件处理操作
pub trait FileProcessor {
    /// 处理一个文件，返回是否成功
    ///
    /// 失败通过返回值和 `Event::Error` 报告，不 panic。
    /// 观察到取消后应尽快返回 `false`。
    fn process(
        &mut self,
        path: &Path,
        options: &ProcessOptions,
        notifier: &mut dyn Sink,
        cancel: &CancelToken,
    ) -> bool;
}
