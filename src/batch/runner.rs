//! # 批量执行器
//!
//! 按解析顺序逐个处理文件（严格串行），汇总结果并响应取消。
//!
//! ## 功能
//! - 0 个文件：报错并返回 ERROR，不进入循环
//! - 1 个文件：文件缺失返回 INVALID_INPUT；失败返回 ERROR 或 CANCELLED
//! - 多个文件：缺失的文件跳过并报告，单个文件失败不中断批次；
//!   每个文件之后检查取消信号
//! - `ProcessingStart` / `ProcessingComplete` 以及 "<n> files processed"
//!   由作用域守卫发出，任何退出路径（包括 panic 展开）都会触发
//!
//! ## 依赖关系
//! - 被 `commands/pack.rs` 调用
//! - 使用 `processing::FileProcessor` 处理单个文件
//! - 事件发往 `notify::Sink`

use super::cancel::CancelToken;
use crate::models::{Event, ProcessOptions};
use crate::notify::Sink;
use crate::processing::FileProcessor;

use std::path::{Path, PathBuf};

/// 进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitStatus {
    #[default]
    Ok = 0,
    Error = 1,
    Cancelled = 2,
    InvalidInput = 3,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（文件在解析后消失）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
    /// 处理中途被取消
    Cancelled(String),
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 整体退出状态
    pub status: ExitStatus,
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 中途取消数量
    pub cancelled: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
            ProcessResult::Cancelled(_) => self.cancelled += 1,
        }
    }

    /// 实际调用过处理操作的文件数
    pub fn processed(&self) -> usize {
        self.success + self.failed + self.cancelled
    }

    /// 总数量
    pub fn total(&self) -> usize {
        self.processed() + self.skipped
    }
}

/// 作用域守卫：打开时发出 `ProcessingStart`，析构时发出摘要和 `ProcessingComplete`
struct BatchScope<'a> {
    sink: &'a mut dyn Sink,
    /// 多文件模式下的已处理计数，`None` 表示不发摘要
    processed: Option<usize>,
}

impl<'a> BatchScope<'a> {
    fn open(sink: &'a mut dyn Sink) -> Self {
        sink.handle(&Event::ProcessingStart);
        Self {
            sink,
            processed: None,
        }
    }

    fn notify(&mut self, event: Event) {
        self.sink.handle(&event);
    }
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        if let Some(count) = self.processed {
            self.sink
                .handle(&Event::info(format!("{} files processed", count)));
        }
        self.sink.handle(&Event::ProcessingComplete);
    }
}

/// 转发事件并记住最近一条错误，用于失败汇总
struct ErrorTap<'a> {
    inner: &'a mut dyn Sink,
    last_error: Option<String>,
}

impl Sink for ErrorTap<'_> {
    fn handle(&mut self, event: &Event) {
        if let Event::Error(msg) = event {
            self.last_error = Some(msg.clone());
        }
        self.inner.handle(event);
    }
}

/// 批量执行器
pub struct BatchRunner {
    cancel: CancelToken,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// 串行处理文件列表
    pub fn run(
        &self,
        files: &[PathBuf],
        options: &ProcessOptions,
        processor: &mut dyn FileProcessor,
        sink: &mut dyn Sink,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        let mut scope = BatchScope::open(sink);

        match files {
            [] => {
                scope.notify(Event::error("No files matched!"));
                result.status = ExitStatus::Error;
            }
            [file] => self.run_single(file, options, processor, &mut scope, &mut result),
            _ => self.run_many(files, options, processor, &mut scope, &mut result),
        }

        drop(scope);
        result
    }

    fn run_single(
        &self,
        file: &Path,
        options: &ProcessOptions,
        processor: &mut dyn FileProcessor,
        scope: &mut BatchScope<'_>,
        result: &mut BatchResult,
    ) {
        if !file.exists() {
            scope.notify(missing_file(file));
            result.merge(ProcessResult::Skipped(file.display().to_string()));
            result.status = ExitStatus::InvalidInput;
            return;
        }

        scope.notify(Event::FileName(file.to_path_buf()));

        result.status = if self.process_one(file, options, processor, scope.sink, result) {
            ExitStatus::Ok
        } else if self.cancel.is_cancelled() {
            ExitStatus::Cancelled
        } else {
            ExitStatus::Error
        };
    }

    fn run_many(
        &self,
        files: &[PathBuf],
        options: &ProcessOptions,
        processor: &mut dyn FileProcessor,
        scope: &mut BatchScope<'_>,
        result: &mut BatchResult,
    ) {
        scope.notify(Event::info(format!("Matched {} files", files.len())));
        scope.processed = Some(0);

        let mut attempts = 0;
        for file in files {
            if self.cancel.is_cancelled() {
                result.status = ExitStatus::Cancelled;
                break;
            }

            if !file.exists() {
                scope.notify(missing_file(file));
                result.merge(ProcessResult::Skipped(file.display().to_string()));
                continue;
            }

            scope.notify(Event::info(format!(
                "Processing {} of {}",
                attempts + 1,
                files.len()
            )));
            scope.notify(Event::FileName(file.clone()));

            self.process_one(file, options, processor, scope.sink, result);
            attempts += 1;
            scope.processed = Some(attempts);

            if self.cancel.is_cancelled() {
                result.status = ExitStatus::Cancelled;
                break;
            }
        }
    }

    /// 处理单个文件并记录结果
    fn process_one(
        &self,
        file: &Path,
        options: &ProcessOptions,
        processor: &mut dyn FileProcessor,
        sink: &mut dyn Sink,
        result: &mut BatchResult,
    ) -> bool {
        let path = file.display().to_string();
        let mut tap = ErrorTap {
            inner: sink,
            last_error: None,
        };

        let ok = processor.process(file, options, &mut tap, &self.cancel);

        if ok {
            result.merge(ProcessResult::Success(path));
        } else if self.cancel.is_cancelled() {
            result.merge(ProcessResult::Cancelled(path));
        } else {
            let reason = match tap.last_error.take() {
                Some(reason) => reason,
                None => {
                    let reason = format!("Failed to process '{}'", path);
                    tap.handle(&Event::error(reason.clone()));
                    reason
                }
            };
            result.merge(ProcessResult::Failed(path, reason));
        }

        ok
    }
}

fn missing_file(file: &Path) -> Event {
    Event::error(format!("Could not find file '{}'", file.display()))
}
