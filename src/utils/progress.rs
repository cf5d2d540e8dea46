//! # 进度界面
//!
//! 在独立线程上运行的终端进度视图，消费 `notify/interactive.rs` 发来的
//! [`UiMessage`]，每个文件一个 `indicatif` 进度条。显示状态只在此线程上修改。
//!
//! ## 依赖关系
//! - 被 `commands/pack.rs` 启动
//! - 使用 `indicatif` crate

use crate::models::BatchEntry;
use crate::notify::UiMessage;
use crate::utils::output;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

/// 单个文件的进度条样式
fn entry_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {prefix} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

/// 创建条目进度条
fn create_entry_bar(entry: &BatchEntry) -> ProgressBar {
    let pb = ProgressBar::new(entry.max_progress.max(1));
    pb.set_style(entry_style());
    let name = entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.path.display().to_string());
    pb.set_prefix(name);
    pb.set_message("Pending");
    pb
}

/// 把条目快照应用到进度条
fn apply(pb: &ProgressBar, entry: &BatchEntry) {
    pb.set_length(entry.max_progress.max(1));
    pb.set_position(entry.progress);
    if entry.has_error {
        let reason = entry.error_message.lines().last().unwrap_or("Error");
        pb.abandon_with_message(output::format_error(reason));
    } else {
        pb.set_message(entry.status.clone());
    }
}

/// 界面线程句柄
pub struct ProgressView {
    handle: JoinHandle<()>,
}

impl ProgressView {
    /// 启动界面线程；发送端全部释放或收到 `Finished` 时退出
    pub fn spawn(rx: Receiver<UiMessage>) -> Self {
        let handle = thread::spawn(move || run_view(rx));
        Self { handle }
    }

    /// 等待界面线程刷新完最后的状态
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

fn run_view(rx: Receiver<UiMessage>) {
    let multi = MultiProgress::new();
    let mut bars: Vec<ProgressBar> = Vec::new();

    for message in rx {
        match message {
            UiMessage::EntryAdded { entry, .. } => {
                // 上一个文件已经结束
                if let Some(prev) = bars.last() {
                    if !prev.is_finished() {
                        prev.finish();
                    }
                }
                bars.push(multi.add(create_entry_bar(&entry)));
            }
            UiMessage::EntryChanged { index, entry } => {
                if let Some(pb) = bars.get(index) {
                    if !pb.is_finished() {
                        apply(pb, &entry);
                    }
                }
            }
            UiMessage::Notice(text) => {
                let _ = multi.println(output::format_error(&text));
            }
            UiMessage::Finished => break,
        }
    }

    for pb in &bars {
        if !pb.is_finished() {
            pb.finish();
        }
    }
}
