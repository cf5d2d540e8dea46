//! # 控制台 sink
//!
//! 按 verbosity 过滤事件并以彩色前缀逐行输出。
//!
//! | verbosity | 输出内容 |
//! |-----------|----------|
//! | 0 | 仅错误 |
//! | 1 | + 警告、信息、文件名、批次起止 |
//! | 2 | + 阶段开始/完成/大小 |
//! | 3 | + 进度 tick |
//!
//! ## 依赖关系
//! - 使用 `utils/output.rs` 的格式化函数

use super::Sink;
use crate::models::{Event, EventKind};
use crate::utils::output;

use std::io::{self, Write};

/// 最高 verbosity，只有此级别才输出进度 tick
pub const MAX_VERBOSITY: u8 = 3;

fn required_verbosity(kind: EventKind) -> u8 {
    match kind {
        EventKind::Error => 0,
        EventKind::Warning | EventKind::Info | EventKind::FileName | EventKind::Lifecycle => 1,
        EventKind::StageLifecycle | EventKind::Size => 2,
        EventKind::Progress => MAX_VERBOSITY,
    }
}

/// 渲染一条事件
fn render(event: &Event) -> String {
    let text = event.to_string();
    match event {
        Event::Error(_) => output::format_error(&text),
        Event::Warning(_) => output::format_warning(&text),
        Event::ProcessingComplete => output::format_done(&text),
        Event::StageComplete { .. } => output::format_success(&text),
        Event::StageSize { .. } | Event::StageProgress { .. } => output::format_detail(&text),
        _ => output::format_info(&text),
    }
}

/// 控制台 sink
pub struct ConsoleSink<W: Write = io::Stdout> {
    verbosity: u8,
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(verbosity: u8) -> Self {
        Self::new(verbosity, io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(verbosity: u8, out: W) -> Self {
        Self {
            verbosity: verbosity.min(MAX_VERBOSITY),
            out,
        }
    }

    pub fn accepts(&self, kind: EventKind) -> bool {
        self.verbosity >= required_verbosity(kind)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn handle(&mut self, event: &Event) {
        if !self.accepts(event.kind()) {
            return;
        }
        // 终端写失败不影响批处理
        let _ = writeln!(self.out, "{}", render(event));
    }
}
