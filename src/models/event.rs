//! # 通知事件模型
//!
//! 处理过程与观察者之间唯一的通信通道。事件是不可变的值，创建后只被消费。
//!
//! ## 依赖关系
//! - 被 `notify/` 的所有 sink 使用
//! - 被 `batch/runner.rs` 和 `processing/` 产生

use std::fmt;
use std::path::PathBuf;

/// 单文件处理的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Convert,
    Write,
    Decompress,
}

impl Stage {
    /// 界面上显示的当前动作
    pub fn action_label(&self, disc: Option<u32>) -> String {
        match (self, disc) {
            (Stage::Extract, _) => "Extracting".to_string(),
            (Stage::Convert, _) => "Converting".to_string(),
            (Stage::Write, Some(disc)) => format!("Writing Disc {}", disc),
            (Stage::Write, None) => "Writing".to_string(),
            (Stage::Decompress, _) => "Decompressing".to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "Extract"),
            Stage::Convert => write!(f, "Convert"),
            Stage::Write => write!(f, "Write"),
            Stage::Decompress => write!(f, "Decompress"),
        }
    }
}

/// 事件大类，供 sink 过滤
///
/// 声明顺序即噪声从低到高的顺序，控制台按它与 verbosity 比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Error,
    Warning,
    Info,
    FileName,
    Lifecycle,
    StageLifecycle,
    Size,
    Progress,
}

/// 通知事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// 整个批处理开始
    ProcessingStart,
    /// 整个批处理结束（每次运行恰好一次）
    ProcessingComplete,
    /// 阶段开始；写入阶段附带光盘序号
    StageStart { stage: Stage, disc: Option<u32> },
    /// 阶段总量已知，重置该阶段的进度上限
    StageSize { stage: Stage, size: u64 },
    /// 阶段进度
    StageProgress { stage: Stage, value: u64 },
    /// 阶段完成
    StageComplete { stage: Stage },
    /// 开始处理某个文件
    FileName(PathBuf),
    Info(String),
    Warning(String),
    Error(String),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ProcessingStart | Event::ProcessingComplete => EventKind::Lifecycle,
            Event::StageStart { .. } | Event::StageComplete { .. } => EventKind::StageLifecycle,
            Event::StageSize { .. } => EventKind::Size,
            Event::StageProgress { .. } => EventKind::Progress,
            Event::FileName(_) => EventKind::FileName,
            Event::Info(_) => EventKind::Info,
            Event::Warning(_) => EventKind::Warning,
            Event::Error(_) => EventKind::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Event::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Event::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Event::Error(msg.into())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ProcessingStart => write!(f, "Processing started"),
            Event::ProcessingComplete => write!(f, "Processing complete"),
            Event::StageStart { stage, disc } => write!(f, "{}", stage.action_label(*disc)),
            Event::StageSize { stage, size } => write!(f, "{} size: {} bytes", stage, size),
            Event::StageProgress { stage, value } => write!(f, "{} progress: {}", stage, value),
            Event::StageComplete { stage } => write!(f, "{} complete", stage),
            Event::FileName(path) => write!(f, "Processing {}", path.display()),
            Event::Info(msg) | Event::Warning(msg) | Event::Error(msg) => write!(f, "{}", msg),
        }
    }
}
