//! # 数据模型模块
//!
//! 定义批处理过程中流转的数据：通知事件、处理选项、界面条目和游戏数据库。
//!
//! ## 依赖关系
//! - 被 `batch/`, `notify/`, `processing/` 和 `commands/` 使用
//! - 子模块: event, options, entry, game_db

pub mod entry;
pub mod event;
pub mod game_db;
pub mod options;

pub use entry::BatchEntry;
pub use event::{Event, EventKind, Stage};
pub use game_db::GameDb;
pub use options::{OverwritePolicy, ProcessOptions, ResourceMode};
