//! # 命令执行模块
//!
//! 实现打包命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `notify/`, `processing/`, `models/`
//! - 子模块: pack

pub mod pack;

use crate::batch::ExitStatus;
use crate::cli::Cli;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<ExitStatus> {
    pack::execute(cli)
}
