//! # psxpack - PlayStation 光盘镜像批量打包工具
//!
//! 把文件、目录或通配符输入解析为文件列表，逐个交给打包阶段处理，
//! 并把进度与错误事件分发到控制台、日志文件和进度界面。
//!
//! ## 退出码
//! - `0` OK
//! - `1` ERROR
//! - `2` CANCELLED
//! - `3` INVALID_INPUT
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义与校验)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/      (输入解析、批处理、取消)
//!   │     ├── processing/ (单文件处理阶段)
//!   │     ├── notify/     (事件总线与 sink)
//!   │     └── models/     (数据模型)
//!   ├── utils/      (输出样式、进度界面)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod notify;
mod processing;
mod utils;

use batch::ExitStatus;
use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_status(&e).code());
        }
    };

    let status = match commands::run(cli) {
        Ok(status) => status,
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            if e.is_configuration() {
                ExitStatus::InvalidInput
            } else {
                ExitStatus::Error
            }
        }
    };

    std::process::exit(status.code());
}

/// 参数解析失败的退出码；`--help`/`--version` 视为成功
fn usage_status(err: &clap::Error) -> ExitStatus {
    if err.use_stderr() {
        ExitStatus::InvalidInput
    } else {
        ExitStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_are_invalid_input() {
        let err = Cli::try_parse_from(["psxpack"]).unwrap_err();
        assert_eq!(usage_status(&err), ExitStatus::InvalidInput);

        let err = Cli::try_parse_from(["psxpack", "game.bin", "--no-such-flag"]).unwrap_err();
        assert_eq!(usage_status(&err).code(), 3);
    }

    #[test]
    fn test_help_and_version_exit_ok() {
        let err = Cli::try_parse_from(["psxpack", "--help"]).unwrap_err();
        assert_eq!(usage_status(&err), ExitStatus::Ok);

        let err = Cli::try_parse_from(["psxpack", "--version"]).unwrap_err();
        assert_eq!(usage_status(&err), ExitStatus::Ok);
    }
}
