//! # pack 命令实现
//!
//! 校验参数、解析输入、组装通知总线并运行批处理。
//!
//! ## 流程
//! 1. 校验参数，失败则不进入批处理
//! 2. 创建临时目录，安装 Ctrl-C 处理
//! 3. 解析输入得到文件列表
//! 4. 注册 sink：控制台、日志（可选）、进度界面（可选）
//! 5. 串行处理，打印失败汇总
//!
//! ## 依赖关系
//! - 使用 `cli/validate.rs` 构造选项
//! - 使用 `batch/`, `notify/`, `processing/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{cancel, BatchResult, BatchRunner, CancelToken, ExitStatus, PathResolver};
use crate::cli::{validate, Cli};
use crate::error::{PackError, Result};
use crate::models::{Event, GameDb, OverwritePolicy};
use crate::notify::console::MAX_VERBOSITY;
use crate::notify::{ConsoleSink, InteractiveSink, LogSink, NotificationBus};
use crate::processing::CopyProcessor;
use crate::utils::output;
use crate::utils::progress::ProgressView;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tabled::{Table, Tabled};

/// 失败汇总行
#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// 执行 pack 命令
pub fn execute(args: Cli) -> Result<ExitStatus> {
    output::print_header(&format!("PSXPackager v{}", env!("CARGO_PKG_VERSION")));

    let options = validate::build_options(&args)?;

    output::print_info(&format!("Input : {}", args.input));
    output::print_info(&format!("Output: {}", options.output_path.display()));
    output::print_info(&format!("Compression Level: {}", options.compression_level));
    if options.overwrite == OverwritePolicy::Overwrite {
        output::print_warning("You have chosen to overwrite all files in the output directory!");
    }
    output::print_separator();

    // 创建临时目录
    fs::create_dir_all(&options.temp_path).map_err(|e| PackError::FileWriteError {
        path: options.temp_path.display().to_string(),
        source: e,
    })?;

    let cancel = CancelToken::new();
    cancel::install_interrupt_handler(cancel.clone())?;

    // 收集输入文件
    let files = PathResolver::new(args.input.clone())
        .with_filter(args.filter.as_deref())
        .recursive(args.recursive)
        .resolve()?;

    let db = load_game_db(args.db.as_deref());

    // 注册 sink
    let mut bus = NotificationBus::new();
    let console_verbosity = if args.progress { 0 } else { options.verbosity };
    bus.add(ConsoleSink::stdout(console_verbosity));

    let mut log_path = None;
    if options.log {
        let log = LogSink::create_in(Path::new("."))?
            .with_progress(options.verbosity >= MAX_VERBOSITY);
        log_path = Some(log.path().to_path_buf());
        bus.add(log);
    }

    let view = if args.progress {
        let (tx, rx) = mpsc::channel();
        bus.add(InteractiveSink::new(tx));
        Some(ProgressView::spawn(rx))
    } else {
        None
    };

    if let Some(path) = log_path {
        bus.notify(Event::info(format!("Logging to {}", path.display())));
    }

    let mut processor = CopyProcessor::new(&db);
    let result = BatchRunner::new(cancel).run(&files, &options, &mut processor, &mut bus);

    // 释放发送端与日志文件，界面线程随之退出
    drop(bus);
    if let Some(view) = view {
        view.join();
    }

    print_summary(&result);
    Ok(result.status)
}

/// 数据库默认位置：`<可执行文件目录>/Resources/gameInfo.csv`
fn default_db_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("Resources").join("gameInfo.csv"))
}

/// 加载游戏数据库，失败时退化为空库
fn load_game_db(path: Option<&Path>) -> GameDb {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_db_path) else {
        return GameDb::empty();
    };

    match GameDb::open(&path) {
        Ok(db) if db.is_empty() => {
            output::print_warning(&format!("No titles found in {}", path.display()));
            db
        }
        Ok(db) => {
            output::print_info(&format!("Loaded {} titles from {}", db.len(), path.display()));
            db
        }
        Err(PackError::FileNotFound { .. }) => GameDb::empty(),
        Err(e) => {
            output::print_warning(&format!("{}; title lookup disabled", e));
            GameDb::empty()
        }
    }
}

fn print_summary(result: &BatchResult) {
    if !result.failures.is_empty() {
        let rows: Vec<FailureRow> = result
            .failures
            .iter()
            .map(|(file, reason)| FailureRow {
                file: file.clone(),
                reason: reason.clone(),
            })
            .collect();
        println!();
        println!("{}", Table::new(&rows));
    }

    let counts = format!(
        "{} of {} files succeeded, {} failed, {} skipped",
        result.success,
        result.total(),
        result.failed,
        result.skipped
    );
    match result.status {
        ExitStatus::Ok if result.failed == 0 => output::print_success(&counts),
        ExitStatus::Ok => output::print_warning(&counts),
        ExitStatus::Cancelled => output::print_warning(&format!("Cancelled: {}", counts)),
        ExitStatus::Error | ExitStatus::InvalidInput => output::print_error(&counts),
    }
}
