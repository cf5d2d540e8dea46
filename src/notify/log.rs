//! # 日志文件 sink
//!
//! 每次运行一个文件，文件名为 `yyyyMMdd-hhmmss.log`（12 小时制，与原工具一致）。
//! 每条事件写一行并立即 flush；收到 `ProcessingComplete` 后关闭文件，
//! 未收到时由 `Drop` 关闭。
//!
//! ## 依赖关系
//! - 使用 `chrono` 生成时间戳
//! - 写失败时通过 `utils/output.rs` 警告一次并停止写入

use super::Sink;
use crate::error::{PackError, Result};
use crate::models::{Event, EventKind};
use crate::utils::output;

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 按时间生成日志文件名
pub fn log_file_name(time: &DateTime<Local>) -> String {
    time.format("%Y%m%d-%I%M%S.log").to_string()
}

fn level_tag(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Error => "ERROR",
        EventKind::Warning => "WARN",
        EventKind::Progress | EventKind::Size => "TRACE",
        EventKind::StageLifecycle => "DEBUG",
        _ => "INFO",
    }
}

/// 日志文件 sink
pub struct LogSink {
    path: PathBuf,
    file: Option<File>,
    /// 是否记录进度 tick
    include_progress: bool,
}

impl LogSink {
    /// 在指定目录下按当前时间创建日志
    pub fn create_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(log_file_name(&Local::now())))
    }

    /// 以追加模式打开日志文件
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PackError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;

        Ok(Self {
            path,
            file: Some(file),
            include_progress: false,
        })
    }

    pub fn with_progress(mut self, include_progress: bool) -> Self {
        self.include_progress = include_progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let written = writeln!(file, "{}", line).and_then(|_| file.flush());
        if let Err(e) = written {
            output::print_warning(&format!(
                "Failed to write log '{}': {}; logging disabled",
                self.path.display(),
                e
            ));
            self.file = None;
        }
    }
}

impl Sink for LogSink {
    fn handle(&mut self, event: &Event) {
        let kind = event.kind();
        if kind == EventKind::Progress && !self.include_progress {
            return;
        }

        let line = format!(
            "{} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_tag(kind),
            event
        );
        self.write_line(&line);

        if *event == Event::ProcessingComplete {
            self.file = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 15, 4, 9).unwrap();
        assert_eq!(log_file_name(&time), "20240307-030409.log");
    }

    #[test]
    fn test_appends_and_closes_on_complete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let mut sink = LogSink::open(path.clone()).unwrap();

        sink.handle(&Event::ProcessingStart);
        sink.handle(&Event::StageProgress {
            stage: Stage::Write,
            value: 3,
        });
        sink.handle(&Event::error("Could not find file 'a.bin'"));
        sink.handle(&Event::ProcessingComplete);
        sink.handle(&Event::info("after close"));

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[INFO] Processing started"));
        assert!(lines[1].ends_with("[ERROR] Could not find file 'a.bin'"));
        assert!(lines[2].ends_with("[INFO] Processing complete"));
    }

    #[test]
    fn test_existing_log_is_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "earlier line\n").unwrap();

        let mut sink = LogSink::open(path.clone()).unwrap().with_progress(true);
        sink.handle(&Event::StageProgress {
            stage: Stage::Write,
            value: 3,
        });
        drop(sink);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier line\n"));
        assert!(text.contains("[TRACE] Write progress: 3"));
    }

    #[test]
    fn test_create_in_uses_timestamp_name() {
        let dir = TempDir::new().unwrap();
        let sink = LogSink::create_in(dir.path()).unwrap();
        let name = sink.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "yyyymmdd-hhmmss.log".len());
        assert!(sink.path().exists());
    }
}
