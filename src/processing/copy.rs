//! # 内置替身处理阶段
//!
//! 不做任何格式转换：把源镜像分块经临时目录写入输出目录，
//! 发出写入阶段的 start/size/progress/complete 事件，每块之后检查取消。
//! 真正的打包引擎通过 [`FileProcessor`] 接入。
//!
//! ## 功能
//! - 按命名模板决定输出文件名
//! - 已存在文件按 `OverwritePolicy` 覆盖、跳过或报错
//! - `GenerateFolders` 模式只创建资源目录
//! - 取消时删除临时文件，不留半成品
//!
//! ## 依赖关系
//! - 实现 `processing::FileProcessor`
//! - 使用 `processing/naming.rs`, `models/game_db.rs`

use super::naming::{self, NameVars};
use super::FileProcessor;
use crate::batch::CancelToken;
use crate::error::{PackError, Result};
use crate::models::{Event, GameDb, OverwritePolicy, ProcessOptions, ResourceMode, Stage};
use crate::notify::Sink;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// 写入阶段使用的光盘序号
const DISC: u32 = 1;

/// 输出文件扩展名，与打包引擎的产物一致
const OUTPUT_EXTENSION: &str = "pbp";

/// 复制处理器
pub struct CopyProcessor<'a> {
    db: &'a GameDb,
    chunk_size: usize,
}

impl<'a> CopyProcessor<'a> {
    pub fn new(db: &'a GameDb) -> Self {
        Self {
            db,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[cfg(test)]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn try_process(
        &self,
        path: &Path,
        options: &ProcessOptions,
        notifier: &mut dyn Sink,
        cancel: &CancelToken,
    ) -> Result<bool> {
        let vars = NameVars::for_file(path, self.db);

        match options.resource_mode {
            ResourceMode::GenerateFolders => {
                return generate_resource_folder(&vars, options, notifier);
            }
            ResourceMode::Extract | ResourceMode::Import => {
                notifier.handle(&Event::warning(
                    "Resource extract/import requires the packaging engine; copying image only",
                ));
            }
            ResourceMode::None => {}
        }

        if !options.discs.contains(&DISC) {
            notifier.handle(&Event::info(format!(
                "Disc {} not selected, nothing to write for '{}'",
                DISC,
                path.display()
            )));
            return Ok(true);
        }

        let target = output_file(&vars, options);
        if is_same_file(path, &target) {
            notifier.handle(&Event::error(format!(
                "Output file '{}' is the input file, choose another output directory",
                target.display()
            )));
            return Ok(false);
        }
        if target.exists() {
            match options.overwrite {
                OverwritePolicy::Overwrite => {}
                OverwritePolicy::Skip => {
                    notifier.handle(&Event::info(format!(
                        "Skipping '{}', output exists",
                        target.display()
                    )));
                    return Ok(true);
                }
                OverwritePolicy::Refuse => {
                    notifier.handle(&Event::error(format!(
                        "Output file '{}' already exists, use --overwrite or --skip",
                        target.display()
                    )));
                    return Ok(false);
                }
            }
        }

        create_dir(&options.output_path)?;
        create_dir(&options.temp_path)?;

        let file_name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "image".into());
        let temp_file = options.temp_path.join(file_name);

        notifier.handle(&Event::StageStart {
            stage: Stage::Write,
            disc: Some(DISC),
        });

        let copied = self.copy_chunks(path, &temp_file, notifier, cancel);
        match copied {
            Ok(true) => {}
            Ok(false) => {
                let _ = fs::remove_file(&temp_file);
                notifier.handle(&Event::warning(format!(
                    "Cancelled while writing '{}'",
                    target.display()
                )));
                return Ok(false);
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_file);
                return Err(e);
            }
        }

        commit(&temp_file, &target)?;
        notifier.handle(&Event::StageComplete { stage: Stage::Write });
        notifier.handle(&Event::info(format!("Wrote '{}'", target.display())));

        Ok(true)
    }

    /// 分块复制；被取消时返回 `Ok(false)`
    fn copy_chunks(
        &self,
        source: &Path,
        dest: &Path,
        notifier: &mut dyn Sink,
        cancel: &CancelToken,
    ) -> Result<bool> {
        let read_err = |e| PackError::FileReadError {
            path: source.display().to_string(),
            source: e,
        };
        let write_err = |e| PackError::FileWriteError {
            path: dest.display().to_string(),
            source: e,
        };

        let mut input = File::open(source).map_err(read_err)?;
        let size = input.metadata().map_err(read_err)?.len();
        let mut out = File::create(dest).map_err(write_err)?;

        notifier.handle(&Event::StageSize {
            stage: Stage::Write,
            size,
        });

        let mut buf = vec![0u8; self.chunk_size];
        let mut written: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return Ok(false);
            }

            let n = input.read(&mut buf).map_err(read_err)?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n]).map_err(write_err)?;
            written = (written + n as u64).min(size);

            notifier.handle(&Event::StageProgress {
                stage: Stage::Write,
                value: written,
            });
        }

        out.flush().map_err(write_err)?;
        Ok(true)
    }
}

impl FileProcessor for CopyProcessor<'_> {
    fn process(
        &mut self,
        path: &Path,
        options: &ProcessOptions,
        notifier: &mut dyn Sink,
        cancel: &CancelToken,
    ) -> bool {
        match self.try_process(path, options, notifier, cancel) {
            Ok(done) => done,
            Err(e) => {
                notifier.handle(&Event::error(format!("{}: {}", path.display(), e)));
                false
            }
        }
    }
}

/// 输出文件路径：`<output>/<模板>.pbp`
fn output_file(vars: &NameVars, options: &ProcessOptions) -> PathBuf {
    let mut name = naming::expand(&options.file_name_format, vars);
    if name.trim().is_empty() {
        name = vars.filename.clone();
    }
    let name = naming::expand_path(&name, vars);

    let mut target = options.output_path.join(name);
    let mut file_name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    target.set_file_name(file_name);
    target
}

fn is_same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn generate_resource_folder(
    vars: &NameVars,
    options: &ProcessOptions,
    notifier: &mut dyn Sink,
) -> Result<bool> {
    let template = options
        .resource_format
        .as_deref()
        .or(ResourceMode::GenerateFolders.default_format())
        .unwrap_or("%FILENAME%");
    let folder = options.resource_root().join(naming::expand_path(template, vars));

    create_dir(&folder)?;
    notifier.handle(&Event::info(format!(
        "Created resource folder '{}'",
        folder.display()
    )));
    Ok(true)
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PackError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}

/// 把临时文件移到最终位置，跨设备时退回到复制
fn commit(temp_file: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        create_dir(parent)?;
    }
    if fs::rename(temp_file, target).is_ok() {
        return Ok(());
    }

    let copied = fs::copy(temp_file, target);
    let _ = fs::remove_file(temp_file);
    copied.map(|_| ()).map_err(|e| PackError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })
}
