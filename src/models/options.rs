//! # 批处理选项
//!
//! 由校验后的命令行参数构造一次，之后只读，按引用在整个批次内共享。
//!
//! ## 依赖关系
//! - 由 `cli/validate.rs` 构造
//! - 被 `batch/runner.rs` 和 `processing/` 读取

use std::path::PathBuf;

/// 默认光盘选择：全部五张
pub const ALL_DISCS: [u32; 5] = [1, 2, 3, 4, 5];

/// 默认文件命名模板
pub const DEFAULT_FILE_NAME_FORMAT: &str = "%FILENAME%";

/// 输出文件已存在时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// 覆盖已有文件
    Overwrite,
    /// 跳过该文件，视为成功
    Skip,
    /// 保留已有文件，该文件记为失败
    Refuse,
}

impl OverwritePolicy {
    pub fn from_flags(overwrite: bool, skip_if_exists: bool) -> Self {
        if overwrite {
            OverwritePolicy::Overwrite
        } else if skip_if_exists {
            OverwritePolicy::Skip
        } else {
            OverwritePolicy::Refuse
        }
    }
}

/// 资源处理模式（互斥）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    None,
    Extract,
    Import,
    GenerateFolders,
}

impl ResourceMode {
    /// 未显式指定时的路径模板
    pub fn default_format(&self) -> Option<&'static str> {
        match self {
            ResourceMode::Extract | ResourceMode::Import => Some("%FILENAME%\\%RESOURCE%.%EXT%"),
            ResourceMode::GenerateFolders => Some("%FILENAME%"),
            ResourceMode::None => None,
        }
    }
}

/// 处理选项
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// 输出目录
    pub output_path: PathBuf,
    /// 临时工作目录
    pub temp_path: PathBuf,
    /// 选中的光盘序号 (1-5)
    pub discs: Vec<u32>,
    /// 已存在文件的处理策略
    pub overwrite: OverwritePolicy,
    /// 输出文件命名模板
    pub file_name_format: String,
    /// 压缩级别 (0-9)
    pub compression_level: u32,
    /// 控制台输出详细程度
    pub verbosity: u8,
    /// 是否写日志文件
    pub log: bool,
    /// 资源处理模式
    pub resource_mode: ResourceMode,
    /// 资源路径模板
    pub resource_format: Option<String>,
    /// 资源根目录（默认为输出目录）
    pub resource_root: Option<PathBuf>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            output_path: PathBuf::from("."),
            temp_path: std::env::temp_dir().join("PSXPackager"),
            discs: ALL_DISCS.to_vec(),
            overwrite: OverwritePolicy::Refuse,
            file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
            compression_level: 5,
            verbosity: 1,
            log: false,
            resource_mode: ResourceMode::None,
            resource_format: None,
            resource_root: None,
        }
    }
}

impl ProcessOptions {
    /// 资源文件所在的根目录
    pub fn resource_root(&self) -> &PathBuf {
        self.resource_root.as_ref().unwrap_or(&self.output_path)
    }
}
