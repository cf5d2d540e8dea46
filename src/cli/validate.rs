//! # 参数校验
//!
//! 在任何文件系统操作之前校验命令行参数，构造只读的 `ProcessOptions`。
//! 任一校验失败都会让命令在进入批处理之前退出。
//!
//! ## 依赖关系
//! - 被 `commands/pack.rs` 调用
//! - 使用 `regex` 校验光盘列表

use super::Cli;
use crate::error::{PackError, Result};
use crate::models::options::{ALL_DISCS, DEFAULT_FILE_NAME_FORMAT};
use crate::models::{OverwritePolicy, ProcessOptions, ResourceMode};

use regex::Regex;
use std::path::{Path, PathBuf};

/// 校验压缩级别 (0-9)
pub fn validate_compression_level(level: i32) -> Result<u32> {
    match u32::try_from(level) {
        Ok(level) if level <= 9 => Ok(level),
        _ => Err(PackError::InvalidCompressionLevel(level)),
    }
}

/// 解析光盘列表，例如 "1,3,5"；未指定时选中全部
pub fn parse_discs(list: Option<&str>) -> Result<Vec<u32>> {
    let list = match list.map(|s| s.replace(' ', "")) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(ALL_DISCS.to_vec()),
    };

    let pattern = Regex::new(r"^[1-5](,[1-5])*$").expect("disc regex is valid");
    if !pattern.is_match(&list) {
        return Err(PackError::InvalidDiscs(list));
    }

    let mut discs: Vec<u32> = Vec::new();
    for token in list.split(',') {
        let disc = token
            .parse::<u32>()
            .map_err(|_| PackError::InvalidDiscs(list.clone()))?;
        if !discs.contains(&disc) {
            discs.push(disc);
        }
    }
    Ok(discs)
}

/// 资源模式三选一
pub fn resource_mode(extract: bool, import: bool, generate: bool) -> Result<ResourceMode> {
    match (extract, import, generate) {
        (false, false, false) => Ok(ResourceMode::None),
        (true, false, false) => Ok(ResourceMode::Extract),
        (false, true, false) => Ok(ResourceMode::Import),
        (false, false, true) => Ok(ResourceMode::GenerateFolders),
        _ => Err(PackError::ConflictingResourceModes),
    }
}

/// 默认输出目录：输入路径的父目录
pub fn default_output_path(input: &str) -> PathBuf {
    match Path::new(input).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// 校验全部参数并构造处理选项
pub fn build_options(cli: &Cli) -> Result<ProcessOptions> {
    let compression_level = validate_compression_level(cli.compression_level)?;
    let discs = parse_discs(cli.discs.as_deref())?;
    let resource_mode = resource_mode(
        cli.extract_resources,
        cli.import_resources,
        cli.generate_resource_folders,
    )?;

    if cli.input.trim().is_empty() {
        return Err(PackError::InvalidArgument("input path is empty".to_string()));
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let resource_format = cli
        .resource_format
        .clone()
        .or_else(|| resource_mode.default_format().map(str::to_string));

    Ok(ProcessOptions {
        output_path,
        temp_path: cli
            .temp
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("PSXPackager")),
        discs,
        overwrite: OverwritePolicy::from_flags(cli.overwrite, cli.skip_if_exists),
        file_name_format: cli
            .file_name_format
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_NAME_FORMAT.to_string()),
        compression_level,
        verbosity: cli.verbosity,
        log: cli.log,
        resource_mode,
        resource_format,
        resource_root: cli.resource_root.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_compression_level_bounds() {
        assert_eq!(validate_compression_level(0).unwrap(), 0);
        assert_eq!(validate_compression_level(9).unwrap(), 9);
        assert!(matches!(
            validate_compression_level(-1),
            Err(PackError::InvalidCompressionLevel(-1))
        ));
        assert!(matches!(
            validate_compression_level(10),
            Err(PackError::InvalidCompressionLevel(10))
        ));
    }

    #[test]
    fn test_parse_discs() {
        assert_eq!(parse_discs(None).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(parse_discs(Some("")).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(parse_discs(Some("1,3")).unwrap(), vec![1, 3]);
        assert_eq!(parse_discs(Some("2, 2, 4")).unwrap(), vec![2, 4]);

        for bad in ["0", "6", "1,,2", "1;2", "a", "12", "1,"] {
            assert!(
                matches!(parse_discs(Some(bad)), Err(PackError::InvalidDiscs(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resource_modes_are_exclusive() {
        assert_eq!(resource_mode(false, false, false).unwrap(), ResourceMode::None);
        assert_eq!(resource_mode(false, true, false).unwrap(), ResourceMode::Import);
        assert!(matches!(
            resource_mode(true, false, true),
            Err(PackError::ConflictingResourceModes)
        ));
        assert!(matches!(
            resource_mode(true, true, true),
            Err(PackError::ConflictingResourceModes)
        ));
    }

    #[test]
    fn test_build_options_defaults() {
        let cli = Cli::try_parse_from(["psxpack", "roms/game.cue", "-e", "--temp", "/tmp/pp"]).unwrap();
        let options = build_options(&cli).unwrap();

        assert_eq!(options.output_path, PathBuf::from("roms"));
        assert_eq!(options.temp_path, PathBuf::from("/tmp/pp"));
        assert_eq!(options.compression_level, 5);
        assert_eq!(options.overwrite, OverwritePolicy::Refuse);
        assert_eq!(options.resource_mode, ResourceMode::Extract);
        assert_eq!(
            options.resource_format.as_deref(),
            Some("%FILENAME%\\%RESOURCE%.%EXT%")
        );
        assert_eq!(options.file_name_format, "%FILENAME%");
    }

    #[test]
    fn test_build_options_rejects_bad_input() {
        let cli = Cli::try_parse_from(["psxpack", "game.bin", "-l", "10"]).unwrap();
        let err = build_options(&cli).unwrap_err();
        assert!(err.is_configuration());

        let cli = Cli::try_parse_from(["psxpack", "game.bin", "-e", "-i"]).unwrap();
        assert!(matches!(
            build_options(&cli),
            Err(PackError::ConflictingResourceModes)
        ));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path("game.bin"), PathBuf::from("."));
        assert_eq!(default_output_path("a/b/game.bin"), PathBuf::from("a/b"));
    }
}
