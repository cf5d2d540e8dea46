//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: validate（参数校验并构造 `ProcessOptions`）

pub mod validate;

use clap::Parser;
use std::path::PathBuf;

/// psxpack - PlayStation 光盘镜像批量打包工具
#[derive(Parser, Debug)]
#[command(name = "psxpack")]
#[command(version)]
#[command(about = "Batch driver for packaging PlayStation disc images", long_about = None)]
pub struct Cli {
    /// Input file, directory, or wildcard pattern (e.g. 'games/*.cue')
    pub input: String,

    /// Output directory (defaults to the input's parent directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Filter for directory input, ';' or '|' separated (e.g. '.cue;.iso')
    #[arg(long)]
    pub filter: Option<String>,

    /// Overwrite existing output files
    #[arg(short = 'x', long, default_value_t = false)]
    pub overwrite: bool,

    /// Skip files whose output already exists
    #[arg(short, long = "skip", default_value_t = false)]
    pub skip_if_exists: bool,

    /// Discs to process, comma separated values from 1-5 (default: all)
    #[arg(short, long)]
    pub discs: Option<String>,

    /// Compression level from 0 (none) to 9 (best)
    #[arg(short = 'l', long = "level", default_value_t = 5, allow_negative_numbers = true)]
    pub compression_level: i32,

    /// Output file name format (%FILENAME%, %GAMEID%, %TITLE%)
    #[arg(short = 'f', long = "format")]
    pub file_name_format: Option<String>,

    /// Verbosity: 0 errors only, 1 normal, 2 stages, 3 progress ticks
    #[arg(short, long, default_value_t = 1)]
    pub verbosity: u8,

    /// Write a transcript to yyyyMMdd-hhmmss.log in the working directory
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Show live per-file progress bars
    #[arg(short, long, default_value_t = false)]
    pub progress: bool,

    // ─────────────────────────────────────────────────────────────
    // Resource options
    // ─────────────────────────────────────────────────────────────
    /// Extract resources from packaged files
    #[arg(short = 'e', long = "extract", default_value_t = false)]
    pub extract_resources: bool,

    /// Import resources into packaged files
    #[arg(short = 'i', long = "import", default_value_t = false)]
    pub import_resources: bool,

    /// Generate empty resource folders for each input
    #[arg(short = 'g', long = "generate", default_value_t = false)]
    pub generate_resource_folders: bool,

    /// Resource path format (default depends on the resource mode)
    #[arg(long)]
    pub resource_format: Option<String>,

    /// Root directory for resources (defaults to the output directory)
    #[arg(long)]
    pub resource_root: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────
    // Environment
    // ─────────────────────────────────────────────────────────────
    /// Temporary working directory
    #[arg(long, env = "PSXPACK_TEMP")]
    pub temp: Option<PathBuf>,

    /// Game database (serial,title CSV)
    #[arg(long, env = "PSXPACK_DB")]
    pub db: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_level() {
        let cli = Cli::try_parse_from(["psxpack", "game.bin", "-l", "-1"]).unwrap();
        assert_eq!(cli.compression_level, -1);
        assert_eq!(cli.input, "game.bin");
        assert_eq!(cli.verbosity, 1);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "psxpack", "games", "-r", "-x", "--discs", "1,2", "-o", "out", "--log", "-g",
        ])
        .unwrap();
        assert!(cli.recursive);
        assert!(cli.overwrite);
        assert!(cli.log);
        assert!(cli.generate_resource_folders);
        assert_eq!(cli.discs.as_deref(), Some("1,2"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
    }
}
