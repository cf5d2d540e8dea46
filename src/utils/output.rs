//! # 美化输出工具
//!
//! 提供统一的终端输出样式。`format_*` 返回带前缀的字符串，
//! 供 `notify/console.rs` 写入任意输出流；`print_*` 直接打印。
//!
//! ## 依赖关系
//! - 被 `commands/`, `notify/`, `utils/progress.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "[OK]".green().bold(), msg)
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "[ERR]".red().bold(), msg)
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "[WARN]".yellow().bold(), msg)
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "[*]".blue().bold(), msg)
}

pub fn format_done(msg: &str) -> String {
    format!("{} {}", "[DONE]".green().bold(), msg)
}

/// 细节信息（阶段大小、进度）
pub fn format_detail(msg: &str) -> String {
    format!("    {}", msg.dimmed())
}

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{}", format_success(msg));
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{}", format_error(msg));
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{}", format_warning(msg));
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{}", format_info(msg));
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
