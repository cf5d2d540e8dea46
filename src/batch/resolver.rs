//! # 输入路径解析
//!
//! 把用户给出的输入（单文件、目录或通配符模式）展开为待处理文件列表。
//!
//! ## 规则
//! - 目录：列出支持扩展名的文件（可递归）
//! - 不含通配符的路径：原样返回，不做扩展名过滤，也不检查存在性
//! - 文件名含 `?`/`*`：前缀是目录则在该目录下匹配，否则相对当前目录匹配
//!
//! 过滤表达式以 `;` 或 `|` 分隔，`.bin` 这样的裸扩展名按 `*.bin` 处理，
//! 匹配不区分大小写。每次调用 [`PathResolver::files`] 都重新遍历文件系统。
//!
//! ## 依赖关系
//! - 被 `commands/pack.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配模式

use crate::error::{PackError, Result};

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 支持的输入扩展名（小写，不含点）
pub const SUPPORTED_EXTENSIONS: [&str; 10] = [
    "rar", "zip", "tar", "gz", "7z", "bin", "cue", "img", "iso", "pbp",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// 解析计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// 字面路径，原样返回
    Literal(PathBuf),
    /// 在目录中按过滤表达式列出
    Listing { dir: PathBuf, filter: Option<String> },
}

/// 输入路径解析器
pub struct PathResolver {
    /// 用户输入
    input: String,
    /// 目录输入时使用的过滤表达式
    filter: Option<String>,
    /// 是否递归
    recursive: bool,
}

impl PathResolver {
    /// 创建新的解析器
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            filter: None,
            recursive: false,
        }
    }

    /// 设置目录输入的过滤表达式
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub(crate) fn plan(&self) -> Resolution {
        let input = Path::new(&self.input);

        if !contains_wildcards(&self.input) && input.is_dir() {
            return Resolution::Listing {
                dir: input.to_path_buf(),
                filter: self.filter.clone(),
            };
        }

        let filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !contains_wildcards(&filename) {
            return Resolution::Literal(input.to_path_buf());
        }

        let dir = match input.parent() {
            Some(parent)
                if !parent.as_os_str().is_empty()
                    && !contains_wildcards(&parent.to_string_lossy())
                    && parent.is_dir() =>
            {
                parent.to_path_buf()
            }
            _ => PathBuf::from("."),
        };

        Resolution::Listing {
            dir,
            filter: Some(filename),
        }
    }

    /// 惰性产生匹配的文件
    pub fn files(&self) -> Result<Box<dyn Iterator<Item = PathBuf>>> {
        match self.plan() {
            Resolution::Literal(path) => Ok(Box::new(std::iter::once(path))),
            Resolution::Listing { dir, filter } => {
                let patterns = parse_filter(filter.as_deref())?;
                let max_depth = if self.recursive { usize::MAX } else { 1 };

                let walker = WalkDir::new(dir)
                    .min_depth(1)
                    .max_depth(max_depth)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter(move |e| {
                        is_supported(e.path()) && matches_any(&patterns, e.path())
                    })
                    .map(|e| e.into_path());

                Ok(Box::new(walker))
            }
        }
    }

    /// 收集所有匹配的文件
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        Ok(self.files()?.collect())
    }
}

/// 是否含有通配符
pub fn contains_wildcards(text: &str) -> bool {
    text.contains('?') || text.contains('*')
}

/// 扩展名是否在支持列表中（不区分大小写）
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// 解析过滤表达式；为空时使用全部支持的扩展名
fn parse_filter(filter: Option<&str>) -> Result<Vec<Pattern>> {
    let expr = match filter {
        Some(expr) => expr.to_string(),
        None => SUPPORTED_EXTENSIONS
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(";"),
    };

    expr.split([';', '|'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let token_glob = literal_brackets(token);
            let glob = if token.starts_with('.') {
                format!("*{}", token_glob)
            } else {
                token_glob
            };
            Pattern::new(&glob).map_err(|e| PackError::InvalidPattern {
                pattern: token.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// 方括号按字面匹配，只有 `*` 和 `?` 是通配符
fn literal_brackets(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '[' => out.push_str("[[]"),
            ']' => out.push_str("[]]"),
            _ => out.push(c),
        }
    }
    out
}

fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    let filename = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };

    patterns
        .iter()
        .any(|p| p.matches_with(filename, MATCH_OPTIONS))
}
