//! # 输出命名模板
//!
//! 展开 `%FILENAME%`, `%GAMEID%`, `%TITLE%`, `%RESOURCE%`, `%EXT%` 占位符。
//! 模板中的 `\` 和 `/` 都视为目录分隔符。
//!
//! ## 依赖关系
//! - 被 `processing/copy.rs` 使用
//! - 使用 `models/game_db.rs` 查询游戏名称

use crate::models::game_db::{find_serial, GameDb};

use std::path::{Path, PathBuf};

/// 模板变量
#[derive(Debug, Clone, Default)]
pub struct NameVars {
    pub filename: String,
    pub game_id: Option<String>,
    pub title: Option<String>,
    pub resource: Option<String>,
    pub ext: Option<String>,
}

impl NameVars {
    /// 从输入文件名提取变量，序列号能识别时查询游戏名称
    pub fn for_file(path: &Path, db: &GameDb) -> Self {
        let filename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let game_id = find_serial(&filename);
        let title = game_id
            .as_deref()
            .and_then(|id| db.lookup(id))
            .map(sanitize);

        NameVars {
            filename,
            game_id,
            title,
            resource: None,
            ext: None,
        }
    }
}

/// 去掉文件名中不允许的字符
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// 展开模板字符串
pub fn expand(template: &str, vars: &NameVars) -> String {
    // 缺失的 GAMEID/TITLE 退回到文件名
    let game_id = vars.game_id.as_deref().unwrap_or(&vars.filename);
    let title = vars.title.as_deref().unwrap_or(&vars.filename);

    template
        .replace("%FILENAME%", &vars.filename)
        .replace("%GAMEID%", game_id)
        .replace("%TITLE%", title)
        .replace("%RESOURCE%", vars.resource.as_deref().unwrap_or(""))
        .replace("%EXT%", vars.ext.as_deref().unwrap_or(""))
}

/// 展开模板并转换为相对路径
pub fn expand_path(template: &str, vars: &NameVars) -> PathBuf {
    expand(template, vars)
        .split(['\\', '/'])
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect()
}
