//! # 游戏信息数据库
//!
//! 从 `serial,title` 格式的 CSV 加载光盘序列号到游戏名称的映射。
//! 启动时打开一次，以引用传给处理阶段，生命周期由 `commands/pack.rs` 持有。
//!
//! ## 依赖关系
//! - 被 `processing/naming.rs` 使用
//! - 使用 `csv` + `serde` 读取，`regex` 识别序列号

use crate::error::{PackError, Result};

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// CSV 中的一行
#[derive(Debug, Deserialize)]
struct GameRecord {
    serial: String,
    title: String,
}

/// 序列号 -> 游戏名称
#[derive(Debug, Default)]
pub struct GameDb {
    titles: HashMap<String, String>,
}

impl GameDb {
    /// 空数据库（找不到数据库文件时使用）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 CSV 文件加载
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PackError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| PackError::DatabaseError {
                path: path.display().to_string(),
                source: e,
            })?;

        let mut titles = HashMap::new();
        for record in reader.deserialize::<GameRecord>() {
            let record = record.map_err(|e| PackError::DatabaseError {
                path: path.display().to_string(),
                source: e,
            })?;
            if let Some(serial) = normalize_serial(&record.serial) {
                titles.insert(serial, record.title);
            }
        }

        Ok(GameDb { titles })
    }

    /// 按序列号查找游戏名称
    pub fn lookup(&self, serial: &str) -> Option<&str> {
        normalize_serial(serial)
            .and_then(|key| self.titles.get(&key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

fn serial_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z]{4})[-_ ]?(\d{3})\.?(\d{2})").expect("serial regex is valid")
    })
}

/// 从任意文本（通常是文件名）中提取序列号，统一为 `SLUS-00594` 形式
pub fn find_serial(text: &str) -> Option<String> {
    let caps = serial_regex().captures(text)?;
    Some(format!(
        "{}-{}{}",
        caps[1].to_uppercase(),
        &caps[2],
        &caps[3]
    ))
}

fn normalize_serial(serial: &str) -> Option<String> {
    find_serial(serial.trim())
}
