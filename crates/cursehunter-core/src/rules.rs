//! 规则集文件加载（TOML）
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ruleset::RuleSet;

/// 内置英文规则集（随库分发）
const EN_RULESET: &str = include_str!("../rules/en.toml");

/// 规则文件顶层结构；三段均可缺省，缺省的段不贡献规则
#[derive(Debug, Clone, Default, Deserialize)]
struct RulesetFile {
    #[serde(default)]
    words: BTreeMap<String, String>,
    #[serde(default)]
    emoji: BTreeMap<String, String>,
    #[serde(default)]
    patterns: Vec<PatternEntry>,
}

/// 单条正则规则；patterns 段用表数组承载，保持配置顺序
#[derive(Debug, Clone, Deserialize)]
struct PatternEntry {
    pattern: String,
    category: String,
}

/// 从 TOML 文本解析并构建规则集
fn parse_ruleset(text: &str) -> Result<RuleSet> {
    let parsed: RulesetFile = toml::from_str(text)?;
    let patterns = parsed
        .patterns
        .into_iter()
        .map(|e| (e.pattern, e.category))
        .collect();
    let ruleset = RuleSet::from_tables(parsed.words, parsed.emoji, patterns)?;
    Ok(ruleset)
}

/// 从磁盘加载规则集文件
pub fn load_ruleset(path: &Path) -> Result<RuleSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read ruleset file {}", path.display()))?;
    parse_ruleset(&text).with_context(|| format!("parse ruleset file {}", path.display()))
}

/// 加载内置语言规则集；当前仅内置 "en"
pub fn load_language(language: &str) -> Result<RuleSet> {
    match language {
        "en" => parse_ruleset(EN_RULESET).context("parse builtin en ruleset"),
        other => anyhow::bail!("no builtin ruleset for language {other:?}"),
    }
}

/// 内置英文规则集的便捷入口
pub fn builtin_english() -> Result<RuleSet> {
    load_language("en")
}
