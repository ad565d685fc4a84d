//! 规则集：三张只读查询表（词 / 符号 / 正则）
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::prefilter::WordPrefilter;

/// 规则集构建错误
///
/// 配置问题全部在构建期暴露并终止加载；扫描期不再产生错误，
/// 无命中是正常结果而非错误。
#[derive(Debug, Error)]
pub enum RulesetError {
    /// 正则规则编译失败
    #[error("invalid pattern /{pattern}/: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// 码点串无法解码为单个字符
    #[error("invalid emoji codepoint {raw:?}")]
    Codepoint { raw: String },
    /// 词表预筛自动机构建失败
    #[error("failed to build word prefilter: {0}")]
    Prefilter(#[from] aho_corasick::BuildError),
}

/// 三张分类查询表，构建完成后不可变
///
/// - `words`：小写词 -> 分类，精确匹配
/// - `symbols`：单个 emoji 字符 -> 分类（构建期由码点串解码）
/// - `patterns`：按配置顺序的（大小写不敏感正则, 分类）列表；
///   顺序决定扫描时的产出次序，必须保持
///
/// 只读共享安全：可被多个并发扫描同时使用，无需加锁。
#[derive(Debug, Clone)]
pub struct RuleSet {
    words: HashMap<String, String>,
    symbols: HashMap<String, String>,
    patterns: Vec<(Regex, String)>,
    prefilter: WordPrefilter,
}

impl RuleSet {
    /// 从已解析的三张原始表构建规则集
    ///
    /// - `words`：词 -> 分类，按迭代顺序写入，重复键后写覆盖
    /// - `emoji`：十六进制码点串（如 "1F4A9"）-> 分类，构建期解码为真实字符
    /// - `patterns`：模式串 -> 分类，保持传入顺序，统一编译为大小写不敏感正则
    pub fn from_tables<W, E>(
        words: W,
        emoji: E,
        patterns: Vec<(String, String)>,
    ) -> Result<Self, RulesetError>
    where
        W: IntoIterator<Item = (String, String)>,
        E: IntoIterator<Item = (String, String)>,
    {
        let mut word_table = HashMap::new();
        for (word, category) in words {
            word_table.insert(word, category);
        }

        let mut symbol_table = HashMap::new();
        for (raw, category) in emoji {
            let symbol = decode_codepoint(&raw)?;
            symbol_table.insert(symbol.to_string(), category);
        }

        let mut pattern_table = Vec::with_capacity(patterns.len());
        for (pattern, category) in patterns {
            let compiled = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RulesetError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            pattern_table.push((compiled, category));
        }

        let prefilter = WordPrefilter::build(word_table.keys())?;

        Ok(Self {
            words: word_table,
            symbols: symbol_table,
            patterns: pattern_table,
            prefilter,
        })
    }

    /// 精确词查询
    pub fn lookup_word(&self, word: &str) -> Option<&str> {
        self.words.get(word).map(String::as_str)
    }

    /// 单符号（emoji）查询
    pub fn lookup_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(String::as_str)
    }

    /// （正则, 分类）规则，保持配置顺序
    pub fn patterns(&self) -> &[(Regex, String)] {
        &self.patterns
    }

    /// 分词产出的 token 查询：按固定优先级尝试归一化候选，命中即停
    ///
    /// 顺序：小写原样 → 去尾部 "s" → 去尾部 "es"。该顺序决定既有规则集的
    /// 命中结果，不可调整（对 "es" 结尾的词，先试去 "s" 的形式）。
    pub fn lookup_token(&self, token: &str) -> Option<&str> {
        let key = token.to_ascii_lowercase();
        let candidates = [Some(key.as_str()), key.strip_suffix('s'), key.strip_suffix("es")];
        let result = candidates.into_iter().flatten().find_map(|k| self.lookup_word(k));
        result
    }

    /// 词表预筛：返回 false 时词阶段必然无命中
    pub(crate) fn word_phase_possible(&self, text: &str) -> bool {
        self.prefilter.maybe_hit(text)
    }
}

/// 将十六进制码点串（如 "1F4A9"）解码为字符
fn decode_codepoint(raw: &str) -> Result<char, RulesetError> {
    let value = u32::from_str_radix(raw.trim(), 16).map_err(|_| RulesetError::Codepoint {
        raw: raw.to_string(),
    })?;
    char::from_u32(value).ok_or_else(|| RulesetError::Codepoint {
        raw: raw.to_string(),
    })
}
