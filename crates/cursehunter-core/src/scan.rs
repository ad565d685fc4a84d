//! 扫描引擎与三个消费操作
//!
//! 命中流为固定三段拼接：词阶段（文档序）→ 符号阶段（文档序）→
//! 正则阶段（按规则序，单条规则内按出现序）。三段只拼接，不按位置归并，
//! 因此同一（规则集, 输入）对的产出序列是完全确定的。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ruleset::RuleSet;
use crate::types::{MatchRecord, Scorecard};

/// 默认打码字符
pub const DEFAULT_CENSOR_MASK: char = '*';

/// 分词：ASCII 字母与连字符的最长连续段（两侧为词边界）
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z-]+\b").expect("word pattern"));

/// emoji 字素匹配：修饰基 + 肤色修饰、默认 emoji 呈现形、或文本形 + VS16
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Emoji_Modifier_Base}\p{Emoji_Modifier}|\p{Emoji_Presentation}|\p{Emoji}\x{FE0F}")
        .expect("emoji pattern")
});

/// 扫描器：持有规则集，对输入串产出命中流
///
/// 构建后只读；规则集不可变，同一实例可跨线程共享给并发扫描。
#[derive(Debug, Clone)]
pub struct Scanner {
    rules: RuleSet,
}

impl Scanner {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// 借出内部规则集
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 产出懒惰的有序命中流；调用方可随时提前终止
    ///
    /// 记录里的 `text` 是原文片段（不做小写化 / 不剥修饰符），
    /// `offset` 是片段在原串中的字节偏移，二者共同支撑打码重建。
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = MatchRecord> + 'a {
        // 词阶段：预筛否决时整段跳过
        let words = self
            .rules
            .word_phase_possible(text)
            .then(|| {
                WORD_RE.find_iter(text).filter_map(move |m| {
                    self.rules.lookup_token(m.as_str()).map(|category| MatchRecord {
                        category: category.to_string(),
                        text: m.as_str().to_string(),
                        offset: m.start(),
                    })
                })
            })
            .into_iter()
            .flatten();

        // 符号阶段：按基础符号查表，产出原始字素
        let symbols = EMOJI_RE.find_iter(text).filter_map(move |m| {
            let grapheme = m.as_str();
            self.rules
                .lookup_symbol(base_symbol(grapheme))
                .map(|category| MatchRecord {
                    category: category.to_string(),
                    text: grapheme.to_string(),
                    offset: m.start(),
                })
        });

        // 正则阶段：规则间按配置序，规则内按出现序
        let patterns = self.rules.patterns().iter().flat_map(move |(re, category)| {
            re.find_iter(text).map(move |m| MatchRecord {
                category: category.clone(),
                text: m.as_str().to_string(),
                offset: m.start(),
            })
        });

        words.chain(symbols).chain(patterns)
    }

    /// 是否存在任一命中；拿到第一条记录即返回
    pub fn is_profane(&self, text: &str) -> bool {
        self.matches(text).next().is_some()
    }

    /// 按分类统计命中次数；无命中返回空表
    pub fn scorecard(&self, text: &str) -> Scorecard {
        let mut card = Scorecard::new();
        for record in self.matches(text) {
            *card.entry(record.category).or_insert(0) += 1;
        }
        card
    }

    /// 用默认掩码打码
    pub fn censor(&self, text: &str) -> String {
        self.censor_with_mask(text, DEFAULT_CENSOR_MASK)
    }

    /// 指定掩码字符打码：命中段内非空白字符逐个替换，空白原样保留
    pub fn censor_with_mask(&self, text: &str, mask: char) -> String {
        self.rewrite(text, |matched| mask_text(matched, mask))
    }

    /// 自定义替换函数打码；替换文本长度可与原命中不同
    pub fn censor_with<F>(&self, text: &str, replace: F) -> String
    where
        F: Fn(&str) -> String,
    {
        self.rewrite(text, replace)
    }

    /// 纯函数式重建：先收集全部命中（原串不动），再按偏移拼接输出
    ///
    /// 记录按起点稳定排序后依次消费：落在已重写区间内的记录跳过，
    /// 越出已重写区间的记录只替换其尾段。偏移始终针对原串，替换长度
    /// 变化不会使后续偏移失效。
    fn rewrite<F>(&self, text: &str, replace: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut records: Vec<MatchRecord> = self.matches(text).collect();
        if records.is_empty() {
            return text.to_string();
        }
        records.sort_by_key(|r| r.offset);

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for record in &records {
            let start = record.offset;
            let end = start + record.text.len();
            if end <= cursor {
                continue;
            }
            if start < cursor {
                out.push_str(&replace(&text[cursor..end]));
                cursor = end;
                continue;
            }
            out.push_str(&text[cursor..start]);
            out.push_str(&replace(&record.text));
            cursor = end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

/// 去掉字素尾部的肤色修饰或 VS16，得到查表用的基础符号
fn base_symbol(grapheme: &str) -> &str {
    if let Some((idx, last)) = grapheme.char_indices().last() {
        if idx > 0 && is_symbol_trailer(last) {
            return &grapheme[..idx];
        }
    }
    grapheme
}

/// 肤色修饰（U+1F3FB..=U+1F3FF）或变体选择符 VS16（U+FE0F）
fn is_symbol_trailer(ch: char) -> bool {
    matches!(ch as u32, 0x1F3FB..=0x1F3FF | 0xFE0F)
}

/// 命中文本 -> 掩码文本：非空白逐字符替换，空白保留
fn mask_text(text: &str, mask: char) -> String {
    text.chars()
        .map(|ch| if ch.is_whitespace() { ch } else { mask })
        .collect()
}
