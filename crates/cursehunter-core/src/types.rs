//! 公共类型（对外暴露）
use std::collections::BTreeMap;

/// 单次命中的记录（一次扫描内产生，由调用方随扫随用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// 分类标签；词汇由规则集定义，引擎不做封闭枚举
    pub category: String,
    /// 命中的原文片段（保留原始大小写 / 原始字素）
    pub text: String,
    /// 命中起点在原串中的字节偏移
    pub offset: usize,
}

/// 按分类累计的计分卡；BTreeMap 使序列化输出顺序稳定
pub type Scorecard = BTreeMap<String, usize>;
