//! 词表预筛（Aho-Corasick）
//!
//! 词阶段查表的候选键（原样 / 去尾 "s" / 去尾 "es"）都是 token 小写形式的
//! 前缀，所以整段文本里若找不到任何词表键的子串（ASCII 大小写不敏感），
//! 分词与查表可以整体跳过。预筛只省工作量，不改变命中结果。

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, BuildError, MatchKind};

/// 词表键的全局自动机；词表为空时不构建
#[derive(Debug, Clone)]
pub(crate) struct WordPrefilter {
    ac: Option<AhoCorasick>,
}

impl WordPrefilter {
    /// 从词表键构建自动机
    pub(crate) fn build<I, P>(keys: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let keys: Vec<P> = keys.into_iter().collect();
        if keys.is_empty() {
            return Ok(Self { ac: None });
        }
        let ac = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(true)
            .build(&keys)?;
        Ok(Self { ac: Some(ac) })
    }

    /// 返回 false 时词阶段必然无命中
    pub(crate) fn maybe_hit(&self, text: &str) -> bool {
        match &self.ac {
            Some(ac) => ac.is_match(text),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keys_never_hit() {
        let pf = WordPrefilter::build(Vec::<&str>::new()).unwrap();
        assert!(!pf.maybe_hit("anything at all"));
    }

    #[test]
    fn test_substring_hit_is_case_insensitive() {
        let pf = WordPrefilter::build(["damn"]).unwrap();
        assert!(pf.maybe_hit("well DAMN it"));
        // 复数形式包含原键作为前缀，预筛仍命中
        assert!(pf.maybe_hit("damns"));
        assert!(!pf.maybe_hit("polite text"));
    }
}
