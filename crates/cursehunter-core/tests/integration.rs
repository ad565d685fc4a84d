// tests/integration.rs
//! 面向公开 API 的端到端用例：内置规则集 + 三个消费操作

use cursehunter_core::{builtin_english, MatchRecord, RuleSet, Scanner};

fn english() -> Scanner {
    Scanner::new(builtin_english().expect("builtin ruleset"))
}

#[test]
fn test_clean_text_round_trip() {
    let s = english();
    let text = "a perfectly polite sentence about gardening";
    assert!(!s.is_profane(text));
    assert!(s.scorecard(text).is_empty());
    // 无命中时打码必须逐字节还原输入
    assert_eq!(s.censor(text), text);
}

#[test]
fn test_check_is_case_insensitive() {
    let s = english();
    assert!(s.is_profane("DAMN"));
    assert!(s.is_profane("Damn"));
    assert!(s.is_profane("damn"));
    assert_eq!(s.scorecard("DAMN"), s.scorecard("damn"));
}

#[test]
fn test_scorecard_mixed_phases() {
    let s = english();
    let card = s.scorecard("damn that \u{1F595}, go to hell");
    assert_eq!(card.get("profanity"), Some(&1));
    assert_eq!(card.get("insult"), Some(&2)); // 符号一次 + 正则一次
    assert_eq!(card.get("mild"), Some(&1)); // "hell" 词表命中
}

#[test]
fn test_censor_preserves_layout() {
    let s = english();
    assert_eq!(s.censor("you damn fool"), "you **** fool");
    // 命中段外的标点与空白完全不动
    assert_eq!(s.censor("damn, damn; damn."), "****, ****; ****.");
}

#[test]
fn test_censor_with_replacer_keeps_later_offsets_valid() {
    let s = english();
    // 替换文本比命中更长，后续命中的偏移簿记仍须正确
    let out = s.censor_with("damn it, damn it all", |m| format!("<{m}>"));
    assert_eq!(out, "<damn> it, <damn> it all");
}

#[test]
fn test_skin_tone_matches_base_symbol_category() {
    let s = english();
    let base = s.scorecard("\u{1F595}");
    for modifier in ['\u{1F3FB}', '\u{1F3FD}', '\u{1F3FF}'] {
        let toned = s.scorecard(&format!("\u{1F595}{modifier}"));
        assert_eq!(base, toned);
    }
}

#[test]
fn test_repeated_scans_are_identical() {
    let s = english();
    let text = "DAMN \u{1F4A9} jack-ass, goddammit";
    let first: Vec<MatchRecord> = s.matches(text).collect();
    assert!(!first.is_empty());
    for _ in 0..4 {
        let again: Vec<MatchRecord> = s.matches(text).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_shared_ruleset_across_threads() {
    use std::sync::Arc;

    let scanner = Arc::new(english());
    let mut handles = Vec::new();
    for i in 0..4 {
        let scanner = Arc::clone(&scanner);
        handles.push(std::thread::spawn(move || {
            let text = format!("thread {i} says damn");
            assert!(scanner.is_profane(&text));
            scanner.scorecard(&text)
        }));
    }
    let cards: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for card in &cards[1..] {
        assert_eq!(card.get("profanity"), cards[0].get("profanity"));
    }
}

#[test]
fn test_external_tables_construction() {
    // 不经过文件加载，直接用解析好的表构建
    let rules = RuleSet::from_tables(
        vec![("merde".to_string(), "profanity".to_string())],
        vec![("1F4A9".to_string(), "inappropriate".to_string())],
        vec![(r"\bzut alors\b".to_string(), "mild".to_string())],
    )
    .unwrap();
    let s = Scanner::new(rules);
    assert!(s.is_profane("merde"));
    assert!(s.is_profane("\u{1F4A9}"));
    assert_eq!(s.censor("Zut Alors"), "*** *****");
}
