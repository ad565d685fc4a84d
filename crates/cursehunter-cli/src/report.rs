//! 目录报告：遍历文本文件并将命中以 JSON 数组流式写出
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use cursehunter_core::{MatchRecord, Scanner};

/// 报告选项
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// 最大文件大小（字节）；超过则跳过
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

/// 报告统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone)]
pub struct ReportStats {
    pub files_scanned: usize,
    pub matches_written: usize,
}

/// 扫描目录并将命中以 JSON 数组流式写入 `out`
/// 稳定性保证：
/// - 文件级：先收集文件并按路径排序，确保输出顺序可复现
/// - 文件内：命中按（起始偏移升序, 文本长度降序, 文本字典序升序）排序
pub fn scan_and_write(
    input_dir: &Path,
    out: &mut dyn Write,
    scanner: Scanner,
    opts: &ReportOptions,
) -> Result<ReportStats> {
    let scanner = Arc::new(scanner);
    let mut stats = ReportStats::default();

    let mut files: Vec<PathBuf> = vec![];
    for entry in WalkDir::new(input_dir).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    // 按路径排序，确保输出顺序稳定
    files.sort();

    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    if threads > 1 {
        scan_and_write_parallel(&files, out, &scanner, opts, &mut stats, threads)?;
        return Ok(stats);
    }

    // 串行路径
    write!(out, "[")?;
    let mut first = true;
    for path in &files {
        let Some(records) = scan_file(path, &scanner, opts.max_file_size) else {
            continue;
        };
        stats.files_scanned += 1;
        write_file_records(out, path, &records, &mut first, &mut stats)?;
    }
    write!(out, "]")?;
    Ok(stats)
}

/// 并行调度：
/// - Rayon 线程池并行扫描文件
/// - 单线程 Writer 按 idx 重排并流式写 JSON，保证稳定顺序
fn scan_and_write_parallel(
    files: &[PathBuf],
    out: &mut dyn Write,
    scanner: &Arc<Scanner>,
    opts: &ReportOptions,
    stats: &mut ReportStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    write!(out, "[")?;
    let mut first = true;

    // 通道用于 worker → writer 传递结果
    type Msg = (usize /*idx*/, PathBuf, Option<Vec<MatchRecord>>);
    let (tx, rx) = channel::bounded::<Msg>(256);

    let scanner = Arc::clone(scanner);
    let max_file_size = opts.max_file_size;

    let files_vec: Vec<(usize, PathBuf)> = files
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.clone()))
        .collect();

    let scan_thread = std::thread::spawn(move || {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build rayon pool");
        pool.install(|| {
            files_vec.par_iter().for_each(|(idx, path)| {
                let records = scan_file(path, &scanner, max_file_size);
                let _ = tx.send((*idx, path.clone(), records));
            });
        });
        // 结束后 Sender 全部被丢弃，Receiver 收到关闭信号
    });

    // Writer：维护 next_idx 与缓存，按序输出
    use std::collections::BTreeMap;
    let mut next_idx: usize = 0;
    let mut buffer: BTreeMap<usize, (PathBuf, Option<Vec<MatchRecord>>)> = BTreeMap::new();

    while let Ok((idx, path, records)) = rx.recv() {
        buffer.insert(idx, (path, records));
        // 尝试从 next_idx 开始顺序冲刷
        while let Some((path, records)) = buffer.remove(&next_idx) {
            if let Some(records) = records {
                stats.files_scanned += 1;
                write_file_records(out, &path, &records, &mut first, stats)?;
            }
            next_idx += 1;
        }
    }

    // 等待扫描线程结束
    let _ = scan_thread.join();

    // 最终冲刷残余（理论上缓冲应已清空）
    while let Some((path, records)) = buffer.remove(&next_idx) {
        if let Some(records) = records {
            stats.files_scanned += 1;
            write_file_records(out, &path, &records, &mut first, stats)?;
        }
        next_idx += 1;
    }

    write!(out, "]")?;
    Ok(())
}

/// 扫描单个文件；不可读 / 超限 / 非 UTF-8 的文件返回 None（跳过不计）
fn scan_file(path: &Path, scanner: &Scanner, max_file_size: Option<u64>) -> Option<Vec<MatchRecord>> {
    if let Some(max) = max_file_size {
        if let Ok(md) = std::fs::metadata(path) {
            if md.len() > max {
                return None;
            }
        }
    }
    let text = std::fs::read_to_string(path).ok()?;
    let mut records: Vec<MatchRecord> = scanner.matches(&text).collect();
    sort_records_stable(&mut records);
    Some(records)
}

/// 文件内稳定排序：起始偏移升序 → 文本长度降序 → 文本字典序升序
fn sort_records_stable(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        use std::cmp::Ordering;
        match a.offset.cmp(&b.offset) {
            Ordering::Equal => match b.text.len().cmp(&a.text.len()) {
                Ordering::Equal => a.text.cmp(&b.text),
                o => o,
            },
            o => o,
        }
    });
}

/// 将单个文件的命中逐条写为 JSON 对象
fn write_file_records(
    out: &mut dyn Write,
    path: &Path,
    records: &[MatchRecord],
    first: &mut bool,
    stats: &mut ReportStats,
) -> Result<()> {
    let file = path.display().to_string();
    for r in records {
        stats.matches_written += 1;
        if !*first {
            write!(out, ",")?;
        } else {
            *first = false;
        }
        let item = serde_json::json!({
            "file": file,
            "category": r.category,
            "text": r.text,
            "offset": r.offset,
        });
        serde_json::to_writer(&mut *out, &item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursehunter_core::builtin_english;
    use std::fs;

    fn scanner() -> Scanner {
        Scanner::new(builtin_english().unwrap())
    }

    #[test]
    fn test_report_serial_is_stable_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "damn it").unwrap();
        fs::write(dir.path().join("b.txt"), "all clear here").unwrap();

        let mut out = Vec::new();
        let opts = ReportOptions { max_file_size: None, threads: Some(1) };
        let stats = scan_and_write(dir.path(), &mut out, scanner(), &opts).unwrap();

        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.matches_written, 1);

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["text"], "damn");
        assert_eq!(items[0]["offset"], 0);
    }

    #[test]
    fn test_report_parallel_matches_serial_output() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            fs::write(
                dir.path().join(format!("f{i:02}.txt")),
                format!("file {i}: damn and hell and more"),
            )
            .unwrap();
        }

        let mut serial = Vec::new();
        let opts = ReportOptions { max_file_size: None, threads: Some(1) };
        scan_and_write(dir.path(), &mut serial, scanner(), &opts).unwrap();

        let mut parallel = Vec::new();
        let opts = ReportOptions { max_file_size: None, threads: Some(4) };
        scan_and_write(dir.path(), &mut parallel, scanner(), &opts).unwrap();

        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_report_skips_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), "damn ".repeat(100)).unwrap();

        let mut out = Vec::new();
        let opts = ReportOptions { max_file_size: Some(16), threads: Some(1) };
        let stats = scan_and_write(dir.path(), &mut out, scanner(), &opts).unwrap();

        assert_eq!(stats.files_scanned, 0);
        assert_eq!(stats.matches_written, 0);
        assert_eq!(out, b"[]");
    }
}
