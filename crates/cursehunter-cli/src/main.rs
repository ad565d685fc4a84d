use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cursehunter_core::{builtin_english, load_ruleset, Scanner, DEFAULT_CENSOR_MASK};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

mod report;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "cursehunter", version, about = "文本脏话检测 / 统计 / 打码")]
struct Cli {
    /// 外部规则集文件（TOML）；缺省使用内置英文规则集
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 判断输入是否含命中；命中时退出码为 1
    Check {
        /// 输入文件；缺省读取标准输入
        input: Option<PathBuf>,
    },
    /// 输出按分类统计的计分卡（JSON）
    Score {
        /// 输入文件；缺省读取标准输入
        input: Option<PathBuf>,
    },
    /// 打码后输出文本
    Censor {
        /// 输入文件；缺省读取标准输入
        input: Option<PathBuf>,

        /// 掩码字符
        #[arg(long, default_value_t = DEFAULT_CENSOR_MASK)]
        mask: char,

        /// 输出文件；缺省写标准输出
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 扫描目录并生成 JSON 命中报告
    Report {
        /// 输入目录
        #[arg(long)]
        input: PathBuf,

        /// 输出文件（JSON 数组）
        #[arg(long, default_value = "./report.json")]
        output: PathBuf,

        /// 线程数（"auto"=CPU 核心数；1 走串行）
        #[arg(long, default_value = "auto")]
        threads: String,

        /// 最大扫描文件大小（单位字节）；超过则跳过
        #[arg(long)]
        max_file_size: Option<u64>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    // 规则集只加载一次，各子命令共享
    let rules = match &cli.rules {
        Some(path) => load_ruleset(path).context("load ruleset")?,
        None => builtin_english().context("load builtin ruleset")?,
    };
    let scanner = Scanner::new(rules);

    match cli.command {
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            if scanner.is_profane(&text) {
                println!("profane");
                std::process::exit(1);
            }
            println!("clean");
        }
        Commands::Score { input } => {
            let text = read_input(input.as_deref())?;
            let card = scanner.scorecard(&text);
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        Commands::Censor { input, mask, output } => {
            let text = read_input(input.as_deref())?;
            let censored = scanner.censor_with_mask(&text, mask);
            match output {
                Some(path) => fs::write(&path, censored)
                    .with_context(|| format!("write output file {}", path.display()))?,
                None => print!("{censored}"),
            }
        }
        Commands::Report { input, output, threads, max_file_size } => {
            info!(?input, ?output, "starting report");

            let mut out = BufWriter::new(File::create(&output).context("create output file")?);
            let opts = report::ReportOptions { max_file_size, threads: parse_threads(&threads) };
            let stats = report::scan_and_write(&input, &mut out, scanner, &opts)
                .context("scan and write failed")?;
            out.flush().ok();

            info!(
                files_scanned = stats.files_scanned,
                matches_written = stats.matches_written,
                "report finished"
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 读取输入：给定路径读文件，否则读完整个标准输入
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("read input file {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

/// 解析线程参数："auto" 表示等于 CPU 核数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") {
        return None;
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
