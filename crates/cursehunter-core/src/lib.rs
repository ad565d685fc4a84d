//! 脏话分类核心库
//!
//! 结构（与外层 CLI 的分工）：
//! - `RuleSet`：三张只读查询表（词 / emoji 符号 / 正则规则），由已解析的
//!   配置数据构建一次，之后可跨线程共享只读使用。
//! - `Scanner`：对输入串产出固定三段顺序（词 → 符号 → 正则）的命中流；
//!   三个公开操作（is_profane / scorecard / censor）都是流上的薄折叠。
//! - `rules`：TOML 规则文件解析与内置语言规则集；引擎本身不做 I/O，
//!   文件加载只发生在这一层。

mod prefilter;
mod rules;
mod ruleset;
mod scan;
mod types;

pub use rules::{builtin_english, load_language, load_ruleset};
pub use ruleset::{RuleSet, RulesetError};
pub use scan::{Scanner, DEFAULT_CENSOR_MASK};
pub use types::{MatchRecord, Scorecard};
