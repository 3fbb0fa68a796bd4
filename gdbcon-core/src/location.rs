//! 実行位置の文法
//!
//! スレッド一覧とフレーム行で共通の、実行位置部分を解析します。
//!
//! ```text
//! main (argc=1, argv=0xbffff590) at main.c:75
//! 0x6840 in expand_token (obs=0x0, t=177664, td=0xf7fffb08) at macro.c:71
//! ```

use crate::parse::parse_address;
use regex::Captures;

/// `0x6840 in `
const PC_PATTERN: &str = r"(?:(?P<pc>0x[\dA-Fa-f]+) in )?";

/// `expand_token` や `[recv message]`（空白を含みうる）
const FUN_PATTERN: &str = r"(?P<fun>[\S ]+)";

/// `(argc=1, argv=0xbffff590)` や `()`
const ARGS_PATTERN: &str = r"\((?P<args>[\S ]*)\)";

/// ` at main.c:75`
const SRC_PATTERN: &str = r"(?:\s+at\s+(?P<src>\S+))?";

/// 実行位置のパターン
///
/// 関数名は貪欲にマッチし、引数リストの開き括弧の前の空白で右端が決まります。
pub(crate) fn location_pattern() -> String {
    format!("{}{} {}{}", PC_PATTERN, FUN_PATTERN, ARGS_PATTERN, SRC_PATTERN)
}

/// 実行位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// プログラムカウンタ（`0x...`）
    pub pc: Option<String>,
    /// 関数名
    pub function: String,
    /// 括弧内の引数テキスト
    pub args: String,
    /// ソース位置（`file.c:71`）
    pub source: Option<String>,
}

impl Location {
    /// マッチ結果から実行位置を取り出す
    pub(crate) fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        Some(Self {
            pc: caps.name("pc").map(|m| m.as_str().to_string()),
            function: caps.name("fun")?.as_str().to_string(),
            args: caps.name("args")?.as_str().to_string(),
            source: caps.name("src").map(|m| m.as_str().to_string()),
        })
    }

    /// プログラムカウンタを数値で取得する
    pub fn pc_address(&self) -> Option<u64> {
        self.pc.as_deref().and_then(parse_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn parse(text: &str) -> Location {
        let re = Regex::new(&format!("^{}", location_pattern())).unwrap();
        let caps = re.captures(text).unwrap();
        Location::from_captures(&caps).unwrap()
    }

    #[test]
    fn test_location_with_pc_and_source() {
        let loc = parse("0x6840 in expand_token (obs=0x0, t=177664, td=0xf7fffb08) at macro.c:71");
        assert_eq!(loc.pc.as_deref(), Some("0x6840"));
        assert_eq!(loc.pc_address(), Some(0x6840));
        assert_eq!(loc.function, "expand_token");
        assert_eq!(loc.args, "obs=0x0, t=177664, td=0xf7fffb08");
        assert_eq!(loc.source.as_deref(), Some("macro.c:71"));
    }

    #[test]
    fn test_location_without_pc() {
        let loc = parse("main (argc=1, argv=0xbffff590) at main.c:75");
        assert_eq!(loc.pc, None);
        assert_eq!(loc.pc_address(), None);
        assert_eq!(loc.function, "main");
        assert_eq!(loc.args, "argc=1, argv=0xbffff590");
        assert_eq!(loc.source.as_deref(), Some("main.c:75"));
    }

    #[test]
    fn test_function_name_with_spaces() {
        let loc = parse("0x950aa9e6 in [recv message] ()");
        assert_eq!(loc.function, "[recv message]");
        assert_eq!(loc.args, "");
        assert_eq!(loc.source, None);
    }
}
