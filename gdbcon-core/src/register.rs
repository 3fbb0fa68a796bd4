//! レジスタダンプの解析
//!
//! ```text
//! eip            0x950aa9e6	0x950aa9e6 <mach_msg_trap+10>
//! eax            0x1c	28
//! ```

use crate::listing::collect_records;
use crate::parse::parse_address;
use crate::{ConsoleError, RecordKind, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// レジスタ名、生の16進値、記号的な値の3列
///
/// 記号的な値の直前に生の値と同じ形式のアドレスが繰り返される場合は読み飛ばします。
/// 記号的な値は空白を含まない1トークンのみ対応します。
static REGISTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<name>\S+)\s+(?P<hex>0x[\dA-Fa-f]+)\s+",
        r"(?:0x[\dA-Fa-f]+\s+)?(?P<value>\S+)",
    ))
    .expect("register line pattern must compile")
});

/// レジスタのダンプ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRecord {
    /// レジスタ名
    pub name: String,
    /// 生の値（`0x...`）
    pub hex_value: String,
    /// 記号的な値
    pub value: String,
}

impl RegisterRecord {
    /// レジスタダンプの1行を解析する
    pub fn parse(line: &str) -> Result<Self> {
        let caps = REGISTER_LINE
            .captures(line)
            .ok_or_else(|| ConsoleError::parse(RecordKind::Register, line))?;

        Ok(Self {
            name: caps["name"].to_string(),
            hex_value: caps["hex"].to_string(),
            value: caps["value"].to_string(),
        })
    }

    /// 生の値を数値で取得する
    pub fn hex_address(&self) -> Option<u64> {
        parse_address(&self.hex_value)
    }
}

/// 実行中のプログラムがなくレジスタを読めないことを示す応答か判定する
pub(crate) fn has_no_registers(text: &str) -> bool {
    text.trim_start().starts_with("No registers.") || text.contains("no registers")
}

/// `info registers` の応答を解析する
pub fn parse_register_dump(text: &str) -> Result<BTreeMap<String, RegisterRecord>> {
    if has_no_registers(text) {
        return Ok(BTreeMap::new());
    }
    collect_records(text.lines(), RegisterRecord::parse, |r| r.name.clone())
}
