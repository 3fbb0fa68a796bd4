//! 変数束縛の解析
//!
//! ```text
//! argv = (const char **) 0xbffff590
//! ```

use crate::listing::collect_records;
use crate::parse::starts_with_any;
use crate::{ConsoleError, RecordKind, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 最初の ` = ` で名前と値に分割する
///
/// 名前側に ` = ` を含む行は誤って分割されます（値側に含まれる分には問題ありません）。
static VARIABLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[\S ]+?) = (?P<value>[\S ]+)")
        .expect("variable line pattern must compile")
});

/// 変数がないことを示す応答
const NO_VARIABLES: &[&str] = &[
    "No locals.",
    "No arguments.",
    "No symbol table info available.",
    "No frame selected.",
];

/// 変数とその値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRecord {
    /// 変数名
    pub name: String,
    /// 値のテキスト（型注釈を含むことがある）
    pub value: String,
}

impl VariableRecord {
    /// `name = value` の1行を解析する
    pub fn parse(line: &str) -> Result<Self> {
        let caps = VARIABLE_LINE
            .captures(line)
            .ok_or_else(|| ConsoleError::parse(RecordKind::Variable, line))?;

        Ok(Self {
            name: caps["name"].to_string(),
            value: caps["value"].to_string(),
        })
    }
}

/// `info locals` や `info args` の応答を解析する
pub fn parse_variables(text: &str) -> Result<BTreeMap<String, VariableRecord>> {
    if starts_with_any(text, NO_VARIABLES) {
        return Ok(BTreeMap::new());
    }
    collect_records(text.lines(), VariableRecord::parse, |v| v.name.clone())
}
